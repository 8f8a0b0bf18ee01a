use strata_chunk::{ChunkCoord, ChunkHandle, Face, Neighborhood, build_chunk_mesh};
use strata_runtime::GenJob;

use crate::world::World;

enum BuildGate {
    Ready,
    Waiting,
    Gone,
}

impl World {
    /// Per-frame driver: apply generated chunks, load the cube around the
    /// observer, drain a bounded number of builds, evict far chunks.
    pub fn stream_chunks(&mut self) {
        self.apply_generation_results();

        if self.load_enabled() {
            let center = ChunkCoord::containing(self.observer, self.dims());
            let dd = self.draw_distance();
            for dy in (-dd..=dd).rev() {
                for dx in -dd..=dd {
                    for dz in -dd..=dd {
                        self.insert_chunk(center.offset(dx, dy, dz));
                    }
                }
            }
        }

        self.process_build_queue();
        self.unload_far_chunks();
    }

    /// Inserts and queues a chunk, then re-queues its existing neighbours.
    /// No-op if `coord` is already loaded.
    pub fn insert_chunk(&mut self, coord: ChunkCoord) -> Option<ChunkHandle> {
        let h = self.store.insert(coord)?;
        log::trace!(target: "stream", "insert {:?}", coord);
        self.queue_chunk(h);
        self.refresh_bordering(h);
        Some(h)
    }

    /// Queues generation (once per chunk) and a build (unless one is pending).
    ///
    /// `has_started_generating` is only set once the job is actually queued;
    /// while the generation queue is closed the chunk stays unstarted and is
    /// picked up again by [`World::requeue_ungenerated`].
    pub fn queue_chunk(&mut self, h: ChunkHandle) {
        let Some(c) = self.store.get_mut(h) else {
            return;
        };
        if !c.has_started_generating {
            let coord = c.coord;
            if self.gen_queue.push(GenJob { handle: h, coord }) {
                c.has_started_generating = true;
            } else {
                log::debug!(target: "stream", "generation queue closed, {:?} not queued", coord);
            }
        }
        self.queue_build(h);
    }

    /// Queues generation for every loaded chunk that has none pending.
    pub fn requeue_ungenerated(&mut self) -> usize {
        let pending: Vec<ChunkHandle> = self
            .store
            .iter()
            .filter(|(_, c)| !c.has_started_generating)
            .map(|(h, _)| h)
            .collect();
        for &h in &pending {
            self.queue_chunk(h);
        }
        pending.len()
    }

    /// Adds `h` to the build queue unless it is already there.
    pub fn queue_build(&mut self, h: ChunkHandle) -> bool {
        let Some(c) = self.store.get_mut(h) else {
            return false;
        };
        if c.is_building {
            return false;
        }
        c.is_building = true;
        self.build_queue.push(h);
        true
    }

    /// Re-queues the builds of every existing neighbour of `h`.
    pub fn refresh_bordering(&mut self, h: ChunkHandle) {
        let Some(c) = self.store.get(h) else {
            return;
        };
        for nh in c.neighbours().into_iter().flatten() {
            self.queue_build(nh);
        }
    }

    /// True when `h` and every neighbour it has are lit.
    pub fn is_build_ready(&self, h: ChunkHandle) -> bool {
        matches!(self.build_gate(h), BuildGate::Ready)
    }

    fn build_gate(&self, h: ChunkHandle) -> BuildGate {
        match self.store.get(h) {
            None => BuildGate::Gone,
            Some(c) if c.is_light_generated && self.store.neighbours_lit(h) => BuildGate::Ready,
            Some(_) => BuildGate::Waiting,
        }
    }

    /// Builds up to `build_budget` chunks from the front of the build queue.
    ///
    /// A front entry that is not ready stays put and stops the drain until
    /// a later call, so nothing behind it is built out of order.
    pub fn process_build_queue(&mut self) -> usize {
        let budget = self.config().build_budget;
        let mut built = 0;
        while built < budget {
            let Some(&h) = self.build_queue.front() else {
                break;
            };
            match self.build_gate(h) {
                BuildGate::Gone => {
                    self.build_queue.pop_front();
                }
                BuildGate::Waiting => break,
                BuildGate::Ready => {
                    self.build_queue.pop_front();
                    self.build_chunk(h);
                    if let Some(c) = self.store.get_mut(h) {
                        c.is_building = false;
                    }
                    built += 1;
                }
            }
        }
        built
    }

    /// Rebuilds both meshes of `h` from its blocks and its neighbours' edges.
    pub(crate) fn build_chunk(&mut self, h: ChunkHandle) -> bool {
        let meshes = {
            let store = &self.store;
            let Some(chunk) = store.get(h) else {
                return false;
            };
            let Some(light) = chunk.light.as_ref() else {
                return false;
            };
            let mut nb = Neighborhood::new(&chunk.buf, light);
            for face in Face::ALL {
                let Some(n) = chunk.neighbour(face).and_then(|nh| store.get(nh)) else {
                    continue;
                };
                if let Some(nl) = n.light.as_ref() {
                    nb = nb.with_neighbor(face, &n.buf, nl);
                }
            }
            build_chunk_mesh(&nb, self.registry(), self.mesher.as_ref())
        };
        let Some(c) = self.store.get_mut(h) else {
            return false;
        };
        let (opaque, transparent) = meshes;
        log::trace!(
            target: "build",
            "built {:?}: {} opaque quads, {} transparent",
            c.coord,
            opaque.quad_count(),
            transparent.quad_count()
        );
        c.mesh = opaque;
        c.mesh_transparent = transparent;
        c.is_built = true;
        true
    }

    /// Evicts every chunk whose centre is beyond the unload radius and whose
    /// removal cannot disturb a pending build.
    pub fn unload_far_chunks(&mut self) -> usize {
        let limit =
            self.draw_distance() as f32 * self.dims().sx as f32 * self.config().unload_factor;
        let mut removed = 0;
        let mut cur = self.store.head();
        while let Some(h) = cur {
            cur = self.store.next_of(h);
            let Some(c) = self.store.get(h) else {
                continue;
            };
            if c.center().distance(self.observer) <= limit || !self.store.is_evictable(h) {
                continue;
            }
            let coord = c.coord;
            self.store.remove(coord);
            log::debug!(target: "stream", "evicted {:?}", coord);
            removed += 1;
        }
        removed
    }
}
