use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use strata_blocks::BlockRegistry;
use strata_chunk::{ChunkCoord, ChunkDims, ChunkHandle, FaceMesher, QuadMesher};
use strata_geom::Vec3;
use strata_runtime::{BuildQueue, ChunkWorker, GenJob, GenOut, GenerationQueue, RuntimeError};
use strata_worldgen::{TerrainGenerator, generator_from_params};

use crate::config::WorldConfig;
use crate::entity::{EntityKind, EntityTable};
use crate::render::Material;
use crate::store::ChunkStore;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub loaded: usize,
    /// Queued, in flight, or generated but not yet applied.
    pub generation_backlog: usize,
    pub build_queue: usize,
    pub built: usize,
    pub entities: usize,
}

/// Everything one world session owns: chunks, queues, the generation worker,
/// entities and the shared material.
///
/// All methods run on the main thread. The worker only sees the generation
/// queue and hands results back through a channel.
pub struct World {
    cfg: WorldConfig,
    dims: ChunkDims,
    reg: Arc<BlockRegistry>,
    generator: Arc<dyn TerrainGenerator>,
    pub(crate) mesher: Box<dyn FaceMesher>,
    pub(crate) store: ChunkStore,
    pub(crate) gen_queue: Arc<GenerationQueue<GenJob>>,
    pub(crate) build_queue: BuildQueue<ChunkHandle>,
    worker: Option<ChunkWorker>,
    load_enabled: Arc<AtomicBool>,
    pub(crate) observer: Vec3,
    entities: EntityTable,
    pub(crate) material: Material,
}

impl World {
    /// Empty world with the generator selected by `cfg.worldgen`. Loading stays
    /// disabled until [`World::load_singleplayer`].
    pub fn new(cfg: WorldConfig, reg: Arc<BlockRegistry>) -> Self {
        let generator = generator_from_params(&cfg.worldgen, &reg);
        Self::with_generator(cfg, reg, generator)
    }

    pub fn with_generator(
        cfg: WorldConfig,
        reg: Arc<BlockRegistry>,
        generator: Arc<dyn TerrainGenerator>,
    ) -> Self {
        let dims = cfg.dims();
        let entities = EntityTable::new(cfg.max_entities);
        log::info!(
            target: "world",
            "initialized world: chunk {}x{}x{}, draw distance {}, {} block types",
            dims.sx,
            dims.sy,
            dims.sz,
            cfg.draw_distance,
            reg.len()
        );
        Self {
            cfg,
            dims,
            reg,
            generator,
            mesher: Box::new(QuadMesher),
            store: ChunkStore::new(dims),
            gen_queue: Arc::new(GenerationQueue::new()),
            build_queue: BuildQueue::new(),
            worker: None,
            load_enabled: Arc::new(AtomicBool::new(false)),
            observer: Vec3::ZERO,
            entities,
            material: Material::default(),
        }
    }

    /// Default config and the built-in block set.
    pub fn initialize() -> Self {
        Self::new(WorldConfig::default(), Arc::new(BlockRegistry::builtin()))
    }

    pub fn with_mesher(mut self, mesher: Box<dyn FaceMesher>) -> Self {
        self.mesher = mesher;
        self
    }

    /// Enables loading, starts the generation worker and seeds the observer's chunk.
    pub fn load_singleplayer(&mut self) -> Result<(), RuntimeError> {
        if self.worker.is_some() {
            return Ok(());
        }
        if self.gen_queue.is_closed() {
            self.gen_queue.reopen();
        }
        self.load_enabled.store(true, Ordering::Release);
        let worker = ChunkWorker::spawn(
            Arc::clone(&self.gen_queue),
            Arc::clone(&self.load_enabled),
            Arc::clone(&self.generator),
            Arc::clone(&self.reg),
            self.dims,
        );
        let worker = match worker {
            Ok(w) => w,
            Err(e) => {
                self.load_enabled.store(false, Ordering::Release);
                return Err(e);
            }
        };
        self.worker = Some(worker);
        let requeued = self.requeue_ungenerated();
        if requeued > 0 {
            log::debug!(target: "world", "requeued {requeued} chunks inserted while loading was off");
        }
        let origin = ChunkCoord::containing(self.observer, self.dims);
        self.insert_chunk(origin);
        log::info!(target: "world", "singleplayer loaded at {:?}", origin);
        Ok(())
    }

    /// Stops loading, joins the worker, then releases every chunk.
    pub fn unload_world(&mut self) {
        self.load_enabled.store(false, Ordering::Release);
        match self.worker.take() {
            Some(mut w) => {
                if let Err(e) = w.shutdown() {
                    log::error!(target: "world", "{e}");
                }
            }
            None => {
                self.gen_queue.close();
            }
        }
        self.build_queue.clear();
        let removed = self.store.clear();
        log::info!(target: "world", "world unloaded ({removed} chunks released)");
    }

    pub fn load_enabled(&self) -> bool {
        self.load_enabled.load(Ordering::Acquire)
    }

    pub fn is_worker_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| w.is_running())
    }

    /// Installs every finished generation result. Results for evicted chunks are dropped.
    pub fn apply_generation_results(&mut self) -> usize {
        let results = match &self.worker {
            Some(w) => w.drain_results(),
            None => return 0,
        };
        let mut applied = 0;
        for out in results {
            if self.apply_gen_out(out) {
                applied += 1;
            }
        }
        applied
    }

    pub(crate) fn apply_gen_out(&mut self, out: GenOut) -> bool {
        match self.store.get_mut(out.handle) {
            Some(c) if c.coord == out.coord => {
                c.apply_generation(out.buf, out.light);
                log::trace!(
                    target: "stream",
                    "generated {:?} in {}ms (+{}ms light)",
                    out.coord,
                    out.t_gen_ms,
                    out.t_light_ms
                );
                true
            }
            _ => {
                log::debug!(target: "stream", "dropping stale generation result for {:?}", out.coord);
                false
            }
        }
    }

    /// Blocks until the generation queue drains or `timeout` passes, then applies results.
    pub fn wait_for_generation(&mut self, timeout: Duration) -> bool {
        let idle = self.gen_queue.wait_idle(timeout);
        self.apply_generation_results();
        idle
    }

    pub fn stats(&self) -> WorldStats {
        let undrained = self.worker.as_ref().map_or(0, |w| w.pending_results());
        WorldStats {
            loaded: self.store.len(),
            generation_backlog: self.gen_queue.pending() + undrained,
            build_queue: self.build_queue.len(),
            built: self.store.iter().filter(|(_, c)| c.is_built).count(),
            entities: self.entities.live_count(),
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.cfg
    }

    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.reg
    }

    pub fn chunks(&self) -> &ChunkStore {
        &self.store
    }

    pub fn chunks_mut(&mut self) -> &mut ChunkStore {
        &mut self.store
    }

    /// Handles waiting for a build, front first.
    pub fn queued_builds(&self) -> Vec<ChunkHandle> {
        self.build_queue.iter().copied().collect()
    }

    pub fn generation_queue_len(&self) -> usize {
        self.gen_queue.len()
    }

    pub fn observer(&self) -> Vec3 {
        self.observer
    }

    pub fn set_observer(&mut self, pos: Vec3) {
        self.observer = pos;
    }

    pub fn draw_distance(&self) -> i32 {
        self.cfg.draw_distance
    }

    pub fn set_draw_distance(&mut self, dd: i32) {
        self.cfg.draw_distance = dd.max(0);
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn apply_texture(&mut self, texture: u32) {
        self.material.texture = Some(texture);
    }

    pub fn apply_shader(&mut self, shader: u32) {
        self.material.shader = Some(shader);
    }

    pub fn entities(&self) -> &EntityTable {
        &self.entities
    }

    pub fn add_entity(&mut self, id: usize, kind: EntityKind, position: Vec3, rotation: Vec3) -> bool {
        self.entities.add(id, kind, position, rotation)
    }

    pub fn teleport_entity(&mut self, id: usize, position: Vec3, rotation: Vec3) -> bool {
        self.entities.teleport(id, position, rotation)
    }

    pub fn remove_entity(&mut self, id: usize) -> bool {
        self.entities.remove(id)
    }
}
