use strata_blocks::{AIR, BlockId};
use strata_chunk::{ChunkCoord, ChunkHandle, compute_light};
use strata_geom::Vec3;

use crate::world::World;

#[inline]
fn block_of(pos: Vec3) -> (i32, i32, i32) {
    let p = pos.floor();
    (p.x as i32, p.y as i32, p.z as i32)
}

impl World {
    /// Block at a world position, or air when the chunk is not loaded.
    pub fn get_block(&self, pos: Vec3) -> BlockId {
        let (wx, wy, wz) = block_of(pos);
        self.get_block_at(wx, wy, wz)
    }

    pub fn get_block_at(&self, wx: i32, wy: i32, wz: i32) -> BlockId {
        let coord = ChunkCoord::containing_block(wx, wy, wz, self.dims());
        self.store
            .get_at(coord)
            .and_then(|c| c.buf.get_world(wx, wy, wz))
            .unwrap_or(AIR)
    }

    /// Writes one block and schedules the affected meshes.
    ///
    /// Rejected (returns false) when the chunk is not loaded or not yet lit.
    /// The edited chunk's light is recomputed here. Neighbours are always
    /// re-queued; the chunk itself is rebuilt now when `immediate` and its
    /// neighbourhood is lit, otherwise re-queued.
    pub fn set_block(&mut self, pos: Vec3, id: BlockId, immediate: bool) -> bool {
        let (wx, wy, wz) = block_of(pos);
        self.set_block_at(wx, wy, wz, id, immediate)
    }

    pub fn set_block_at(&mut self, wx: i32, wy: i32, wz: i32, id: BlockId, immediate: bool) -> bool {
        let dims = self.dims();
        let coord = ChunkCoord::containing_block(wx, wy, wz, dims);
        let Some(h) = self.store.lookup(coord) else {
            log::debug!(target: "edit", "set_block ({wx},{wy},{wz}): chunk {:?} not loaded", coord);
            return false;
        };
        {
            let Some(c) = self.store.get_mut(h) else {
                return false;
            };
            if !c.is_light_generated {
                log::debug!(target: "edit", "set_block ({wx},{wy},{wz}): chunk {:?} not lit yet", coord);
                return false;
            }
            let lx = (wx - coord.cx * dims.sx as i32) as usize;
            let ly = (wy - coord.cy * dims.sy as i32) as usize;
            let lz = (wz - coord.cz * dims.sz as i32) as usize;
            c.buf.set_local(lx, ly, lz, id);
        }
        let light = match self.store.get(h) {
            Some(c) => compute_light(&c.buf, self.registry()),
            None => return false,
        };
        if let Some(c) = self.store.get_mut(h) {
            c.light = Some(light);
        }
        log::debug!(target: "edit", "set ({wx},{wy},{wz}) = {id} in {:?}", coord);

        if id == AIR {
            self.refresh_bordering(h);
            self.rebuild_edited(h, immediate);
        } else {
            self.rebuild_edited(h, immediate);
            self.refresh_bordering(h);
        }
        true
    }

    fn rebuild_edited(&mut self, h: ChunkHandle, immediate: bool) {
        if immediate && self.is_build_ready(h) {
            self.build_chunk(h);
        } else {
            self.queue_chunk(h);
        }
    }
}
