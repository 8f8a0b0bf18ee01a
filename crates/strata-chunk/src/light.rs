use std::collections::VecDeque;

use strata_blocks::{BlockRegistry, MAX_LIGHT};

use crate::buf::ChunkBuf;
use crate::face::Face;

/// Per-cell light levels (`0..=MAX_LIGHT`) for one chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LightGrid {
    sx: usize,
    sy: usize,
    sz: usize,
    levels: Vec<u8>,
}

impl LightGrid {
    pub fn new(sx: usize, sy: usize, sz: usize) -> Self {
        Self {
            sx,
            sy,
            sz,
            levels: vec![0; sx * sy * sz],
        }
    }

    /// Grid lit to `level` everywhere.
    pub fn uniform(sx: usize, sy: usize, sz: usize, level: u8) -> Self {
        Self {
            sx,
            sy,
            sz,
            levels: vec![level.min(MAX_LIGHT); sx * sy * sz],
        }
    }

    #[inline]
    fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.sz + z) * self.sx + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> u8 {
        self.levels[self.idx(x, y, z)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, level: u8) {
        let i = self.idx(x, y, z);
        self.levels[i] = level;
    }

    pub fn max_level(&self) -> u8 {
        self.levels.iter().copied().max().unwrap_or(0)
    }
}

/// Computes sky and block light for `buf` in isolation.
///
/// Sky light enters each column from the top face and falls straight down
/// until the first opaque block. Emissive blocks seed their own level. A
/// flood then spreads both through non-opaque cells, losing one level per step.
pub fn compute_light(buf: &ChunkBuf, reg: &BlockRegistry) -> LightGrid {
    let (sx, sy, sz) = (buf.sx, buf.sy, buf.sz);
    let mut lg = LightGrid::new(sx, sy, sz);
    let mut queue: VecDeque<(usize, usize, usize)> = VecDeque::new();

    for z in 0..sz {
        for x in 0..sx {
            for y in (0..sy).rev() {
                if reg.is_opaque(buf.get_local(x, y, z)) {
                    break;
                }
                lg.set(x, y, z, MAX_LIGHT);
                queue.push_back((x, y, z));
            }
        }
    }

    for y in 0..sy {
        for z in 0..sz {
            for x in 0..sx {
                let em = reg.emission(buf.get_local(x, y, z));
                if em > lg.get(x, y, z) {
                    lg.set(x, y, z, em);
                    queue.push_back((x, y, z));
                }
            }
        }
    }

    while let Some((x, y, z)) = queue.pop_front() {
        let level = lg.get(x, y, z);
        if level <= 1 {
            continue;
        }
        let next = level - 1;
        for face in Face::ALL {
            let (dx, dy, dz) = face.delta();
            let (nx, ny, nz) = (x as i32 + dx, y as i32 + dy, z as i32 + dz);
            if !buf.in_bounds(nx, ny, nz) {
                continue;
            }
            let (nx, ny, nz) = (nx as usize, ny as usize, nz as usize);
            if reg.is_opaque(buf.get_local(nx, ny, nz)) {
                continue;
            }
            if lg.get(nx, ny, nz) < next {
                lg.set(nx, ny, nz, next);
                queue.push_back((nx, ny, nz));
            }
        }
    }
    lg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{ChunkCoord, ChunkDims};

    fn reg() -> BlockRegistry {
        BlockRegistry::builtin()
    }

    #[test]
    fn open_chunk_is_fully_sky_lit() {
        let buf = ChunkBuf::new(ChunkCoord::default(), ChunkDims::new(4, 4, 4));
        let lg = compute_light(&buf, &reg());
        for y in 0..4 {
            for z in 0..4 {
                for x in 0..4 {
                    assert_eq!(lg.get(x, y, z), MAX_LIGHT);
                }
            }
        }
    }

    #[test]
    fn roof_shadows_column_and_light_leaks_sideways() {
        let reg = reg();
        let stone = reg.id_by_name("stone").unwrap();
        let mut buf = ChunkBuf::new(ChunkCoord::default(), ChunkDims::new(3, 4, 1));
        // Roof over x=0 only.
        buf.set_local(0, 3, 0, stone);
        let lg = compute_light(&buf, &reg);
        assert_eq!(lg.get(0, 3, 0), 0, "opaque cell stays dark");
        assert_eq!(lg.get(1, 2, 0), MAX_LIGHT);
        // Under the roof light arrives from the lit column next door.
        assert_eq!(lg.get(0, 2, 0), MAX_LIGHT - 1);
    }

    #[test]
    fn emissive_block_lights_sealed_room() {
        let reg = reg();
        let stone = reg.id_by_name("stone").unwrap();
        let glow = reg.id_by_name("glowstone").unwrap();
        let dims = ChunkDims::new(5, 3, 1);
        let mut buf = ChunkBuf::new(ChunkCoord::default(), dims);
        for x in 0..5 {
            buf.set_local(x, 2, 0, stone);
        }
        buf.set_local(0, 0, 0, glow);
        let lg = compute_light(&buf, &reg);
        let em = reg.emission(glow);
        assert_eq!(lg.get(0, 0, 0), em);
        assert_eq!(lg.get(1, 0, 0), em - 1);
        assert_eq!(lg.get(4, 0, 0), em - 4);
        assert_eq!(lg.get(4, 1, 0), em - 5);
    }
}
