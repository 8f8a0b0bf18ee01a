use strata_blocks::{AIR, BlockId};

use crate::coord::{ChunkCoord, ChunkDims};

/// Dense block grid of one chunk, one id per cell, `y`-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkBuf {
    pub coord: ChunkCoord,
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
    pub blocks: Vec<BlockId>,
}

impl ChunkBuf {
    /// All-air buffer for `coord`.
    pub fn new(coord: ChunkCoord, dims: ChunkDims) -> Self {
        ChunkBuf {
            coord,
            sx: dims.sx,
            sy: dims.sy,
            sz: dims.sz,
            blocks: vec![AIR; dims.volume()],
        }
    }

    pub fn from_blocks_local(coord: ChunkCoord, dims: ChunkDims, blocks: Vec<BlockId>) -> Self {
        let mut b = blocks;
        if b.len() != dims.volume() {
            b.resize(dims.volume(), AIR);
        }
        ChunkBuf {
            coord,
            sx: dims.sx,
            sy: dims.sy,
            sz: dims.sz,
            blocks: b,
        }
    }

    #[inline]
    pub fn dims(&self) -> ChunkDims {
        ChunkDims::new(self.sx, self.sy, self.sz)
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.sz + z) * self.sx + x
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.sx
            && (y as usize) < self.sy
            && (z as usize) < self.sz
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> BlockId {
        self.blocks[self.idx(x, y, z)]
    }

    #[inline]
    pub fn set_local(&mut self, x: usize, y: usize, z: usize, id: BlockId) {
        let i = self.idx(x, y, z);
        self.blocks[i] = id;
    }

    #[inline]
    fn base(&self) -> (i32, i32, i32) {
        (
            self.coord.cx * self.sx as i32,
            self.coord.cy * self.sy as i32,
            self.coord.cz * self.sz as i32,
        )
    }

    #[inline]
    pub fn contains_world(&self, wx: i32, wy: i32, wz: i32) -> bool {
        let (bx, by, bz) = self.base();
        self.in_bounds(wx - bx, wy - by, wz - bz)
    }

    #[inline]
    pub fn get_world(&self, wx: i32, wy: i32, wz: i32) -> Option<BlockId> {
        if !self.contains_world(wx, wy, wz) {
            return None;
        }
        let (bx, by, bz) = self.base();
        Some(self.get_local(
            (wx - bx) as usize,
            (wy - by) as usize,
            (wz - bz) as usize,
        ))
    }

    #[inline]
    pub fn has_non_air(&self) -> bool {
        self.blocks.iter().any(|b| *b != AIR)
    }

    #[inline]
    pub fn is_all_air(&self) -> bool {
        !self.has_non_air()
    }
}
