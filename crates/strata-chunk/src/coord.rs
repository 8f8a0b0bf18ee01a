use serde::{Deserialize, Serialize};
use strata_geom::Vec3;

use crate::face::Face;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cy: self.cy + dy,
            cz: self.cz + dz,
        }
    }

    /// Coordinate of the chunk across `face`.
    #[inline]
    pub fn neighbor(self, face: Face) -> Self {
        let (dx, dy, dz) = face.delta();
        self.offset(dx, dy, dz)
    }

    #[inline]
    pub fn distance_sq(self, other: ChunkCoord) -> i64 {
        let dx = i64::from(self.cx - other.cx);
        let dy = i64::from(self.cy - other.cy);
        let dz = i64::from(self.cz - other.cz);
        dx * dx + dy * dy + dz * dz
    }

    /// Chebyshev (max-axis) distance in chunk units.
    #[inline]
    pub fn chebyshev(self, other: ChunkCoord) -> i32 {
        (self.cx - other.cx)
            .abs()
            .max((self.cy - other.cy).abs())
            .max((self.cz - other.cz).abs())
    }

    /// Chunk containing the world-space point `pos` (floor division per axis).
    #[inline]
    pub fn containing(pos: Vec3, dims: ChunkDims) -> Self {
        Self::new(
            (pos.x / dims.sx as f32).floor() as i32,
            (pos.y / dims.sy as f32).floor() as i32,
            (pos.z / dims.sz as f32).floor() as i32,
        )
    }

    /// Chunk containing the integer block position.
    #[inline]
    pub fn containing_block(wx: i32, wy: i32, wz: i32, dims: ChunkDims) -> Self {
        Self::new(
            wx.div_euclid(dims.sx as i32),
            wy.div_euclid(dims.sy as i32),
            wz.div_euclid(dims.sz as i32),
        )
    }

    /// World-space position of this chunk's minimum corner.
    #[inline]
    pub fn block_origin(self, dims: ChunkDims) -> Vec3 {
        Vec3::new(
            (self.cx * dims.sx as i32) as f32,
            (self.cy * dims.sy as i32) as f32,
            (self.cz * dims.sz as i32) as f32,
        )
    }
}

impl From<(i32, i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<ChunkCoord> for (i32, i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cy, value.cz)
    }
}

/// Block dimensions of every chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkDims {
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
}

impl ChunkDims {
    #[inline]
    pub const fn new(sx: usize, sy: usize, sz: usize) -> Self {
        Self { sx, sy, sz }
    }

    #[inline]
    pub const fn volume(self) -> usize {
        self.sx * self.sy * self.sz
    }

    /// Offset of the chunk centre from its block origin.
    #[inline]
    pub fn half_extent(self) -> Vec3 {
        Vec3::new(
            self.sx as f32 / 2.0,
            self.sy as f32 / 2.0,
            self.sz as f32 / 2.0,
        )
    }
}

impl Default for ChunkDims {
    fn default() -> Self {
        Self::new(16, 16, 16)
    }
}
