//! Chunk mesh buffers and the face-visibility walk that fills them.

use strata_blocks::{AIR, BlockId, BlockRegistry, BlockType, MAX_LIGHT};
use strata_geom::Vec3;

use crate::buf::ChunkBuf;
use crate::face::Face;
use crate::light::LightGrid;

/// CPU-side geometry for one chunk pass, positions relative to the chunk's block origin.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    pub col: Vec<u8>,
    pub idx: Vec<u32>,
}

impl ChunkMesh {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.idx.len() / 6
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idx.is_empty()
    }

    /// Pre-reserve capacity for approximately `n_quads` quads worth of data.
    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.pos.reserve(n_quads * 4 * 3);
        self.norm.reserve(n_quads * 4 * 3);
        self.uv.reserve(n_quads * 4 * 2);
        self.col.reserve(n_quads * 4 * 4);
        self.idx.reserve(n_quads * 6);
    }

    /// Appends a quad (two triangles), flipping the winding so it faces along `n`.
    pub fn add_quad(&mut self, corners: [Vec3; 4], n: Vec3, rgba: [u8; 4]) {
        let base = self.vertex_count() as u32;
        let mut vs = corners;
        let mut uvs = [(0.0f32, 0.0f32), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)];
        let cross = (vs[1] - vs[0]).cross(vs[2] - vs[0]);
        if cross.dot(n) < 0.0 {
            vs.swap(1, 3);
            uvs.swap(1, 3);
        }
        for i in 0..4 {
            self.pos.extend_from_slice(&[vs[i].x, vs[i].y, vs[i].z]);
            self.norm.extend_from_slice(&[n.x, n.y, n.z]);
            self.uv.extend_from_slice(&[uvs[i].0, uvs[i].1]);
            self.col.extend_from_slice(&rgba);
        }
        self.idx
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

/// Geometry builder for a single block face.
///
/// Appends the face of the block at cell `pos` (chunk-local) into `mesh`.
pub trait FaceMesher: Send + Sync {
    fn append_face(
        &self,
        mesh: &mut ChunkMesh,
        face: Face,
        pos: Vec3,
        block: &BlockType,
        translucent: bool,
        light: u8,
    );
}

/// Unit-cube quads shaded by light level.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuadMesher;

impl QuadMesher {
    #[inline]
    fn shade(light: u8) -> u8 {
        let l = f32::from(light.min(MAX_LIGHT)) / f32::from(MAX_LIGHT);
        (255.0 * (0.2 + 0.8 * l)).round() as u8
    }

    fn corners(face: Face, p: Vec3) -> [Vec3; 4] {
        let (x0, y0, z0) = (p.x, p.y, p.z);
        let (x1, y1, z1) = (p.x + 1.0, p.y + 1.0, p.z + 1.0);
        match face {
            Face::PosY => [
                Vec3::new(x0, y1, z0),
                Vec3::new(x1, y1, z0),
                Vec3::new(x1, y1, z1),
                Vec3::new(x0, y1, z1),
            ],
            Face::NegY => [
                Vec3::new(x0, y0, z0),
                Vec3::new(x1, y0, z0),
                Vec3::new(x1, y0, z1),
                Vec3::new(x0, y0, z1),
            ],
            Face::PosX => [
                Vec3::new(x1, y0, z0),
                Vec3::new(x1, y1, z0),
                Vec3::new(x1, y1, z1),
                Vec3::new(x1, y0, z1),
            ],
            Face::NegX => [
                Vec3::new(x0, y0, z0),
                Vec3::new(x0, y1, z0),
                Vec3::new(x0, y1, z1),
                Vec3::new(x0, y0, z1),
            ],
            Face::PosZ => [
                Vec3::new(x0, y0, z1),
                Vec3::new(x1, y0, z1),
                Vec3::new(x1, y1, z1),
                Vec3::new(x0, y1, z1),
            ],
            Face::NegZ => [
                Vec3::new(x0, y0, z0),
                Vec3::new(x1, y0, z0),
                Vec3::new(x1, y1, z0),
                Vec3::new(x0, y1, z0),
            ],
        }
    }
}

impl FaceMesher for QuadMesher {
    fn append_face(
        &self,
        mesh: &mut ChunkMesh,
        face: Face,
        pos: Vec3,
        _block: &BlockType,
        translucent: bool,
        light: u8,
    ) {
        let s = Self::shade(light);
        let alpha = if translucent { 160 } else { 255 };
        mesh.add_quad(Self::corners(face, pos), face.normal(), [s, s, s, alpha]);
    }
}

/// A chunk's blocks and light plus whatever neighbours are available, indexed by [`Face`].
pub struct Neighborhood<'a> {
    pub center: &'a ChunkBuf,
    pub center_light: &'a LightGrid,
    pub neighbors: [Option<(&'a ChunkBuf, &'a LightGrid)>; 6],
}

impl<'a> Neighborhood<'a> {
    pub fn new(center: &'a ChunkBuf, center_light: &'a LightGrid) -> Self {
        Self {
            center,
            center_light,
            neighbors: [None; 6],
        }
    }

    pub fn with_neighbor(mut self, face: Face, buf: &'a ChunkBuf, light: &'a LightGrid) -> Self {
        self.neighbors[face.index()] = Some((buf, light));
        self
    }

    /// Block and light at a chunk-local cell that may lie one step outside the chunk.
    /// Cells in a missing neighbour read as fully lit air.
    pub fn sample(&self, x: i32, y: i32, z: i32) -> (BlockId, u8) {
        let c = self.center;
        if c.in_bounds(x, y, z) {
            let (ux, uy, uz) = (x as usize, y as usize, z as usize);
            return (c.get_local(ux, uy, uz), self.center_light.get(ux, uy, uz));
        }
        let face = if x < 0 {
            Face::NegX
        } else if x >= c.sx as i32 {
            Face::PosX
        } else if y < 0 {
            Face::NegY
        } else if y >= c.sy as i32 {
            Face::PosY
        } else if z < 0 {
            Face::NegZ
        } else {
            Face::PosZ
        };
        match self.neighbors[face.index()] {
            Some((nbuf, nlight)) => {
                let lx = x.rem_euclid(nbuf.sx as i32);
                let ly = y.rem_euclid(nbuf.sy as i32);
                let lz = z.rem_euclid(nbuf.sz as i32);
                if !nbuf.in_bounds(lx, ly, lz) {
                    return (AIR, MAX_LIGHT);
                }
                let (ux, uy, uz) = (lx as usize, ly as usize, lz as usize);
                (nbuf.get_local(ux, uy, uz), nlight.get(ux, uy, uz))
            }
            None => (AIR, MAX_LIGHT),
        }
    }
}

/// Rebuilds both passes of a chunk mesh from scratch.
///
/// A face is emitted when the adjacent cell is not opaque and is not the same
/// translucent block. Translucent blocks go to the second buffer.
pub fn build_chunk_mesh(
    nb: &Neighborhood<'_>,
    reg: &BlockRegistry,
    mesher: &dyn FaceMesher,
) -> (ChunkMesh, ChunkMesh) {
    let buf = nb.center;
    let mut opaque = ChunkMesh::default();
    let mut transparent = ChunkMesh::default();
    for y in 0..buf.sy {
        for z in 0..buf.sz {
            for x in 0..buf.sx {
                let id = buf.get_local(x, y, z);
                if id == AIR {
                    continue;
                }
                let ty = reg.get(id);
                let translucent = reg.is_translucent(id);
                let pos = Vec3::new(x as f32, y as f32, z as f32);
                for face in Face::ALL {
                    let (dx, dy, dz) = face.delta();
                    let (adj, light) = nb.sample(x as i32 + dx, y as i32 + dy, z as i32 + dz);
                    if reg.is_opaque(adj) {
                        continue;
                    }
                    if translucent && adj == id {
                        continue;
                    }
                    let target = if translucent {
                        &mut transparent
                    } else {
                        &mut opaque
                    };
                    mesher.append_face(target, face, pos, ty, translucent, light);
                }
            }
        }
    }
    (opaque, transparent)
}
