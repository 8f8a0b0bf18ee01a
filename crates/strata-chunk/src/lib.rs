//! Chunk-level data: coordinates, block grid, lighting, and mesh buffers.
#![forbid(unsafe_code)]

mod buf;
mod coord;
mod face;
mod handle;
mod light;
pub mod mesh;

pub use buf::ChunkBuf;
pub use coord::{ChunkCoord, ChunkDims};
pub use face::Face;
pub use handle::ChunkHandle;
pub use light::{LightGrid, compute_light};
pub use mesh::{ChunkMesh, FaceMesher, Neighborhood, QuadMesher, build_chunk_mesh};
