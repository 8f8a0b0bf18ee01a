//! Chunk streaming, generation hand-off, mesh building and draw submission
//! for a voxel world around a moving observer.
#![forbid(unsafe_code)]

pub mod chunk;
pub mod config;
mod edit;
pub mod entity;
pub mod render;
pub mod store;
mod streaming;
pub mod world;

pub use chunk::{Chunk, ChunkState};
pub use config::WorldConfig;
pub use entity::{Entity, EntityKind, EntityModel, EntityTable, NO_ENTITY, PartKind};
pub use render::{Camera, DrawStats, Material, RecordingBackend, RenderBackend, RenderPass};
pub use store::ChunkStore;
pub use world::{World, WorldStats};

pub use strata_blocks::{AIR, BlockId, BlockRegistry};
pub use strata_chunk::{ChunkCoord, ChunkDims, ChunkHandle};
pub use strata_geom::Vec3;
