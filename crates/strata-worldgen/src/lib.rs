//! Terrain generation seam and the built-in generators.
#![forbid(unsafe_code)]

mod params;
mod terrain;

use std::sync::Arc;

use strata_blocks::BlockRegistry;
use strata_chunk::ChunkBuf;

pub use params::{GenMode, WorldGenParams, load_params_from_path};
pub use terrain::{FlatTerrain, NoiseTerrain};

/// Fills a chunk's block grid given its coordinate.
///
/// Called on the generation worker; implementations must be deterministic per coordinate.
pub trait TerrainGenerator: Send + Sync {
    fn generate(&self, buf: &mut ChunkBuf);
}

/// Generator selected by `params.mode`.
pub fn generator_from_params(
    params: &WorldGenParams,
    reg: &BlockRegistry,
) -> Arc<dyn TerrainGenerator> {
    match params.mode {
        GenMode::Noise => Arc::new(NoiseTerrain::new(params, reg)),
        GenMode::Flat => Arc::new(FlatTerrain::from_params(params, reg)),
    }
}
