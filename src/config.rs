use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

use strata_chunk::ChunkDims;
use strata_worldgen::WorldGenParams;

/// Streaming, rendering and generation settings for one world session.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct WorldConfig {
    /// Chebyshev radius, in chunks, kept loaded around the observer.
    #[serde(default = "default_draw_distance")]
    pub draw_distance: i32,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: [usize; 3],
    /// Maximum mesh builds drained per frame.
    #[serde(default = "default_build_budget")]
    pub build_budget: usize,
    /// Chunks whose centre is farther than `draw_distance * chunk_size[0] * unload_factor` are evicted.
    #[serde(default = "default_unload_factor")]
    pub unload_factor: f32,
    #[serde(default = "default_max_entities")]
    pub max_entities: usize,
    /// Extra angle, in radians, tolerated past the vertical field of view before culling.
    #[serde(default = "default_frustum_margin")]
    pub frustum_margin: f32,
    #[serde(default = "default_fovy_deg")]
    pub fovy_deg: f32,
    #[serde(default)]
    pub worldgen: WorldGenParams,
}

fn default_draw_distance() -> i32 {
    3
}
fn default_chunk_size() -> [usize; 3] {
    [16, 16, 16]
}
fn default_build_budget() -> usize {
    3
}
fn default_unload_factor() -> f32 {
    2.5
}
fn default_max_entities() -> usize {
    256
}
fn default_frustum_margin() -> f32 {
    0.3
}
fn default_fovy_deg() -> f32 {
    70.0
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            draw_distance: default_draw_distance(),
            chunk_size: default_chunk_size(),
            build_budget: default_build_budget(),
            unload_factor: default_unload_factor(),
            max_entities: default_max_entities(),
            frustum_margin: default_frustum_margin(),
            fovy_deg: default_fovy_deg(),
            worldgen: WorldGenParams::default(),
        }
    }
}

impl WorldConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: WorldConfig = toml::from_str(toml_str)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.chunk_size.iter().any(|&s| s == 0) {
            return Err(format!("chunk_size must be non-zero, got {:?}", self.chunk_size).into());
        }
        if self.draw_distance < 0 {
            return Err(format!("draw_distance must be >= 0, got {}", self.draw_distance).into());
        }
        Ok(())
    }

    pub fn dims(&self) -> ChunkDims {
        let [sx, sy, sz] = self.chunk_size;
        ChunkDims::new(sx, sy, sz)
    }

    pub fn fovy_rad(&self) -> f32 {
        self.fovy_deg.to_radians()
    }
}
