use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GenMode {
    Noise,
    Flat,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct WorldGenParams {
    #[serde(default = "default_mode")]
    pub mode: GenMode,
    #[serde(default = "default_seed")]
    pub seed: i32,
    /// Mean surface height in blocks.
    #[serde(default = "default_base_height")]
    pub base_height: f32,
    #[serde(default = "default_amplitude")]
    pub amplitude: f32,
    #[serde(default = "default_frequency")]
    pub frequency: f32,
    /// Cells at or below this height that would be air are filled with water.
    #[serde(default = "default_sea_level")]
    pub sea_level: i32,
    #[serde(default = "default_flat_height")]
    pub flat_height: i32,
}

fn default_mode() -> GenMode {
    GenMode::Noise
}
fn default_seed() -> i32 {
    1
}
fn default_base_height() -> f32 {
    8.0
}
fn default_amplitude() -> f32 {
    12.0
}
fn default_frequency() -> f32 {
    0.01
}
fn default_sea_level() -> i32 {
    4
}
fn default_flat_height() -> i32 {
    4
}

impl Default for WorldGenParams {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            seed: default_seed(),
            base_height: default_base_height(),
            amplitude: default_amplitude(),
            frequency: default_frequency(),
            sea_level: default_sea_level(),
            flat_height: default_flat_height(),
        }
    }
}

pub fn load_params_from_path(path: &Path) -> Result<WorldGenParams, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let params: WorldGenParams = toml::from_str(&s)?;
    Ok(params)
}
