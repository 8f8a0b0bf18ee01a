//! Block ids, block definitions, and the TOML-backed registry.
#![forbid(unsafe_code)]

pub mod config;
pub mod registry;
pub mod types;

pub use registry::{BlockRegistry, BlockType};
pub use types::{AIR, BlockId, MAX_LIGHT};
