//! Generation hand-off between the main thread and the background chunk worker.
#![forbid(unsafe_code)]

mod error;
mod queue;
mod worker;

pub use error::RuntimeError;
pub use queue::{BuildQueue, GenerationQueue};
pub use worker::{ChunkWorker, GenJob, GenOut};
