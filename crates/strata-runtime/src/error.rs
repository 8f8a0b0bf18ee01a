use std::fmt;
use std::io;

#[derive(Debug)]
pub enum RuntimeError {
    Spawn(io::Error),
    WorkerPanicked,
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::Spawn(e) => write!(f, "failed to spawn chunk worker: {e}"),
            RuntimeError::WorkerPanicked => write!(f, "chunk worker panicked"),
        }
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuntimeError::Spawn(e) => Some(e),
            RuntimeError::WorkerPanicked => None,
        }
    }
}

impl From<io::Error> for RuntimeError {
    fn from(e: io::Error) -> Self {
        RuntimeError::Spawn(e)
    }
}
