//! Error types for the run loop and checkpoint layer.

use std::path::PathBuf;

use cdl_core::CdlError;
use thiserror::Error;

/// Errors encountered while driving or checkpointing a control model.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error(transparent)]
    Block(#[from] CdlError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Checkpoint not found: {}", path.display())]
    CheckpointNotFound { path: PathBuf },

    #[error("Checkpoint has no state for block '{name}'")]
    MissingBlockState { name: String },
}

pub type SimResult<T> = Result<T, SimError>;
