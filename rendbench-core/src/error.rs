use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by an engine backend.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Engine is not connected")]
    NotConnected,

    #[error("Failed to load asset {path}: {reason}")]
    AssetLoad { path: PathBuf, reason: String },

    #[error("Camera image request failed: {0}")]
    Render(String),

    #[error("State logging error: {0}")]
    StateLogging(String),

    #[error("Engine backend error: {0}")]
    Backend(String),
}
