use thiserror::Error;

use rendbench_config::ConfigError;
use rendbench_core::engine::ConnectionMode;
use rendbench_core::EngineError;

use crate::engine::display::DisplayError;

#[derive(Debug, Error)]
pub enum RenderTestError {
    #[error("Failed to connect to the engine in {mode} mode (handle {handle})")]
    Connection { handle: i32, mode: ConnectionMode },

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Display error: {0}")]
    Display(#[from] DisplayError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),
}
