//! Observability configuration.
//!
//! Parameters for instrumentation:
//! - Log level for the tracing subscriber
//! - Prometheus text dump of frame metrics
//! - Engine-side profile timings log

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Telemetry configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct TelemetryConfig {
    /// Default level when `RUST_LOG` is unset.
    #[validate(custom(function = validation::validate_log_level))]
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Write frame metrics in Prometheus text format here after the run.
    #[serde(default)]
    pub metrics_path: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            metrics_path: None,
        }
    }
}

/// Engine state log written for the duration of the benchmark.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct StateLogConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_state_log_path")]
    pub path: PathBuf,
}

fn default_true() -> bool {
    true
}

fn default_state_log_path() -> PathBuf {
    PathBuf::from("renderTimings")
}

impl Default for StateLogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_state_log_path(),
        }
    }
}
