//! # rendbench Telemetry
//!
//! Crate for logging and frame metrics.

pub mod logging;
pub mod metrics;

pub use logging::BenchLogger;
pub use metrics::FrameMetrics;
