// rendbench-config/src/benchmark.rs
//! Benchmark run configuration.
//!
//! Parameters for the render loop itself:
//! - Iteration count and light setup
//! - Renderer selection
//! - Live frame display
//! - Offline backend frame cost

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use rendbench_core::engine::Renderer;

use crate::validation;

/// Render loop configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct BenchmarkConfig {
    /// Frames rendered per benchmark pass.
    #[validate(range(min = 1))]
    #[serde(default = "default_num_runs")]
    pub num_runs: usize,

    /// Direction towards the light.
    #[validate(custom(function = validation::validate_direction))]
    #[serde(default = "default_light_direction")]
    pub light_direction: [f32; 3],

    /// Rendering path (hardware_opengl, tiny_renderer).
    #[serde(default)]
    pub renderer: Renderer,

    /// Show each frame while benchmarking.
    #[serde(default)]
    pub plot: bool,

    /// Pause after each displayed frame (milliseconds).
    #[validate(range(max = 1000))]
    #[serde(default = "default_plot_pause_ms")]
    pub plot_pause_ms: u64,

    /// Where the live display writes the latest frame.
    #[serde(default = "default_plot_path")]
    pub plot_path: PathBuf,
}

fn default_num_runs() -> usize {
    100
}

fn default_light_direction() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_plot_pause_ms() -> u64 {
    10
}

fn default_plot_path() -> PathBuf {
    PathBuf::from("frame.png")
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            num_runs: default_num_runs(),
            light_direction: default_light_direction(),
            renderer: Renderer::default(),
            plot: false,
            plot_pause_ms: default_plot_pause_ms(),
            plot_path: default_plot_path(),
        }
    }
}

impl BenchmarkConfig {
    pub fn plot_pause(&self) -> Duration {
        Duration::from_millis(self.plot_pause_ms)
    }
}

/// Offline (scripted) backend parameters.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct OfflineConfig {
    /// Virtual time charged per rendered frame (microseconds).
    #[serde(default = "default_frame_cost_us")]
    pub frame_cost_us: u64,
}

fn default_frame_cost_us() -> u64 {
    16_000
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            frame_cost_us: default_frame_cost_us(),
        }
    }
}

impl OfflineConfig {
    pub fn frame_cost(&self) -> Duration {
        Duration::from_micros(self.frame_cost_us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.num_runs, 100);
        assert_eq!(config.renderer, Renderer::HardwareOpenGl);
        assert!(!config.plot);
        assert_eq!(config.plot_pause(), Duration::from_millis(10));
        assert!(config.validate().is_ok());
        assert_eq!(OfflineConfig::default().frame_cost(), Duration::from_millis(16));
    }

    #[test]
    fn test_zero_runs_rejected() {
        let config = BenchmarkConfig {
            num_runs: 0,
            ..BenchmarkConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unbounded_pause_rejected() {
        let config = BenchmarkConfig {
            plot_pause_ms: 60_000,
            ..BenchmarkConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
