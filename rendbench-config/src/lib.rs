//! # rendbench Configuration System
//!
//! Hierarchical configuration for the render benchmark. Every default
//! reproduces the fixed benchmark scenario; files and environment variables
//! only override it.
//!
//! ## Features
//! - **Unified Configuration**: Single source of truth for session, camera and run
//! - **Validation**: Runtime validation of every numeric parameter
//! - **Layering**: Defaults, YAML files and `RENDBENCH_*` environment variables

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

mod benchmark;
mod camera;
mod error;
mod session;
mod telemetry;
mod validation;

pub use benchmark::BenchmarkConfig;
pub use benchmark::OfflineConfig;
pub use camera::CameraConfig;
pub use error::ConfigError;
pub use session::AssetConfig;
pub use session::SessionConfig;
pub use telemetry::StateLogConfig;
pub use telemetry::TelemetryConfig;

/// Base configuration file, merged when present.
pub const DEFAULT_CONFIG_PATH: &str = "config/rendbench.yaml";

/// Prefix of overriding environment variables; `__` separates nesting levels.
pub const ENV_PREFIX: &str = "RENDBENCH_";

/// Top‑level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone, PartialEq)]
pub struct RenderTestConfig {
    /// Engine connection and scene.
    #[validate(nested)]
    #[serde(default)]
    pub session: SessionConfig,

    /// Orbit camera path.
    #[validate(nested)]
    #[serde(default)]
    pub camera: CameraConfig,

    /// Render loop parameters.
    #[validate(nested)]
    #[serde(default)]
    pub benchmark: BenchmarkConfig,

    /// Engine profile timings log.
    #[validate(nested)]
    #[serde(default)]
    pub state_log: StateLogConfig,

    /// Offline backend parameters.
    #[validate(nested)]
    #[serde(default)]
    pub offline: OfflineConfig,

    /// Logging and metrics.
    #[validate(nested)]
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl RenderTestConfig {
    /// Load configuration from default files, an optional explicit file, and
    /// environment.
    ///
    /// Hierarchy:
    /// 1. Default Values
    /// 2. `config/rendbench.yaml` if present.
    /// 3. `path`, which must exist when given.
    /// 4. `RENDBENCH_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(RenderTestConfig::default()));

        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            figment = figment.merge(Yaml::file(DEFAULT_CONFIG_PATH));
        } else {
            debug!("{DEFAULT_CONFIG_PATH} not found, using default configuration");
        }

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(PathBuf::from(path)));
            }
            figment = figment.merge(Yaml::file(path));
        }

        Self::extract(figment)
    }

    /// Load configuration from a specific path only, ignoring the default file.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        let figment =
            Figment::from(Serialized::defaults(RenderTestConfig::default())).merge(Yaml::file(path));
        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }

    /// Effective configuration rendered as YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rendbench_core::engine::{ConnectionMode, Renderer};

    #[test]
    fn full_config_validation() {
        let config = RenderTestConfig::default();
        config.validate().expect("Default config should validate");
    }

    #[test]
    fn defaults_without_files() {
        Jail::expect_with(|_jail| {
            let config = RenderTestConfig::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config, RenderTestConfig::default());
            Ok(())
        });
    }

    #[test]
    fn file_and_environment_override() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file(
                DEFAULT_CONFIG_PATH,
                r#"
session:
  mode: direct
benchmark:
  num_runs: 7
  renderer: tiny_renderer
"#,
            )?;
            jail.set_env("RENDBENCH_BENCHMARK__NUM_RUNS", "20");

            let config = RenderTestConfig::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.session.mode, ConnectionMode::Direct);
            assert_eq!(config.session.width, 320);
            assert_eq!(config.benchmark.renderer, Renderer::TinyRenderer);
            assert_eq!(config.benchmark.num_runs, 20);
            Ok(())
        });
    }

    #[test]
    fn explicit_file_overrides_default_file() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file(DEFAULT_CONFIG_PATH, "benchmark:\n  num_runs: 7\n")?;
            jail.create_file("fast.yaml", "benchmark:\n  num_runs: 3\n")?;

            let config =
                RenderTestConfig::load(Some(Path::new("fast.yaml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.benchmark.num_runs, 3);
            Ok(())
        });
    }

    #[test]
    fn missing_explicit_file() {
        Jail::expect_with(|_jail| {
            let result = RenderTestConfig::load(Some(Path::new("nope.yaml")));
            assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
            Ok(())
        });
    }

    #[test]
    fn invalid_values_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("bad.yaml", "camera:\n  near: 5.0\n  far: 1.0\n")?;
            let result = RenderTestConfig::load_from_path("bad.yaml");
            assert!(matches!(result, Err(ConfigError::Validation(_))));
            Ok(())
        });
    }

    #[test]
    fn yaml_round_trip_of_effective_config() {
        let yaml = RenderTestConfig::default().to_yaml().unwrap();
        assert!(yaml.contains("plane.urdf"));
        assert!(yaml.contains("hardware_opengl"));
        assert!(yaml.contains("renderTimings"));
    }
}
