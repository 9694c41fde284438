// rendbench-config/src/session.rs
//! Engine session configuration.
//!
//! Defines how the session connects to the engine and which scene it builds:
//! - Connection mode and window/render options
//! - Asset list with per-asset base offsets
//! - World gravity

use std::path::PathBuf;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use rendbench_core::engine::ConnectionMode;

/// Engine session configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct SessionConfig {
    /// Connection mode (gui, direct).
    #[serde(default)]
    pub mode: ConnectionMode,

    /// Render target width in pixels.
    #[validate(range(min = 1, max = 8192))]
    #[serde(default = "default_width")]
    pub width: u32,

    /// Render target height in pixels.
    #[validate(range(min = 1, max = 8192))]
    #[serde(default = "default_height")]
    pub height: u32,

    /// Window backend selector forwarded to the engine.
    #[serde(default = "default_window_backend")]
    pub window_backend: u32,

    /// Render device selector forwarded to the engine.
    #[serde(default)]
    pub render_device: u32,

    /// Assets loaded after every reset, in order.
    #[validate(length(min = 1), nested)]
    #[serde(default = "default_assets")]
    pub assets: Vec<AssetConfig>,

    /// World gravity (m/s^2).
    #[serde(default = "default_gravity")]
    pub gravity: [f64; 3],

    /// Extra directory searched for assets by backends that resolve model
    /// files themselves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_search_path: Option<PathBuf>,
}

/// One model file and where its base goes.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct AssetConfig {
    /// Path resolved through the engine's search path.
    #[validate(length(min = 1))]
    pub path: String,

    /// Base position offset.
    #[serde(default)]
    pub offset: [f64; 3],
}

impl AssetConfig {
    pub fn new(path: impl Into<String>, offset: [f64; 3]) -> Self {
        Self {
            path: path.into(),
            offset,
        }
    }

    pub fn offset_vector(&self) -> Vector3<f64> {
        Vector3::from(self.offset)
    }
}

fn default_width() -> u32 {
    320
}

fn default_height() -> u32 {
    200
}

fn default_window_backend() -> u32 {
    2
}

fn default_assets() -> Vec<AssetConfig> {
    vec![
        AssetConfig::new("plane.urdf", [0.0, 0.0, -1.0]),
        AssetConfig::new("r2d2.urdf", [0.0; 3]),
        AssetConfig::new("duck_vhacd.urdf", [0.0; 3]),
    ]
}

fn default_gravity() -> [f64; 3] {
    [0.0, 0.0, -10.0]
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: ConnectionMode::default(),
            width: default_width(),
            height: default_height(),
            window_backend: default_window_backend(),
            render_device: 0,
            assets: default_assets(),
            gravity: default_gravity(),
            asset_search_path: None,
        }
    }
}

impl SessionConfig {
    /// Option string handed to the engine on connect.
    pub fn option_string(&self) -> String {
        format!(
            "--width={} --height={} --window_backend={} --render_device={}",
            self.width, self.height, self.window_backend, self.render_device
        )
    }

    pub fn gravity_vector(&self) -> Vector3<f64> {
        Vector3::from(self.gravity)
    }
}
