//! The client surface of an external physics/rendering engine.
//!
//! Everything the benchmark does to the engine goes through `PhysicsEngine`.
//! Backends are blocking and single-threaded; a backend owns at most one
//! connection at a time.

use std::fmt;
use std::path::Path;

use nalgebra::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};

use crate::camera::{self, CameraPose, Lens};
use crate::error::EngineError;

/// How the client attaches to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMode {
    /// In-process engine with an interactive OpenGL window.
    #[default]
    Gui,
    /// Headless in-process engine.
    Direct,
}

impl ConnectionMode {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionMode::Gui => "GUI",
            ConnectionMode::Direct => "DIRECT",
        }
    }
}

impl fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// On-screen visualizer features the session switches off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualizerFlag {
    Gui,
    SegmentationMarkPreview,
    DepthBufferPreview,
    RgbBufferPreview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LogId(pub i32);

/// Kinds of engine-side state logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingKind {
    /// Per-call timing profile of the engine itself.
    ProfileTimings,
}

/// Rendering path used for camera images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Renderer {
    #[default]
    #[serde(rename = "hardware_opengl")]
    HardwareOpenGl,
    #[serde(rename = "tiny_renderer")]
    TinyRenderer,
}

/// One camera capture request.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraImageRequest {
    pub width: u32,
    pub height: u32,
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub shadow: bool,
    pub light_direction: Vector3<f32>,
    pub renderer: Renderer,
}

/// A rendered frame. `rgba` holds 4 bytes per pixel, row-major; `depth` and
/// `segmentation` hold one value per pixel (either may be empty when the
/// backend does not provide it).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    pub depth: Vec<f32>,
    pub segmentation: Vec<i32>,
}

impl CameraImage {
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Client API of a physics/rendering engine.
pub trait PhysicsEngine {
    /// Opens a connection. Returns the engine's handle; a negative value means
    /// the connection could not be established.
    fn connect(&mut self, mode: ConnectionMode, options: &str) -> i32;

    fn disconnect(&mut self);

    fn configure_visualizer(
        &mut self,
        flag: VisualizerFlag,
        enabled: bool,
    ) -> Result<(), EngineError>;

    fn reset_simulation(&mut self) -> Result<(), EngineError>;

    /// Loads a model file resolved through the engine's search path, placing its
    /// base at `offset`.
    fn load_asset(&mut self, path: &Path, offset: Vector3<f64>) -> Result<BodyId, EngineError>;

    fn set_gravity(&mut self, gravity: Vector3<f64>) -> Result<(), EngineError>;

    fn step_simulation(&mut self) -> Result<(), EngineError>;

    fn compute_view_matrix(&self, pose: &CameraPose) -> Matrix4<f32> {
        camera::view_matrix_from_yaw_pitch_roll(pose)
    }

    fn compute_projection_matrix(&self, lens: &Lens) -> Matrix4<f32> {
        camera::projection_matrix_fov(lens)
    }

    fn get_camera_image(&mut self, request: &CameraImageRequest)
        -> Result<CameraImage, EngineError>;

    fn start_state_logging(&mut self, kind: LoggingKind, path: &Path)
        -> Result<LogId, EngineError>;

    fn stop_state_logging(&mut self, log: LogId) -> Result<(), EngineError>;
}

impl<E: PhysicsEngine + ?Sized> PhysicsEngine for Box<E> {
    fn connect(&mut self, mode: ConnectionMode, options: &str) -> i32 {
        (**self).connect(mode, options)
    }

    fn disconnect(&mut self) {
        (**self).disconnect()
    }

    fn configure_visualizer(
        &mut self,
        flag: VisualizerFlag,
        enabled: bool,
    ) -> Result<(), EngineError> {
        (**self).configure_visualizer(flag, enabled)
    }

    fn reset_simulation(&mut self) -> Result<(), EngineError> {
        (**self).reset_simulation()
    }

    fn load_asset(&mut self, path: &Path, offset: Vector3<f64>) -> Result<BodyId, EngineError> {
        (**self).load_asset(path, offset)
    }

    fn set_gravity(&mut self, gravity: Vector3<f64>) -> Result<(), EngineError> {
        (**self).set_gravity(gravity)
    }

    fn step_simulation(&mut self) -> Result<(), EngineError> {
        (**self).step_simulation()
    }

    fn compute_view_matrix(&self, pose: &CameraPose) -> Matrix4<f32> {
        (**self).compute_view_matrix(pose)
    }

    fn compute_projection_matrix(&self, lens: &Lens) -> Matrix4<f32> {
        (**self).compute_projection_matrix(lens)
    }

    fn get_camera_image(
        &mut self,
        request: &CameraImageRequest,
    ) -> Result<CameraImage, EngineError> {
        (**self).get_camera_image(request)
    }

    fn start_state_logging(
        &mut self,
        kind: LoggingKind,
        path: &Path,
    ) -> Result<LogId, EngineError> {
        (**self).start_state_logging(kind, path)
    }

    fn stop_state_logging(&mut self, log: LogId) -> Result<(), EngineError> {
        (**self).stop_state_logging(log)
    }
}
