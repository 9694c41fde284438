//! In-process stand-in for the physics/rendering engine.
//!
//! `ScriptedEngine` answers every `PhysicsEngine` call without native code:
//! frames are synthetic gradients, each capture costs a fixed amount of virtual
//! time, and every call lands in a shared `CallJournal` so callers can assert on
//! the exact call sequence after the engine itself has been moved or dropped.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use nalgebra::{Matrix4, Vector3};
use parking_lot::Mutex;
use tracing::{debug, trace};

use rendbench_core::camera::{self, CameraPose, Lens};
use rendbench_core::engine::{
    BodyId, CameraImage, CameraImageRequest, ConnectionMode, LogId, LoggingKind, PhysicsEngine,
    Renderer, VisualizerFlag,
};
use rendbench_core::EngineError;

use crate::virtual_clock::VirtualClock;

/// One recorded engine call.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Connect { mode: ConnectionMode, options: String },
    Disconnect,
    ConfigureVisualizer { flag: VisualizerFlag, enabled: bool },
    ResetSimulation,
    LoadAsset { path: PathBuf, offset: Vector3<f64> },
    SetGravity(Vector3<f64>),
    StepSimulation,
    ComputeViewMatrix { yaw: f32 },
    ComputeProjectionMatrix { aspect: f32 },
    GetCameraImage {
        width: u32,
        height: u32,
        shadow: bool,
        renderer: Renderer,
    },
    StartStateLogging { kind: LoggingKind, path: PathBuf },
    StopStateLogging(LogId),
}

impl EngineCall {
    /// True for calls that build the scene after a connect.
    pub fn is_scene_setup(&self) -> bool {
        matches!(
            self,
            EngineCall::ConfigureVisualizer { .. }
                | EngineCall::ResetSimulation
                | EngineCall::LoadAsset { .. }
                | EngineCall::SetGravity(_)
        )
    }
}

/// Shared, append-only record of engine calls.
#[derive(Debug, Clone, Default)]
pub struct CallJournal(Arc<Mutex<Vec<EngineCall>>>);

impl CallJournal {
    fn record(&self, call: EngineCall) {
        self.0.lock().push(call);
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.0.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }

    pub fn count(&self, pred: impl Fn(&EngineCall) -> bool) -> usize {
        self.0.lock().iter().filter(|call| pred(call)).count()
    }

    pub fn disconnects(&self) -> usize {
        self.count(|call| *call == EngineCall::Disconnect)
    }

    /// Shadow flag of every camera capture, in call order.
    pub fn shadow_flags(&self) -> Vec<bool> {
        self.0
            .lock()
            .iter()
            .filter_map(|call| match call {
                EngineCall::GetCameraImage { shadow, .. } => Some(*shadow),
                _ => None,
            })
            .collect()
    }

    /// Yaw of every view matrix request, in call order.
    pub fn yaws(&self) -> Vec<f32> {
        self.0
            .lock()
            .iter()
            .filter_map(|call| match call {
                EngineCall::ComputeViewMatrix { yaw } => Some(*yaw),
                _ => None,
            })
            .collect()
    }
}

/// Scripted engine backend.
#[derive(Debug)]
pub struct ScriptedEngine {
    clock: VirtualClock,
    frame_cost: Duration,
    connect_handle: i32,
    fail_render_after: Option<usize>,
    missing_assets: HashSet<PathBuf>,
    journal: CallJournal,
    connected: bool,
    frames_rendered: usize,
    next_body: i32,
    next_log: i32,
}

impl ScriptedEngine {
    /// Creates an engine that charges `frame_cost` of `clock` time per capture.
    pub fn new(clock: VirtualClock, frame_cost: Duration) -> Self {
        Self {
            clock,
            frame_cost,
            connect_handle: 0,
            fail_render_after: None,
            missing_assets: HashSet::new(),
            journal: CallJournal::default(),
            connected: false,
            frames_rendered: 0,
            next_body: 0,
            next_log: 0,
        }
    }

    /// Handle returned by `connect`; negative values refuse the connection.
    pub fn with_connect_handle(mut self, handle: i32) -> Self {
        self.connect_handle = handle;
        self
    }

    /// Makes every capture after the first `frames` fail.
    pub fn failing_render_after(mut self, frames: usize) -> Self {
        self.fail_render_after = Some(frames);
        self
    }

    /// Makes `load_asset` fail for `path`.
    pub fn with_missing_asset(mut self, path: impl Into<PathBuf>) -> Self {
        self.missing_assets.insert(path.into());
        self
    }

    pub fn journal(&self) -> CallJournal {
        self.journal.clone()
    }

    pub fn clock(&self) -> &VirtualClock {
        &self.clock
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    fn ensure_connected(&self) -> Result<(), EngineError> {
        if self.connected {
            Ok(())
        } else {
            Err(EngineError::NotConnected)
        }
    }
}

impl PhysicsEngine for ScriptedEngine {
    fn connect(&mut self, mode: ConnectionMode, options: &str) -> i32 {
        self.journal.record(EngineCall::Connect {
            mode,
            options: options.to_string(),
        });
        self.connected = self.connect_handle >= 0;
        debug!(handle = self.connect_handle, %mode, "scripted connect");
        self.connect_handle
    }

    fn disconnect(&mut self) {
        self.journal.record(EngineCall::Disconnect);
        self.connected = false;
    }

    fn configure_visualizer(
        &mut self,
        flag: VisualizerFlag,
        enabled: bool,
    ) -> Result<(), EngineError> {
        self.ensure_connected()?;
        self.journal
            .record(EngineCall::ConfigureVisualizer { flag, enabled });
        Ok(())
    }

    fn reset_simulation(&mut self) -> Result<(), EngineError> {
        self.ensure_connected()?;
        self.journal.record(EngineCall::ResetSimulation);
        self.next_body = 0;
        Ok(())
    }

    fn load_asset(&mut self, path: &Path, offset: Vector3<f64>) -> Result<BodyId, EngineError> {
        self.ensure_connected()?;
        self.journal.record(EngineCall::LoadAsset {
            path: path.to_path_buf(),
            offset,
        });
        if self.missing_assets.contains(path) {
            return Err(EngineError::AssetLoad {
                path: path.to_path_buf(),
                reason: "not found on search path".into(),
            });
        }
        let body = BodyId(self.next_body);
        self.next_body += 1;
        Ok(body)
    }

    fn set_gravity(&mut self, gravity: Vector3<f64>) -> Result<(), EngineError> {
        self.ensure_connected()?;
        self.journal.record(EngineCall::SetGravity(gravity));
        Ok(())
    }

    fn step_simulation(&mut self) -> Result<(), EngineError> {
        self.ensure_connected()?;
        self.journal.record(EngineCall::StepSimulation);
        Ok(())
    }

    fn compute_view_matrix(&self, pose: &CameraPose) -> Matrix4<f32> {
        self.journal
            .record(EngineCall::ComputeViewMatrix { yaw: pose.yaw });
        camera::view_matrix_from_yaw_pitch_roll(pose)
    }

    fn compute_projection_matrix(&self, lens: &Lens) -> Matrix4<f32> {
        self.journal.record(EngineCall::ComputeProjectionMatrix {
            aspect: lens.aspect,
        });
        camera::projection_matrix_fov(lens)
    }

    fn get_camera_image(
        &mut self,
        request: &CameraImageRequest,
    ) -> Result<CameraImage, EngineError> {
        self.ensure_connected()?;
        self.journal.record(EngineCall::GetCameraImage {
            width: request.width,
            height: request.height,
            shadow: request.shadow,
            renderer: request.renderer,
        });
        if let Some(limit) = self.fail_render_after {
            if self.frames_rendered >= limit {
                return Err(EngineError::Render(format!(
                    "scripted failure after {limit} frames"
                )));
            }
        }

        self.clock.advance_by(self.frame_cost);
        let image = synthetic_frame(request, self.frames_rendered);
        self.frames_rendered += 1;
        trace!(frame = self.frames_rendered, "scripted frame rendered");
        Ok(image)
    }

    fn start_state_logging(
        &mut self,
        kind: LoggingKind,
        path: &Path,
    ) -> Result<LogId, EngineError> {
        self.ensure_connected()?;
        self.journal.record(EngineCall::StartStateLogging {
            kind,
            path: path.to_path_buf(),
        });
        let log = LogId(self.next_log);
        self.next_log += 1;
        Ok(log)
    }

    fn stop_state_logging(&mut self, log: LogId) -> Result<(), EngineError> {
        self.ensure_connected()?;
        if log.0 < 0 || log.0 >= self.next_log {
            return Err(EngineError::StateLogging(format!("unknown log id {}", log.0)));
        }
        self.journal.record(EngineCall::StopStateLogging(log));
        Ok(())
    }
}

/// Gradient frame that shifts with the frame index; shadows darken the lower
/// half of the image.
fn synthetic_frame(request: &CameraImageRequest, frame: usize) -> CameraImage {
    let (width, height) = (request.width, request.height);
    let pixels = width as usize * height as usize;
    let mut rgba = Vec::with_capacity(pixels * 4);
    let shift = (frame * 7 % 256) as u32;

    for y in 0..height {
        let shade = if request.shadow && y >= height / 2 { 2 } else { 1 };
        for x in 0..width {
            let r = x * 255 / width.max(1);
            let g = y * 255 / height.max(1);
            let b = (x + y + shift) % 256;
            rgba.extend_from_slice(&[
                (r / shade) as u8,
                (g / shade) as u8,
                (b / shade) as u8,
                u8::MAX,
            ]);
        }
    }

    CameraImage {
        width,
        height,
        rgba,
        depth: vec![1.0; pixels],
        segmentation: vec![-1; pixels],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rendbench_core::camera::CameraRig;
    use rendbench_core::time::Clock;

    fn request(shadow: bool) -> CameraImageRequest {
        let rig = CameraRig::default();
        CameraImageRequest {
            width: 32,
            height: 20,
            view: camera::view_matrix_from_yaw_pitch_roll(&rig.pose(0.0)),
            projection: camera::projection_matrix_fov(&rig.lens(32, 20)),
            shadow,
            light_direction: Vector3::new(1.0, 1.0, 1.0),
            renderer: Renderer::HardwareOpenGl,
        }
    }

    #[test]
    fn test_refused_connection() {
        let mut engine = ScriptedEngine::new(VirtualClock::default(), Duration::ZERO)
            .with_connect_handle(-1);
        assert_eq!(engine.connect(ConnectionMode::Direct, ""), -1);
        assert!(!engine.is_connected());
        assert!(matches!(
            engine.step_simulation(),
            Err(EngineError::NotConnected)
        ));
    }

    #[test]
    fn test_frame_cost_advances_clock() {
        let clock = VirtualClock::default();
        let mut engine = ScriptedEngine::new(clock.clone(), Duration::from_millis(20));
        engine.connect(ConnectionMode::Gui, "");
        let image = engine.get_camera_image(&request(true)).unwrap();
        assert_eq!(clock.now(), Duration::from_millis(20));
        assert_eq!(image.rgba.len(), 32 * 20 * 4);
        assert_eq!(image.depth.len(), image.pixel_count());
        assert_eq!(image.segmentation.len(), image.pixel_count());
    }

    #[test]
    fn test_shadow_darkens_lower_half() {
        let mut engine = ScriptedEngine::new(VirtualClock::default(), Duration::ZERO);
        engine.connect(ConnectionMode::Gui, "");
        let lit = engine.get_camera_image(&request(false)).unwrap();
        let shadowed = engine.get_camera_image(&request(true)).unwrap();
        let last_row = (lit.pixel_count() - 32) * 4;
        assert!(shadowed.rgba[last_row + 1] < lit.rgba[last_row + 1]);
        assert_eq!(shadowed.rgba[1], lit.rgba[1]);
    }

    #[test]
    fn test_journal_records_calls() {
        let mut engine = ScriptedEngine::new(VirtualClock::default(), Duration::ZERO);
        let journal = engine.journal();
        engine.connect(ConnectionMode::Gui, "--width=32");
        engine.step_simulation().unwrap();
        engine.get_camera_image(&request(false)).unwrap();
        engine.disconnect();
        drop(engine);

        assert_eq!(journal.len(), 4);
        assert_eq!(journal.disconnects(), 1);
        assert_eq!(journal.shadow_flags(), vec![false]);
        assert_eq!(
            journal.calls()[0],
            EngineCall::Connect {
                mode: ConnectionMode::Gui,
                options: "--width=32".into()
            }
        );
    }

    #[test]
    fn test_missing_asset_and_render_failure() {
        let mut engine = ScriptedEngine::new(VirtualClock::default(), Duration::ZERO)
            .with_missing_asset("duck_vhacd.urdf")
            .failing_render_after(1);
        engine.connect(ConnectionMode::Gui, "");
        assert!(engine
            .load_asset(Path::new("r2d2.urdf"), Vector3::zeros())
            .is_ok());
        assert!(matches!(
            engine.load_asset(Path::new("duck_vhacd.urdf"), Vector3::zeros()),
            Err(EngineError::AssetLoad { .. })
        ));
        assert!(engine.get_camera_image(&request(false)).is_ok());
        assert!(matches!(
            engine.get_camera_image(&request(false)),
            Err(EngineError::Render(_))
        ));
    }

    #[test]
    fn test_state_log_ids() {
        let mut engine = ScriptedEngine::new(VirtualClock::default(), Duration::ZERO);
        engine.connect(ConnectionMode::Gui, "");
        let log = engine
            .start_state_logging(LoggingKind::ProfileTimings, Path::new("renderTimings"))
            .unwrap();
        assert_eq!(log, LogId(0));
        assert!(engine.stop_state_logging(log).is_ok());
        assert!(engine.stop_state_logging(LogId(5)).is_err());
    }
}
