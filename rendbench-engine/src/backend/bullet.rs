//! `PhysicsEngine` over the native Bullet client.

use std::path::{Path, PathBuf};

use nalgebra::Vector3;
use rubullet::{
    CameraImageOptions, DebugVisualizerFlag, LoggingType, Mode, PhysicsClient, UrdfOptions,
};
use tracing::{debug, warn};

use rendbench_core::engine::{
    BodyId, CameraImage, CameraImageRequest, ConnectionMode, LogId, LoggingKind, PhysicsEngine,
    Renderer, VisualizerFlag,
};
use rendbench_core::EngineError;

/// Owns at most one Bullet client. Dropping the client ends the connection.
#[derive(Default)]
pub struct BulletEngine {
    client: Option<PhysicsClient>,
    search_path: Option<PathBuf>,
    logs: Vec<Option<rubullet::LogId>>,
    bodies: i32,
}

impl BulletEngine {
    pub fn new(search_path: Option<PathBuf>) -> Self {
        Self {
            search_path,
            ..Self::default()
        }
    }

    fn client(&mut self) -> Result<&mut PhysicsClient, EngineError> {
        self.client.as_mut().ok_or(EngineError::NotConnected)
    }
}

/// Pixel extent in the client's `usize` units.
fn image_extent(request: &CameraImageRequest) -> (usize, usize) {
    (request.width as usize, request.height as usize)
}

fn backend(err: impl std::fmt::Display) -> EngineError {
    EngineError::Backend(err.to_string())
}

impl PhysicsEngine for BulletEngine {
    fn connect(&mut self, mode: ConnectionMode, options: &str) -> i32 {
        if self.client.is_some() {
            warn!("already connected");
            return -1;
        }
        // The client only accepts options on the GUI example browser path.
        debug!(options, "window options not forwarded to the native client");

        let bullet_mode = match mode {
            ConnectionMode::Gui => Mode::Gui,
            ConnectionMode::Direct => Mode::Direct,
        };
        let mut client = match PhysicsClient::connect(bullet_mode) {
            Ok(client) => client,
            Err(err) => {
                warn!(%err, "bullet connect failed");
                return -1;
            }
        };
        if let Some(path) = &self.search_path {
            if let Err(err) = client.set_additional_search_path(path) {
                warn!(%err, path = %path.display(), "search path rejected");
                return -1;
            }
        }
        self.client = Some(client);
        0
    }

    fn disconnect(&mut self) {
        self.client = None;
        self.logs.clear();
    }

    fn configure_visualizer(
        &mut self,
        flag: VisualizerFlag,
        enabled: bool,
    ) -> Result<(), EngineError> {
        let flag = match flag {
            VisualizerFlag::Gui => DebugVisualizerFlag::CovEnableGui,
            VisualizerFlag::SegmentationMarkPreview => {
                DebugVisualizerFlag::CovEnableSegmentationMarkPreview
            }
            VisualizerFlag::DepthBufferPreview => DebugVisualizerFlag::CovEnableDepthBufferPreview,
            VisualizerFlag::RgbBufferPreview => DebugVisualizerFlag::CovEnableRgbBufferPreview,
        };
        self.client()?.configure_debug_visualizer(flag, enabled);
        Ok(())
    }

    fn reset_simulation(&mut self) -> Result<(), EngineError> {
        self.client()?.reset_simulation();
        Ok(())
    }

    fn load_asset(&mut self, path: &Path, offset: Vector3<f64>) -> Result<BodyId, EngineError> {
        let mut options = UrdfOptions::default();
        let offset: [f64; 3] = offset.into();
        options.base_transform.translation.vector = offset.into();

        self.client()?
            .load_urdf(path, options)
            .map_err(|err| EngineError::AssetLoad {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;
        let id = BodyId(self.bodies);
        self.bodies += 1;
        Ok(id)
    }

    fn set_gravity(&mut self, gravity: Vector3<f64>) -> Result<(), EngineError> {
        let gravity: [f64; 3] = gravity.into();
        self.client()?.set_gravity(gravity);
        Ok(())
    }

    fn step_simulation(&mut self) -> Result<(), EngineError> {
        self.client()?.step_simulation().map_err(backend)
    }

    fn get_camera_image(
        &mut self,
        request: &CameraImageRequest,
    ) -> Result<CameraImage, EngineError> {
        let (width, height) = image_extent(request);
        let view: [[f32; 4]; 4] = request.view.into();
        let projection: [[f32; 4]; 4] = request.projection.into();
        let light: [f32; 3] = request.light_direction.into();
        let renderer = match request.renderer {
            Renderer::HardwareOpenGl => rubullet::Renderer::BulletHardwareOpenGl,
            Renderer::TinyRenderer => rubullet::Renderer::TinyRenderer,
        };

        let images = self
            .client()?
            .get_camera_image(
                width,
                height,
                CameraImageOptions {
                    view_matrix: Some(view.into()),
                    projection_matrix: Some(projection.into()),
                    light_direction: Some(light.into()),
                    shadow: Some(request.shadow),
                    renderer: Some(renderer),
                    ..Default::default()
                },
            )
            .map_err(|err| EngineError::Render(err.to_string()))?;

        Ok(CameraImage {
            width: images.rgba.width(),
            height: images.rgba.height(),
            rgba: images.rgba.into_raw(),
            depth: images.depth.into_raw(),
            segmentation: Vec::new(),
        })
    }

    fn start_state_logging(
        &mut self,
        kind: LoggingKind,
        path: &Path,
    ) -> Result<LogId, EngineError> {
        let logging_type = match kind {
            LoggingKind::ProfileTimings => LoggingType::ProfileTimings,
        };
        let log = self
            .client()?
            .start_state_logging(logging_type, path, None)
            .map_err(|err| EngineError::StateLogging(err.to_string()))?;
        self.logs.push(Some(log));
        Ok(LogId(self.logs.len() as i32 - 1))
    }

    fn stop_state_logging(&mut self, log: LogId) -> Result<(), EngineError> {
        let slot = usize::try_from(log.0)
            .ok()
            .and_then(|i| self.logs.get_mut(i))
            .and_then(Option::take)
            .ok_or_else(|| EngineError::StateLogging(format!("unknown log {}", log.0)))?;
        self.client()?.stop_state_logging(slot);
        Ok(())
    }
}
