//! Scoped engine session.
//!
//! A `Session` exists only while the engine connection is up. Opening it
//! connects and builds the benchmark scene; dropping it disconnects, on every
//! exit path including errors raised while the scene is built and errors or
//! panics inside the benchmark.

use std::path::Path;

use tracing::{debug, info, instrument};

use rendbench_config::SessionConfig;
use rendbench_core::engine::{ConnectionMode, PhysicsEngine, VisualizerFlag};

use crate::engine::error::RenderTestError;

/// Visualizer overlays and preview panels switched off before rendering.
pub const DISABLED_OVERLAYS: [VisualizerFlag; 4] = [
    VisualizerFlag::Gui,
    VisualizerFlag::SegmentationMarkPreview,
    VisualizerFlag::DepthBufferPreview,
    VisualizerFlag::RgbBufferPreview,
];

/// Exclusive owner of one engine connection.
#[derive(Debug)]
pub struct Session<E: PhysicsEngine> {
    engine: E,
    handle: i32,
    mode: ConnectionMode,
}

impl<E: PhysicsEngine> Session<E> {
    /// Connects `engine` and loads the scene described by `config`.
    ///
    /// A negative connection handle fails with `RenderTestError::Connection`
    /// before any scene call is made, and the engine is not disconnected.
    #[instrument(skip_all, fields(mode = %config.mode))]
    pub fn open(mut engine: E, config: &SessionConfig) -> Result<Self, RenderTestError> {
        info!("connecting");
        let options = config.option_string();
        debug!(%options, "connect options");

        let handle = engine.connect(config.mode, &options);
        if handle < 0 {
            return Err(RenderTestError::Connection {
                handle,
                mode: config.mode,
            });
        }
        info!(handle, "connected");

        // From here on Drop owns the disconnect.
        let mut session = Self {
            engine,
            handle,
            mode: config.mode,
        };
        session.build_scene(config)?;
        Ok(session)
    }

    fn build_scene(&mut self, config: &SessionConfig) -> Result<(), RenderTestError> {
        for flag in DISABLED_OVERLAYS {
            self.engine.configure_visualizer(flag, false)?;
        }

        self.engine.reset_simulation()?;
        for asset in &config.assets {
            let body = self
                .engine
                .load_asset(Path::new(&asset.path), asset.offset_vector())?;
            debug!(path = %asset.path, ?body, "asset loaded");
        }
        self.engine.set_gravity(config.gravity_vector())?;
        Ok(())
    }

    pub fn handle(&self) -> i32 {
        self.handle
    }

    pub fn mode(&self) -> ConnectionMode {
        self.mode
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Ends the session now instead of at scope exit.
    pub fn close(self) {}
}

impl<E: PhysicsEngine> Drop for Session<E> {
    fn drop(&mut self) {
        self.engine.disconnect();
        info!(handle = self.handle, "disconnected");
    }
}
