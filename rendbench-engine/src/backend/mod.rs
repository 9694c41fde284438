//! Concrete engines the driver can run against.
//!
//! `bullet` wraps the native Bullet client and exists only with the `bullet`
//! cargo feature. `offline` runs the whole harness on the scripted engine with
//! virtual time, so it works on machines without a GPU or a Bullet build.

#[cfg(feature = "bullet")]
mod bullet;

#[cfg(feature = "bullet")]
pub use bullet::BulletEngine;

use rendbench_config::{RenderTestConfig, SessionConfig};
use rendbench_core::engine::PhysicsEngine;
use rendbench_simulator::{ScriptedEngine, VirtualClock};
use tracing::debug;

use crate::engine::RenderTestError;

/// Native Bullet engine, boxed so callers need not name the feature-gated type.
#[cfg(feature = "bullet")]
pub fn bullet_engine(session: &SessionConfig) -> Result<Box<dyn PhysicsEngine>, RenderTestError> {
    Ok(Box::new(BulletEngine::new(session.asset_search_path.clone())))
}

#[cfg(not(feature = "bullet"))]
pub fn bullet_engine(_session: &SessionConfig) -> Result<Box<dyn PhysicsEngine>, RenderTestError> {
    Err(RenderTestError::BackendUnavailable(
        "built without the `bullet` feature".into(),
    ))
}

/// Scripted engine charging `offline.frame_cost_us` of `clock` time per frame.
/// Pass the same clock to the driver to get exact FPS figures.
pub fn offline_engine(config: &RenderTestConfig, clock: VirtualClock) -> ScriptedEngine {
    let frame_cost = config.offline.frame_cost();
    debug!(?frame_cost, "offline engine");
    ScriptedEngine::new(clock, frame_cost)
}
