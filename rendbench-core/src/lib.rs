//! # rendbench-core
//!
//! Foundation layer shared by the session manager, the benchmark runner and the
//! engine backends.
//!
//! ### Key Submodules:
//! - `engine`: the `PhysicsEngine` client trait and the values that cross it
//! - `camera`: orbit camera rig, yaw cycle, view/projection matrices
//! - `time`: `Clock` abstraction and frame-rate conversion
//! - `error`: `EngineError`

pub mod camera;
pub mod engine;
pub mod error;
pub mod time;

pub use error::EngineError;
