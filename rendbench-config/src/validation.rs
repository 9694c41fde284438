// rendbench-config/src/validation.rs
//! Custom validation functions for configuration.
//!
//! Provides shared validation logic used across multiple configuration modules.

use validator::ValidationError;

use crate::camera::CameraConfig;

/// Validate a tracing level name.
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid = ["trace", "debug", "info", "warn", "error", "off"]
        .contains(&level.to_lowercase().as_str());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}

/// Validate that the far clip plane lies beyond the near one.
pub fn validate_clip_planes(camera: &CameraConfig) -> Result<(), ValidationError> {
    if camera.far > camera.near {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_clip_planes");
        error.message = Some("far plane must be greater than near plane".into());
        Err(error)
    }
}

/// Validate that a direction vector is not zero and is finite.
pub fn validate_direction(direction: &[f32; 3]) -> Result<(), ValidationError> {
    let finite = direction.iter().all(|c| c.is_finite());
    let nonzero = direction.iter().any(|c| *c != 0.0);
    if finite && nonzero {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_direction"))
    }
}
