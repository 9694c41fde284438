// rendbench-config/src/camera.rs
//! Camera path configuration.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use rendbench_core::camera::{CameraRig, UpAxis};

use crate::validation;

/// Orbit camera parameters. Angles are in degrees.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
#[validate(schema(function = validation::validate_clip_planes))]
#[serde(default)]
pub struct CameraConfig {
    pub target: [f32; 3],

    #[validate(range(exclusive_min = 0.0))]
    pub distance: f32,

    pub pitch: f32,

    pub roll: f32,

    pub up_axis: UpAxis,

    /// Yaw advance per frame.
    #[validate(range(min = 1, max = 360))]
    pub yaw_step: u32,

    /// Vertical field of view.
    #[validate(range(exclusive_min = 0.0, exclusive_max = 180.0))]
    pub fov: f32,

    #[validate(range(exclusive_min = 0.0))]
    pub near: f32,

    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self::from(&CameraRig::default())
    }
}

impl From<&CameraRig> for CameraConfig {
    fn from(rig: &CameraRig) -> Self {
        Self {
            target: rig.target.into(),
            distance: rig.distance,
            pitch: rig.pitch,
            roll: rig.roll,
            up_axis: rig.up_axis,
            yaw_step: rig.yaw_step,
            fov: rig.fov,
            near: rig.near,
            far: rig.far,
        }
    }
}

impl CameraConfig {
    pub fn rig(&self) -> CameraRig {
        CameraRig {
            target: Vector3::from(self.target),
            distance: self.distance,
            pitch: self.pitch,
            roll: self.roll,
            up_axis: self.up_axis,
            yaw_step: self.yaw_step,
            fov: self.fov,
            near: self.near,
            far: self.far,
        }
    }
}
