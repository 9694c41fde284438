//! Orbit camera used by the render benchmark.
//!
//! The camera circles a fixed target at a fixed distance and pitch; only yaw
//! advances, one step per frame, wrapping at 360 degrees. Matrices are
//! column-major OpenGL conventions (right-handed view, clip z in [-1, 1]).

use nalgebra::{Matrix4, Point3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// World axis treated as "up" by the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UpAxis {
    Y,
    #[default]
    Z,
}

impl UpAxis {
    pub fn index(self) -> usize {
        match self {
            UpAxis::Y => 1,
            UpAxis::Z => 2,
        }
    }
}

/// Camera placement for one frame. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub target: Vector3<f32>,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
    pub up_axis: UpAxis,
}

/// Perspective parameters. `fov` is the vertical field of view in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lens {
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

/// The fixed camera path of the benchmark.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    pub target: Vector3<f32>,
    pub distance: f32,
    pub pitch: f32,
    pub roll: f32,
    pub up_axis: UpAxis,
    pub yaw_step: u32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            target: Vector3::zeros(),
            distance: 4.0,
            pitch: -10.0,
            roll: 0.0,
            up_axis: UpAxis::Z,
            yaw_step: 10,
            fov: 60.0,
            near: 0.01,
            far: 100.0,
        }
    }
}

impl CameraRig {
    /// Endless yaw sequence `0, step, 2*step, ...` below 360, restarting at 0.
    pub fn yaw_cycle(&self) -> impl Iterator<Item = u32> + Clone {
        (0..360).step_by(self.yaw_step.max(1) as usize).cycle()
    }

    pub fn pose(&self, yaw: f32) -> CameraPose {
        CameraPose {
            target: self.target,
            distance: self.distance,
            yaw,
            pitch: self.pitch,
            roll: self.roll,
            up_axis: self.up_axis,
        }
    }

    pub fn lens(&self, width: u32, height: u32) -> Lens {
        Lens {
            fov: self.fov,
            aspect: width as f32 / height as f32,
            near: self.near,
            far: self.far,
        }
    }
}

/// View matrix of a camera orbiting `pose.target`.
///
/// With a z-up world the eye starts on the -y axis and is rotated by yaw about
/// z, roll about y and pitch about x; with a y-up world it starts on -z and is
/// rotated by roll about z, yaw about y and -pitch about x.
pub fn view_matrix_from_yaw_pitch_roll(pose: &CameraPose) -> Matrix4<f32> {
    let yaw = pose.yaw.to_radians();
    let pitch = pose.pitch.to_radians();
    let roll = pose.roll.to_radians();

    let (forward_axis, up, rotation) = match pose.up_axis {
        UpAxis::Y => (
            2,
            Vector3::y(),
            UnitQuaternion::from_euler_angles(-pitch, yaw, roll),
        ),
        UpAxis::Z => (
            1,
            Vector3::z(),
            UnitQuaternion::from_euler_angles(pitch, roll, yaw),
        ),
    };

    let mut eye = Vector3::zeros();
    eye[forward_axis] = -pose.distance;
    let eye = rotation * eye + pose.target;
    let up = rotation * up;

    Matrix4::look_at_rh(&Point3::from(eye), &Point3::from(pose.target), &up)
}

/// Perspective projection from a vertical field of view.
pub fn projection_matrix_fov(lens: &Lens) -> Matrix4<f32> {
    let y_scale = 1.0 / (lens.fov.to_radians() / 2.0).tan();
    let x_scale = y_scale / lens.aspect;
    let depth = lens.near - lens.far;

    #[rustfmt::skip]
    let m = Matrix4::new(
        x_scale, 0.0,     0.0,                            0.0,
        0.0,     y_scale, 0.0,                            0.0,
        0.0,     0.0,     (lens.far + lens.near) / depth, 2.0 * lens.far * lens.near / depth,
        0.0,     0.0,     -1.0,                           0.0,
    );
    m
}
