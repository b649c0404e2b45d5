use crate::math::{Point3, Vector3};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// A perspective camera; the renderer decides what to do with it
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Camera {
    /// Eye position
    pub position: Point3,

    /// Point the camera looks at
    pub target: Point3,

    /// Up direction
    pub up: Vector3,

    /// Vertical field of view in degrees
    pub fov_degrees: f32,

    /// Width / height of the viewport
    pub aspect: f32,

    /// Near clip distance
    pub near: f32,

    /// Far clip distance
    pub far: f32,
}

impl Camera {
    /// Creates a camera at `position` looking at `target`
    pub fn looking_at(position: Point3, target: Point3) -> Self {
        Self {
            position,
            target,
            ..Self::default()
        }
    }

    /// Returns the normalized viewing direction
    pub fn forward(&self) -> Vector3 {
        (self.target - self.position).normalize()
    }

    /// Returns the distance between eye and target
    pub fn distance(&self) -> f32 {
        (self.target - self.position).norm()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Point3::new(30.0, 20.0, 0.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov_degrees: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Something that moves the camera once per frame, e.g. orbit controls
pub trait CameraController {
    /// Updates the camera for a frame lasting `dt` seconds
    fn update(&mut self, camera: &mut Camera, dt: f32);
}
