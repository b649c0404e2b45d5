use crate::math::{Isometry3, Point3, Quaternion, Vector3};
use nalgebra::Translation3;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Represents a transformation of a scene node (position, rotation, and scale)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Transform {
    /// Position in 3D space
    pub position: Vector3,

    /// Rotation as a unit quaternion
    pub rotation: Quaternion,

    /// Scale in each axis
    pub scale: Vector3,
}

impl Transform {
    /// Creates a new transform with the given position, rotation, and scale
    #[inline]
    pub fn new(position: Vector3, rotation: Quaternion, scale: Vector3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Creates a new identity transform (no translation, no rotation, unit scale)
    #[inline]
    pub fn identity() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: Quaternion::identity(),
            scale: Vector3::repeat(1.0),
        }
    }

    /// Creates a new transform from just a position
    #[inline]
    pub fn from_position(position: Vector3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Creates a new transform from just a rotation
    #[inline]
    pub fn from_rotation(rotation: Quaternion) -> Self {
        Self {
            rotation,
            ..Self::identity()
        }
    }

    /// Creates a new transform from a position and rotation
    #[inline]
    pub fn from_position_rotation(position: Vector3, rotation: Quaternion) -> Self {
        Self {
            position,
            rotation,
            scale: Vector3::repeat(1.0),
        }
    }

    /// Returns the rigid part (rotation + translation) of this transform
    #[inline]
    pub fn isometry(&self) -> Isometry3 {
        Isometry3::from_parts(Translation3::from(self.position), self.rotation)
    }

    /// Overwrites position and rotation from a rigid pose, keeping scale
    #[inline]
    pub fn set_isometry(&mut self, pose: &Isometry3) {
        self.position = pose.translation.vector;
        self.rotation = pose.rotation;
    }

    /// Transforms a point by this transform
    #[inline]
    pub fn transform_point(&self, point: &Point3) -> Point3 {
        let scaled = point.coords.component_mul(&self.scale);
        Point3::from(self.rotation * scaled + self.position)
    }

    /// Returns this transform with only its scale and rotation (no translation)
    #[inline]
    pub fn without_translation(&self) -> Self {
        Self {
            position: Vector3::zeros(),
            ..*self
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Isometry3> for Transform {
    fn from(pose: Isometry3) -> Self {
        Self::from_position_rotation(pose.translation.vector, pose.rotation)
    }
}
