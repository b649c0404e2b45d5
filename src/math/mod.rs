mod transform;
mod aabb;

pub use transform::Transform;
pub use aabb::Aabb;

use nalgebra as na;

/// 3D vector used for positions, velocities and extents
pub type Vector3 = na::Vector3<f32>;

/// 3D point used for world-space locations
pub type Point3 = na::Point3<f32>;

/// Unit quaternion used for orientations
pub type Quaternion = na::UnitQuaternion<f32>;

/// Rigid transform (rotation + translation) without scale
pub type Isometry3 = na::Isometry3<f32>;

/// Unit-length direction vector
pub type Direction3 = na::Unit<na::Vector3<f32>>;

/// Constant for a very small number, used for comparisons
pub const EPSILON: f32 = 1.0e-6;

/// Returns true if the two floating point values are approximately equal
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Returns true if every component of the vector is finite
#[inline]
pub fn is_finite_vector(v: &Vector3) -> bool {
    v.iter().all(|c| c.is_finite())
}

/// Returns true if every component of the quaternion is finite
#[inline]
pub fn is_finite_quaternion(q: &Quaternion) -> bool {
    q.coords.iter().all(|c| c.is_finite())
}

/// Principal axes, used when laying bodies out in a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Returns the unit direction of this axis
    pub fn direction(self) -> Direction3 {
        match self {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        }
    }
}

impl From<Axis> for Direction3 {
    fn from(axis: Axis) -> Self {
        axis.direction()
    }
}
