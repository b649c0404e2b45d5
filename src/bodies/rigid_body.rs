use crate::bodies::{MaterialId, RigidBodyType};
use crate::error::SimError;
use crate::math::{is_finite_quaternion, is_finite_vector, Isometry3, Quaternion, Transform, Vector3};
use crate::shapes::ShapeDesc;
use crate::Result;

/// Description of a rigid body to be added to the physics world
#[derive(Debug, Clone)]
pub struct BodyDesc {
    /// The body's collision shape
    pub shape: ShapeDesc,

    /// The body's mass, 0 for a static body
    pub mass: f32,

    /// The body's surface material
    pub material: MaterialId,

    /// The body's linear damping
    pub linear_damping: f32,

    /// The body's angular damping
    pub angular_damping: f32,

    /// Initial position of the body's center
    pub position: Vector3,

    /// Initial orientation
    pub rotation: Quaternion,

    /// Initial linear velocity
    pub linear_velocity: Vector3,
}

impl BodyDesc {
    /// Creates a body description at a position with identity rotation and no velocity
    pub fn new(shape: ShapeDesc, mass: f32, material: MaterialId, position: Vector3) -> Self {
        Self {
            shape,
            mass,
            material,
            linear_damping: 0.0,
            angular_damping: 0.0,
            position,
            rotation: Quaternion::identity(),
            linear_velocity: Vector3::zeros(),
        }
    }

    /// Creates a static (zero mass) body description
    pub fn new_static(shape: ShapeDesc, material: MaterialId, position: Vector3) -> Self {
        Self::new(shape, 0.0, material, position)
    }

    /// Sets the initial orientation
    pub fn with_rotation(mut self, rotation: Quaternion) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets the damping factors
    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    /// Sets the initial linear velocity
    pub fn with_linear_velocity(mut self, velocity: Vector3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Returns whether the body is dynamic or static
    pub fn body_type(&self) -> RigidBodyType {
        RigidBodyType::from_mass(self.mass)
    }

    /// Returns the initial pose of the body
    pub fn pose(&self) -> Isometry3 {
        Transform::from_position_rotation(self.position, self.rotation).isometry()
    }

    /// Checks the description and renormalizes the orientation
    pub(crate) fn validated(mut self) -> Result<Self> {
        if !(self.mass.is_finite() && self.mass >= 0.0) {
            return Err(SimError::InvalidParameter(format!(
                "mass must be finite and >= 0, got {}",
                self.mass
            )));
        }
        if self.linear_damping < 0.0 || self.angular_damping < 0.0 {
            return Err(SimError::InvalidParameter("damping cannot be negative".into()));
        }
        if !is_finite_vector(&self.position) || !is_finite_vector(&self.linear_velocity) {
            return Err(SimError::InvalidParameter("position and velocity must be finite".into()));
        }
        if !is_finite_quaternion(&self.rotation) {
            return Err(SimError::InvalidParameter("rotation must be finite".into()));
        }
        self.shape.validate()?;

        self.rotation.renormalize();
        Ok(self)
    }
}

/// Snapshot of a body's state after the latest step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    /// Whether the body is simulated or static
    pub body_type: RigidBodyType,

    /// The body's mass (0 for static bodies)
    pub mass: f32,

    /// Position of the body's center
    pub position: Vector3,

    /// Orientation of the body
    pub rotation: Quaternion,

    /// Linear velocity
    pub linear_velocity: Vector3,

    /// Angular velocity
    pub angular_velocity: Vector3,
}

impl BodyState {
    /// Returns the rigid pose of the body
    pub fn pose(&self) -> Isometry3 {
        Transform::from_position_rotation(self.position, self.rotation).isometry()
    }

    /// Returns true if every component of the state is finite
    pub fn is_finite(&self) -> bool {
        is_finite_vector(&self.position)
            && is_finite_quaternion(&self.rotation)
            && is_finite_vector(&self.linear_velocity)
            && is_finite_vector(&self.angular_velocity)
    }
}
