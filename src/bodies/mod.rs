mod rigid_body;
mod material;
mod body_type;
pub mod registry;

pub use self::rigid_body::{BodyDesc, BodyState};
pub use self::material::{Material, MaterialId};
pub use self::body_type::RigidBodyType;
pub use self::registry::{BindingHandle, MeshBodyBinding, RigidBodyRegistry};

use crate::math::{Point3, Vector3};

/// Ways of setting a body in motion
///
/// Both exist because some scenes start a chain by overwriting the lead body's
/// velocity while others push it off-center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kick {
    /// Overwrite the linear velocity
    Velocity(Vector3),

    /// Impulse applied at the center of mass
    Impulse(Vector3),

    /// Impulse applied at a world-space point (can cause angular velocity change)
    ImpulseAtPoint {
        /// The impulse to apply
        impulse: Vector3,

        /// The point to apply the impulse at, in world space
        point: Point3,
    },
}
