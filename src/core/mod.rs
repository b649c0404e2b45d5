pub mod world;
pub mod config;
pub mod events;
pub mod contact;

pub use self::world::PhysicsWorld;
pub use self::config::SimulationConfig;
pub use self::events::{EventQueue, BodyEvent, BodyEventType};
pub use self::contact::ContactRules;

use rapier3d::prelude::RigidBodyHandle;

/// A unique identifier for a body in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub(crate) RigidBodyHandle);

impl BodyHandle {
    /// Returns the raw (index, generation) pair, mostly for logging
    pub fn into_raw_parts(self) -> (u32, u32) {
        self.0.into_raw_parts()
    }
}
