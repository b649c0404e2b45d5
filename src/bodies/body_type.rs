/// Type of rigid body, determining how it behaves in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigidBodyType {
    /// Dynamic bodies are fully simulated (affected by forces, collisions, etc.)
    Dynamic,

    /// Static bodies never move unless placed explicitly
    Static,
}

impl RigidBodyType {
    /// Classifies a body by its mass: zero mass means immovable
    pub fn from_mass(mass: f32) -> Self {
        if mass == 0.0 {
            Self::Static
        } else {
            Self::Dynamic
        }
    }
}
