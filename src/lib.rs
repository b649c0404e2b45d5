pub mod math;
pub mod core;
pub mod bodies;
pub mod shapes;
pub mod scene;
pub mod assets;
pub mod chain;
pub mod terrain;
pub mod sim;

/// Re-export common types for easier usage
pub use crate::core::{PhysicsWorld, SimulationConfig, BodyHandle};
pub use crate::bodies::{BodyDesc, BodyState, BindingHandle, Material, MaterialId, RigidBodyRegistry};
pub use crate::shapes::{CollisionShapeDeriver, ShapeDesc};
pub use crate::scene::{Camera, MeshGeometry, NodeId, SceneGraph};
pub use crate::chain::{ChainSequencer, SpacingRule};
pub use crate::terrain::{HeightRaster, TerrainBuilder, TerrainMesh};
pub use crate::sim::{SimulationContext, SimulationLoop, Renderer};
pub use crate::math::{Vector3, Point3, Quaternion};

/// Error types for the simulation core
pub mod error {
    use crate::core::BodyHandle;
    use crate::math::Vector3;
    use crate::scene::NodeId;
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum SimError {
        #[error("Degenerate geometry: bounding extents {extents:?} have a zero-length axis")]
        DegenerateGeometry { extents: Vector3 },

        #[error("Node {0:?} is already bound to a rigid body")]
        AlreadyBound(NodeId),

        #[error("Operation requires a non-empty chain sequence")]
        EmptySequence,

        #[error("Heightmap of {width}x{height} is too small, at least 2x2 samples are required")]
        InsufficientResolution { width: usize, height: usize },

        #[error("Solver diverged: {} bodies have non-finite state", .bodies.len())]
        SolverDiverged { bodies: Vec<BodyHandle> },

        #[error("World is already configured: {0}")]
        AlreadyConfigured(String),

        #[error("Invalid parameter: {0}")]
        InvalidParameter(String),

        #[error("Resource not found: {0}")]
        ResourceNotFound(String),

        #[error("Asset load failed: {0}")]
        AssetLoad(String),
    }
}

/// Result type for simulation core operations
pub type Result<T> = std::result::Result<T, error::SimError>;

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
