mod mesh;
mod node;
mod graph;
mod camera;

pub use self::mesh::{Color, GeometryId, MeshGeometry};
pub use self::node::{Light, NodeFlags, NodeId, NodeKind, SceneNode};
pub use self::graph::SceneGraph;
pub use self::camera::{Camera, CameraController};
