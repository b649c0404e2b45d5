use crate::math::Transform;
use crate::scene::mesh::{Color, GeometryId};

/// Flags for controlling how a node is drawn
pub mod node_flags {
    use bitflags::bitflags;

    bitflags! {
        /// Render flags of a scene node
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct NodeFlags: u32 {
            /// Node is drawn
            const VISIBLE = 0x01;

            /// Node casts shadows onto other nodes
            const CAST_SHADOW = 0x02;

            /// Node receives shadows from other nodes
            const RECEIVE_SHADOW = 0x04;

            /// Node is shaded with per-face normals
            const FLAT_SHADING = 0x08;
        }
    }

    impl Default for NodeFlags {
        fn default() -> Self {
            Self::VISIBLE
        }
    }
}

pub use node_flags::NodeFlags;

/// Identifier of a node in a [`SceneGraph`](crate::scene::SceneGraph)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

/// A light source; its appearance is up to the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Light color
    pub color: Color,

    /// Light intensity
    pub intensity: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0, 1.0],
            intensity: 1.0,
        }
    }
}

/// What a scene node is
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A pure transform node without content
    Group,

    /// A drawable mesh referencing shared geometry
    Mesh {
        /// The geometry this mesh draws
        geometry: GeometryId,
    },

    /// A light source
    Light(Light),
}

/// A node of the scene graph
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    /// Optional human readable name
    pub name: Option<String>,

    /// Local-to-world transform (the graph is flat)
    pub transform: Transform,

    /// Render flags
    pub flags: NodeFlags,

    /// Node payload
    pub kind: NodeKind,
}

impl SceneNode {
    /// Creates a mesh node for the given geometry
    pub fn mesh(geometry: GeometryId) -> Self {
        Self {
            name: None,
            transform: Transform::identity(),
            flags: NodeFlags::default(),
            kind: NodeKind::Mesh { geometry },
        }
    }

    /// Creates an empty group node
    pub fn group() -> Self {
        Self {
            name: None,
            transform: Transform::identity(),
            flags: NodeFlags::default(),
            kind: NodeKind::Group,
        }
    }

    /// Creates a light node
    pub fn light(light: Light) -> Self {
        Self {
            name: None,
            transform: Transform::identity(),
            flags: NodeFlags::default(),
            kind: NodeKind::Light(light),
        }
    }

    /// Sets the node's name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the node's transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Adds render flags to the node
    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Returns the geometry drawn by this node, if it is a mesh
    pub fn geometry(&self) -> Option<GeometryId> {
        match self.kind {
            NodeKind::Mesh { geometry } => Some(geometry),
            NodeKind::Group | NodeKind::Light(_) => None,
        }
    }

    /// Returns true if this node carries geometry a renderer can draw
    pub fn has_renderable_geometry(&self) -> bool {
        self.geometry().is_some()
    }
}
