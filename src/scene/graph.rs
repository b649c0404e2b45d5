use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::SimError;
use crate::math::Transform;
use crate::scene::mesh::{GeometryId, MeshGeometry};
use crate::scene::node::{NodeId, NodeKind, SceneNode};
use crate::Result;

/// Flat scene graph owning nodes and the geometry they share
///
/// Nodes and geometries are keyed by ids that are never reused, so a stale id
/// simply fails to resolve.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: BTreeMap<NodeId, SceneNode>,
    geometries: BTreeMap<GeometryId, Arc<MeshGeometry>>,
    next_node: u32,
    next_geometry: u32,
}

impl SceneGraph {
    /// Creates an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores geometry and returns its id
    pub fn add_geometry(&mut self, geometry: MeshGeometry) -> GeometryId {
        self.next_geometry += 1;
        let id = GeometryId(self.next_geometry);
        self.geometries.insert(id, Arc::new(geometry));
        id
    }

    /// Gets geometry by id
    pub fn geometry(&self, id: GeometryId) -> Result<&Arc<MeshGeometry>> {
        self.geometries
            .get(&id)
            .ok_or_else(|| SimError::ResourceNotFound(format!("Geometry {:?} not found", id)))
    }

    /// Adds a node and returns its id
    pub fn add_node(&mut self, node: SceneNode) -> Result<NodeId> {
        if let NodeKind::Mesh { geometry } = node.kind {
            self.geometry(geometry)?;
        }

        Ok(self.insert_node(node))
    }

    /// Convenience for adding geometry plus a mesh node drawing it
    pub fn add_mesh(&mut self, geometry: MeshGeometry, transform: Transform) -> NodeId {
        let geometry = self.add_geometry(geometry);
        self.insert_node(SceneNode::mesh(geometry).with_transform(transform))
    }

    fn insert_node(&mut self, node: SceneNode) -> NodeId {
        self.next_node += 1;
        let id = NodeId(self.next_node);
        self.nodes.insert(id, node);
        id
    }

    /// Removes a node; geometry stays available to other nodes
    pub fn remove_node(&mut self, id: NodeId) -> Result<SceneNode> {
        self.nodes
            .remove(&id)
            .ok_or_else(|| SimError::ResourceNotFound(format!("Node {:?} not found", id)))
    }

    /// Gets a reference to a node
    pub fn node(&self, id: NodeId) -> Result<&SceneNode> {
        self.nodes
            .get(&id)
            .ok_or_else(|| SimError::ResourceNotFound(format!("Node {:?} not found", id)))
    }

    /// Gets a mutable reference to a node
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut SceneNode> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| SimError::ResourceNotFound(format!("Node {:?} not found", id)))
    }

    /// Gets the geometry drawn by a mesh node
    pub fn mesh_geometry(&self, id: NodeId) -> Result<(GeometryId, &Arc<MeshGeometry>)> {
        let node = self.node(id)?;
        let geometry = node.geometry().ok_or_else(|| {
            SimError::InvalidParameter(format!("Node {:?} has no renderable geometry", id))
        })?;
        Ok((geometry, self.geometry(geometry)?))
    }

    /// Returns the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether a node exists
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Iterates over all nodes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// Iterates over the visible nodes a renderer should draw, with their geometry
    pub fn renderables(&self) -> impl Iterator<Item = (NodeId, &SceneNode, &MeshGeometry)> {
        self.nodes.iter().filter_map(move |(id, node)| {
            if !node.flags.contains(crate::scene::NodeFlags::VISIBLE) {
                return None;
            }
            match node.kind {
                NodeKind::Mesh { geometry } => self
                    .geometries
                    .get(&geometry)
                    .map(|g| (*id, node, g.as_ref())),
                NodeKind::Group | NodeKind::Light(_) => None,
            }
        })
    }
}
