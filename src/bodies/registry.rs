use std::collections::{BTreeMap, HashMap};

use log::debug;

use crate::bodies::{BodyDesc, MaterialId};
use crate::core::{BodyHandle, PhysicsWorld};
use crate::error::SimError;
use crate::math::{Isometry3, Vector3};
use crate::scene::{NodeId, SceneGraph};
use crate::shapes::ShapeDesc;
use crate::Result;

/// Handle of a mesh/body binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingHandle(u32);

/// A visual mesh paired with the body that drives it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshBodyBinding {
    /// The scene node showing the body
    pub node: NodeId,

    /// The physics body
    pub body: BodyHandle,

    /// Pose the body was registered with, used for resets
    pub spawn_pose: Isometry3,
}

/// Owner of every mesh/body binding of a simulation
///
/// Nodes belong to the [`SceneGraph`] and bodies to the [`PhysicsWorld`]; a binding
/// only stores their ids.
#[derive(Debug, Default)]
pub struct RigidBodyRegistry {
    bindings: BTreeMap<BindingHandle, MeshBodyBinding>,
    by_node: HashMap<NodeId, BindingHandle>,
    by_body: HashMap<BodyHandle, BindingHandle>,
    next_id: u32,
}

impl RigidBodyRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a body for `node` at `position` and binds the two
    pub fn register(
        &mut self,
        world: &mut PhysicsWorld,
        scene: &mut SceneGraph,
        node: NodeId,
        shape: ShapeDesc,
        mass: f32,
        material: MaterialId,
        position: Vector3,
    ) -> Result<BindingHandle> {
        self.register_desc(world, scene, node, BodyDesc::new(shape, mass, material, position))
    }

    /// Adds a body from a full description and binds it to `node`
    pub fn register_desc(
        &mut self,
        world: &mut PhysicsWorld,
        scene: &mut SceneGraph,
        node: NodeId,
        desc: BodyDesc,
    ) -> Result<BindingHandle> {
        if self.by_node.contains_key(&node) {
            return Err(SimError::AlreadyBound(node));
        }
        if !scene.node(node)?.has_renderable_geometry() {
            return Err(SimError::InvalidParameter(format!(
                "Node {:?} has no renderable geometry to bind",
                node
            )));
        }

        let body = world.add_body(desc)?;
        let spawn_pose = world.body_pose(body)?;
        scene.node_mut(node)?.transform.set_isometry(&spawn_pose);

        self.next_id += 1;
        let handle = BindingHandle(self.next_id);
        self.bindings.insert(handle, MeshBodyBinding { node, body, spawn_pose });
        self.by_node.insert(node, handle);
        self.by_body.insert(body, handle);

        debug!("bound {:?} to {:?} as {:?}", node, body, handle);
        Ok(handle)
    }

    /// Removes a binding together with its body and its node
    pub fn unregister(
        &mut self,
        world: &mut PhysicsWorld,
        scene: &mut SceneGraph,
        handle: BindingHandle,
    ) -> Result<()> {
        let binding = self
            .bindings
            .remove(&handle)
            .ok_or_else(|| SimError::ResourceNotFound(format!("Binding {:?} not found", handle)))?;
        self.by_node.remove(&binding.node);
        self.by_body.remove(&binding.body);

        // Remove both halves even if one is already gone
        let body = world.remove_body(binding.body);
        let node = scene.remove_node(binding.node).map(|_| ());
        body.and(node)
    }

    /// Copies every body's pose onto its node; call once per tick after stepping
    ///
    /// Returns the number of nodes written.
    pub fn synchronize_all(&self, world: &PhysicsWorld, scene: &mut SceneGraph) -> Result<usize> {
        for binding in self.bindings.values() {
            let pose = world.body_pose(binding.body)?;
            scene.node_mut(binding.node)?.transform.set_isometry(&pose);
        }
        Ok(self.bindings.len())
    }

    /// Puts a bound body back at its spawn pose with zero velocity
    pub fn reset(&self, world: &mut PhysicsWorld, handle: BindingHandle) -> Result<()> {
        let binding = self.get(handle)?;
        world.reset_body(binding.body, binding.spawn_pose)
    }

    /// Gets a binding by handle
    pub fn get(&self, handle: BindingHandle) -> Result<&MeshBodyBinding> {
        self.bindings
            .get(&handle)
            .ok_or_else(|| SimError::ResourceNotFound(format!("Binding {:?} not found", handle)))
    }

    /// Finds the binding of a node
    pub fn binding_for_node(&self, node: NodeId) -> Option<BindingHandle> {
        self.by_node.get(&node).copied()
    }

    /// Finds the binding of a body
    pub fn binding_for_body(&self, body: BodyHandle) -> Option<BindingHandle> {
        self.by_body.get(&body).copied()
    }

    /// Returns whether a node is bound
    pub fn is_bound(&self, node: NodeId) -> bool {
        self.by_node.contains_key(&node)
    }

    /// Returns the number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns whether there are no bindings
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterates over bindings in registration order
    pub fn iter(&self) -> impl Iterator<Item = (BindingHandle, &MeshBodyBinding)> {
        self.bindings.iter().map(|(h, b)| (*h, b))
    }
}
