use log::info;

use crate::bodies::{BindingHandle, BodyDesc, MaterialId, RigidBodyRegistry};
use crate::core::{BodyHandle, PhysicsWorld, SimulationConfig};
use crate::math::{Transform, Vector3};
use crate::scene::{NodeFlags, NodeId, SceneGraph, SceneNode};
use crate::shapes::{CollisionShapeDeriver, ShapeDesc};
use crate::terrain::TerrainMesh;
use crate::Result;

/// Smallest half-extent substituted for flat meshes registered without an explicit shape
pub const MIN_HALF_EXTENT: f32 = 0.01;

/// Terrain added to a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainHandle {
    /// Scene node drawing the terrain
    pub node: NodeId,

    /// Static collider body, if one was requested
    pub body: Option<BodyHandle>,
}

/// Everything one simulation owns
///
/// Several contexts can live side by side; nothing is shared between them.
#[derive(Debug)]
pub struct SimulationContext {
    /// The physics world
    pub world: PhysicsWorld,

    /// The visual scene
    pub scene: SceneGraph,

    /// Mesh/body bindings
    pub registry: RigidBodyRegistry,

    /// Shape cache for registered meshes
    pub shapes: CollisionShapeDeriver,
}

impl SimulationContext {
    /// Creates an empty simulation
    pub fn new(config: SimulationConfig) -> Result<Self> {
        Ok(Self {
            world: PhysicsWorld::with_config(config)?,
            scene: SceneGraph::new(),
            registry: RigidBodyRegistry::new(),
            shapes: CollisionShapeDeriver::new(),
        })
    }

    /// Adds a body for a resolved mesh node and binds the two
    pub fn register_body(
        &mut self,
        node: NodeId,
        shape: ShapeDesc,
        mass: f32,
        material: MaterialId,
        position: Vector3,
    ) -> Result<BindingHandle> {
        self.registry
            .register(&mut self.world, &mut self.scene, node, shape, mass, material, position)
    }

    /// Adds a body from a full description and binds it to `node`
    pub fn register_body_desc(&mut self, node: NodeId, desc: BodyDesc) -> Result<BindingHandle> {
        self.registry
            .register_desc(&mut self.world, &mut self.scene, node, desc)
    }

    /// Registers a mesh node with a box shape derived from its bounds
    ///
    /// Flat meshes get [`MIN_HALF_EXTENT`] on their degenerate axes.
    pub fn register_mesh(
        &mut self,
        node: NodeId,
        mass: f32,
        material: MaterialId,
        position: Vector3,
    ) -> Result<BindingHandle> {
        let shape = self.shapes.derive_or_min(&self.scene, node, MIN_HALF_EXTENT)?;
        let rotation = self.scene.node(node)?.transform.rotation;
        self.register_body_desc(
            node,
            BodyDesc::new(shape, mass, material, position).with_rotation(rotation),
        )
    }

    /// Removes a binding with its body and node
    pub fn unregister(&mut self, handle: BindingHandle) -> Result<()> {
        self.registry
            .unregister(&mut self.world, &mut self.scene, handle)
    }

    /// Adds a terrain mesh to the scene, optionally backed by a static collider
    pub fn add_terrain(&mut self, terrain: &TerrainMesh, collider: bool) -> Result<TerrainHandle> {
        let mut flags = NodeFlags::VISIBLE | NodeFlags::RECEIVE_SHADOW;
        if terrain.flat_shading {
            flags |= NodeFlags::FLAT_SHADING;
        }

        let geometry = self.scene.add_geometry(terrain.geometry.clone());
        let node = self.scene.add_node(
            SceneNode::mesh(geometry)
                .with_name("terrain")
                .with_transform(Transform::identity())
                .with_flags(flags),
        )?;

        let body = if collider {
            let desc = BodyDesc::new_static(terrain.collision_shape(), MaterialId::DEFAULT, Vector3::zeros());
            Some(self.world.add_body(desc)?)
        } else {
            None
        };

        info!(
            "terrain {}x{} added as {:?} (collider: {})",
            terrain.width, terrain.depth, node, collider
        );
        Ok(TerrainHandle { node, body })
    }

    /// Copies every bound body's pose onto its node
    pub fn synchronize(&mut self) -> Result<usize> {
        self.registry.synchronize_all(&self.world, &mut self.scene)
    }
}

impl Default for SimulationContext {
    fn default() -> Self {
        Self {
            world: PhysicsWorld::new(),
            scene: SceneGraph::new(),
            registry: RigidBodyRegistry::new(),
            shapes: CollisionShapeDeriver::new(),
        }
    }
}
