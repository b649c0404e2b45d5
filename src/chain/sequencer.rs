use log::{info, warn};

use crate::bodies::{BindingHandle, BodyDesc, Kick, MaterialId};
use crate::chain::{ChainConfig, SpacingRule};
use crate::core::BodyHandle;
use crate::error::SimError;
use crate::math::{is_finite_vector, Direction3, Point3, Quaternion, Transform, Vector3};
use crate::scene::{GeometryId, NodeFlags, SceneNode};
use crate::shapes::ShapeDesc;
use crate::sim::SimulationContext;
use crate::Result;

/// Lays a row of identical bodies out along an axis and starts the chain reaction
///
/// Every body is a clone of one template geometry. The body at index 0 is the lead
/// and the only one [`trigger`](Self::trigger) acts on.
#[derive(Debug, Clone)]
pub struct ChainSequencer {
    geometry: GeometryId,
    shape: Option<ShapeDesc>,
    mass: f32,
    material: MaterialId,
    yaw_offset: f32,
    bindings: Vec<BindingHandle>,
}

impl ChainSequencer {
    /// Creates an empty sequencer cloning `geometry`
    ///
    /// The collision shape is derived from the geometry bounds unless one is set
    /// with [`with_shape`](Self::with_shape).
    pub fn new(geometry: GeometryId, mass: f32, material: MaterialId) -> Self {
        Self {
            geometry,
            shape: None,
            mass,
            material,
            yaw_offset: 0.0,
            bindings: Vec::new(),
        }
    }

    /// Creates an empty sequencer taking mass, material and yaw from a config
    pub fn from_config(geometry: GeometryId, config: &ChainConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(geometry, config.mass, config.material).with_yaw_offset(config.yaw_offset))
    }

    /// Creates a sequencer and places the chain a config describes
    pub fn build(ctx: &mut SimulationContext, geometry: GeometryId, config: &ChainConfig) -> Result<Self> {
        let mut chain = Self::from_config(geometry, config)?;
        chain.place(ctx, config.count, config.spacing, config.start, config.axis.direction())?;
        Ok(chain)
    }

    /// Uses an explicit collision shape instead of deriving one
    pub fn with_shape(mut self, shape: ShapeDesc) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Sets the alternating yaw offset in radians
    pub fn with_yaw_offset(mut self, yaw_offset: f32) -> Self {
        self.yaw_offset = yaw_offset;
        self
    }

    /// Creates and registers `count` bodies at `start + i * spacing * axis`
    ///
    /// Fails if the sequencer already holds a chain, if the mass is not positive, or
    /// if the spacing does not exceed the body extent along `axis`. A failure while
    /// placing removes every body placed so far.
    pub fn place(
        &mut self,
        ctx: &mut SimulationContext,
        count: usize,
        spacing: SpacingRule,
        start: Vector3,
        axis: Direction3,
    ) -> Result<&[BindingHandle]> {
        if !self.bindings.is_empty() {
            return Err(SimError::AlreadyConfigured(format!(
                "chain already holds {} bodies",
                self.bindings.len()
            )));
        }
        if !is_finite_vector(&start) {
            return Err(SimError::InvalidParameter("chain start must be finite".into()));
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(SimError::InvalidParameter(format!(
                "chain mass must be finite and positive, got {}",
                self.mass
            )));
        }

        let shape = match &self.shape {
            Some(shape) => shape.clone(),
            None => ctx
                .shapes
                .derive_geometry(&ctx.scene, self.geometry, Vector3::repeat(1.0))?,
        };
        let step = spacing.resolve(&shape, &axis)?;

        for i in 0..count {
            let position = start + axis.into_inner() * (step * i as f32);
            let yaw = if i % 2 == 0 { self.yaw_offset } else { -self.yaw_offset };
            let rotation = Quaternion::from_axis_angle(&Vector3::y_axis(), yaw);

            let desc = BodyDesc::new(shape.clone(), self.mass, self.material, position).with_rotation(rotation);
            let node = SceneNode::mesh(self.geometry)
                .with_name(format!("chain-{}", i))
                .with_transform(Transform::from_position_rotation(position, rotation))
                .with_flags(NodeFlags::VISIBLE | NodeFlags::CAST_SHADOW);

            if let Err(e) = self.place_one(ctx, node, desc) {
                warn!("placing chain body {} failed, rolling back: {}", i, e);
                self.clear(ctx)?;
                return Err(e);
            }
        }

        info!("placed chain of {} bodies, spacing {}", count, step);
        Ok(self.bindings.as_slice())
    }

    // A node is only kept once its body is bound
    fn place_one(&mut self, ctx: &mut SimulationContext, node: SceneNode, desc: BodyDesc) -> Result<()> {
        let node = ctx.scene.add_node(node)?;
        match ctx.register_body_desc(node, desc) {
            Ok(binding) => {
                self.bindings.push(binding);
                Ok(())
            }
            Err(e) => {
                ctx.scene.remove_node(node)?;
                Err(e)
            }
        }
    }

    /// Applies an impulse at a world point to the lead body
    pub fn trigger(&self, ctx: &mut SimulationContext, impulse: Vector3, point: Point3) -> Result<()> {
        self.kick(ctx, Kick::ImpulseAtPoint { impulse, point })
    }

    /// Starts the chain by overwriting the lead body's linear velocity
    pub fn trigger_velocity(&self, ctx: &mut SimulationContext, velocity: Vector3) -> Result<()> {
        self.kick(ctx, Kick::Velocity(velocity))
    }

    /// Sets the lead body in motion
    pub fn kick(&self, ctx: &mut SimulationContext, kick: Kick) -> Result<()> {
        let lead = self.lead_body(ctx)?;
        info!("triggering chain: {:?}", kick);
        ctx.world.kick(lead, kick)
    }

    /// Returns the lead binding, if any
    pub fn lead(&self) -> Option<BindingHandle> {
        self.bindings.first().copied()
    }

    fn lead_body(&self, ctx: &SimulationContext) -> Result<BodyHandle> {
        let lead = self.lead().ok_or(SimError::EmptySequence)?;
        Ok(ctx.registry.get(lead)?.body)
    }

    /// Returns the bindings in placement order
    pub fn bindings(&self) -> &[BindingHandle] {
        &self.bindings
    }

    /// Returns the number of bodies
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns whether no bodies are placed
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Current body positions in placement order
    pub fn positions(&self, ctx: &SimulationContext) -> Result<Vec<Vector3>> {
        self.bindings
            .iter()
            .map(|handle| {
                let body = ctx.registry.get(*handle)?.body;
                Ok(ctx.world.body_pose(body)?.translation.vector)
            })
            .collect()
    }

    /// Removes every body and node of the chain
    pub fn clear(&mut self, ctx: &mut SimulationContext) -> Result<()> {
        for handle in self.bindings.drain(..) {
            ctx.unregister(handle)?;
        }
        Ok(())
    }
}
