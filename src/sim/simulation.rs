use std::collections::BTreeMap;
use std::fmt;

use log::{debug, warn};

use crate::core::BodyHandle;
use crate::error::SimError;
use crate::math::{Axis, Quaternion};
use crate::scene::{Camera, CameraController, NodeId, SceneGraph};
use crate::sim::SimulationContext;
use crate::Result;

/// Anything that can draw a scene from a camera
pub trait Renderer {
    /// Draws the scene
    fn render(&mut self, scene: &SceneGraph, camera: &Camera);
}

/// What a tick or frame did
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickReport {
    /// Frame number, starting at 1
    pub tick: u64,

    /// Fixed steps taken
    pub steps: u32,

    /// Nodes synchronized from their bodies
    pub synchronized: usize,

    /// Bodies reset after the solver diverged
    pub diverged: Vec<BodyHandle>,
}

/// Drives a [`SimulationContext`] frame by frame
///
/// Each frame runs, in this order: camera controller, fixed physics step(s),
/// node spinning, synchronization, render.
pub struct SimulationLoop<R: Renderer> {
    renderer: R,
    camera: Camera,
    controller: Option<Box<dyn CameraController>>,
    fixed_delta: f32,
    max_substeps: u32,
    accumulator: f32,
    ticks: u64,
    rotation_speed: f32,
    spinners: BTreeMap<NodeId, Vec<Axis>>,
}

impl<R: Renderer> SimulationLoop<R> {
    /// Creates a loop stepping by the context's configured time step
    pub fn new(ctx: &SimulationContext, renderer: R) -> Self {
        let config = ctx.world.get_config();
        Self {
            renderer,
            camera: Camera::default(),
            controller: None,
            fixed_delta: config.time_step,
            max_substeps: config.max_substeps,
            accumulator: 0.0,
            ticks: 0,
            rotation_speed: 0.0,
            spinners: BTreeMap::new(),
        }
    }

    /// Replaces the camera
    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    /// Installs a camera controller run at the start of every frame
    pub fn with_controller(mut self, controller: impl CameraController + 'static) -> Self {
        self.controller = Some(Box::new(controller));
        self
    }

    /// Runs one frame with exactly one fixed step
    pub fn tick(&mut self, ctx: &mut SimulationContext) -> Result<TickReport> {
        self.frame(ctx, self.fixed_delta, 1)
    }

    /// Runs one frame for `elapsed` seconds of real time
    ///
    /// Takes as many fixed steps as fit in the accumulated time, at least one and
    /// at most `max_substeps`. Time beyond that is dropped.
    pub fn advance(&mut self, ctx: &mut SimulationContext, elapsed: f32) -> Result<TickReport> {
        if !(elapsed.is_finite() && elapsed >= 0.0) {
            return Err(SimError::InvalidParameter(format!(
                "elapsed time must be non-negative, got {}",
                elapsed
            )));
        }

        self.accumulator += elapsed;
        let due = (self.accumulator / self.fixed_delta).floor() as u32;
        let steps = due.clamp(1, self.max_substeps);
        if due > self.max_substeps {
            debug!("dropping {} steps of backlog", due - self.max_substeps);
            self.accumulator = 0.0;
        } else {
            self.accumulator = (self.accumulator - steps as f32 * self.fixed_delta).max(0.0);
        }

        self.frame(ctx, elapsed, steps)
    }

    /// Runs `frames` one-step frames
    pub fn run_frames(&mut self, ctx: &mut SimulationContext, frames: usize) -> Result<()> {
        for _ in 0..frames {
            self.tick(ctx)?;
        }
        Ok(())
    }

    fn frame(&mut self, ctx: &mut SimulationContext, elapsed: f32, steps: u32) -> Result<TickReport> {
        self.ticks += 1;

        if let Some(controller) = self.controller.as_mut() {
            controller.update(&mut self.camera, elapsed);
        }

        let mut diverged = Vec::new();
        for _ in 0..steps {
            diverged.extend(self.step(ctx)?);
        }

        self.spin_nodes(ctx, elapsed);
        let synchronized = ctx.synchronize()?;
        self.renderer.render(&ctx.scene, &self.camera);

        Ok(TickReport {
            tick: self.ticks,
            steps,
            synchronized,
            diverged,
        })
    }

    fn step(&mut self, ctx: &mut SimulationContext) -> Result<Vec<BodyHandle>> {
        let bodies = match ctx.world.step(self.fixed_delta) {
            Ok(()) => return Ok(Vec::new()),
            Err(SimError::SolverDiverged { bodies }) => bodies,
            Err(e) => return Err(e),
        };

        for body in &bodies {
            match ctx.registry.binding_for_body(*body) {
                Some(binding) => {
                    warn!("tick {}: resetting diverged body {:?}", self.ticks, body);
                    ctx.registry.reset(&mut ctx.world, binding)?;
                }
                None => {
                    warn!("tick {}: removing diverged unbound body {:?}", self.ticks, body);
                    ctx.world.remove_body(*body)?;
                }
            }
        }
        Ok(bodies)
    }

    fn spin_nodes(&mut self, ctx: &mut SimulationContext, dt: f32) {
        let before = self.spinners.len();
        self.spinners.retain(|node, _| ctx.scene.contains(*node));
        if self.spinners.len() < before {
            debug!("dropped {} removed nodes from spinning", before - self.spinners.len());
        }

        let angle = self.rotation_speed * dt * 0.1;
        if angle == 0.0 {
            return;
        }

        for (node, axes) in &self.spinners {
            // Bound nodes follow their bodies
            if ctx.registry.is_bound(*node) {
                continue;
            }
            if let Ok(node) = ctx.scene.node_mut(*node) {
                for axis in axes {
                    node.transform.rotation *= Quaternion::from_axis_angle(&axis.direction(), angle);
                }
            }
        }
    }

    /// Sets how fast spinning nodes turn
    pub fn set_rotation_speed(&mut self, speed: f32) {
        self.rotation_speed = if speed.is_finite() { speed } else { 0.0 };
    }

    /// Returns the spin speed
    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    /// Makes a node turn about the given local axes every frame
    pub fn spin(&mut self, node: NodeId, axes: &[Axis]) {
        self.spinners.insert(node, axes.to_vec());
    }

    /// Stops a node from spinning
    pub fn stop_spinning(&mut self, node: NodeId) {
        self.spinners.remove(&node);
    }

    /// Returns whether a node is registered for spinning
    pub fn is_spinning(&self, node: NodeId) -> bool {
        self.spinners.contains_key(&node)
    }

    /// Returns the number of frames run
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Returns the fixed step length
    pub fn fixed_delta(&self) -> f32 {
        self.fixed_delta
    }

    /// Returns the camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Returns the camera for direct manipulation
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Returns the renderer
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Returns the renderer mutably
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

impl<R: Renderer + fmt::Debug> fmt::Debug for SimulationLoop<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationLoop")
            .field("renderer", &self.renderer)
            .field("camera", &self.camera)
            .field("fixed_delta", &self.fixed_delta)
            .field("ticks", &self.ticks)
            .field("rotation_speed", &self.rotation_speed)
            .finish()
    }
}
