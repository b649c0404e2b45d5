use std::fmt;

use log::{debug, info, warn};
use rapier3d::prelude::*;

use crate::bodies::{BodyDesc, BodyState, Kick, Material, MaterialId, RigidBodyType};
use crate::core::{BodyEventType, BodyHandle, ContactRules, EventQueue, SimulationConfig};
use crate::error::SimError;
use crate::math::{is_finite_quaternion, is_finite_vector, Isometry3, Point3, Vector3};
use crate::Result;

/// The physics world: a thin owner of the rapier pipeline and its sets
///
/// Gravity and solver parameters are fixed once the first body is added.
pub struct PhysicsWorld {
    /// Configuration for the simulation
    config: SimulationConfig,

    /// Per-material defaults and per-pair contact rules
    contact_rules: ContactRules,

    /// Queue of body events produced since the last step
    events: EventQueue,

    /// The total elapsed simulation time
    time: f64,

    /// Number of completed steps
    steps: u64,

    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    /// Creates a new physics world with default settings
    pub fn new() -> Self {
        Self::build(SimulationConfig::default())
    }

    /// Creates a new physics world with the given configuration
    pub fn with_config(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: SimulationConfig) -> Self {
        let integration_parameters = Self::integration_parameters(&config);

        info!(
            "physics world: gravity {:?}, {} solver iterations, tolerance {}",
            config.gravity, config.solver_iterations, config.solver_tolerance
        );

        Self {
            config,
            contact_rules: ContactRules::new(),
            events: EventQueue::new(),
            time: 0.0,
            steps: 0,
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    fn integration_parameters(config: &SimulationConfig) -> IntegrationParameters {
        IntegrationParameters {
            dt: config.time_step,
            max_velocity_iterations: config.solver_iterations,
            allowed_linear_error: config.solver_tolerance,
            ..IntegrationParameters::default()
        }
    }

    /// Sets gravity and solver parameters; only allowed before any body exists
    pub fn configure(&mut self, gravity: Vector3, solver_iterations: usize, solver_tolerance: f32) -> Result<()> {
        if !self.bodies.is_empty() {
            return Err(SimError::AlreadyConfigured(format!(
                "{} bodies already live in the world",
                self.bodies.len()
            )));
        }

        let config = SimulationConfig {
            gravity,
            solver_iterations,
            solver_tolerance,
            ..self.config.clone()
        };
        config.validate()?;

        self.integration_parameters = Self::integration_parameters(&config);
        self.config = config;

        info!(
            "physics world reconfigured: gravity {:?}, {} iterations, tolerance {}",
            gravity, solver_iterations, solver_tolerance
        );
        Ok(())
    }

    /// Returns a reference to the simulation configuration
    pub fn get_config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Gets the current gravity
    pub fn get_gravity(&self) -> Vector3 {
        self.config.gravity
    }

    /// Returns the current simulation time in seconds
    pub fn get_time(&self) -> f64 {
        self.time
    }

    /// Returns the number of completed steps
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    /// Defines the surface response used by bodies of a material
    pub fn define_material(&mut self, id: MaterialId, material: Material) -> Result<()> {
        material.validate()?;
        self.contact_rules.define(id, material);
        Ok(())
    }

    /// Adds a friction/restitution rule for contacts between two materials
    pub fn add_contact_rule(&mut self, a: MaterialId, b: MaterialId, friction: f32, restitution: f32) -> Result<()> {
        let response = Material::new(friction, restitution);
        response.validate()?;

        if self.contact_rules.insert(a, b, response).is_some() {
            debug!("contact rule {:?}/{:?} replaced", a, b);
        }
        Ok(())
    }

    /// Returns the contact rule table
    pub fn contact_rules(&self) -> &ContactRules {
        &self.contact_rules
    }

    /// Adds a rigid body to the world and returns its handle
    pub fn add_body(&mut self, desc: BodyDesc) -> Result<BodyHandle> {
        let desc = desc.validated()?;

        let builder = match desc.body_type() {
            RigidBodyType::Static => RigidBodyBuilder::fixed(),
            RigidBodyType::Dynamic => RigidBodyBuilder::dynamic()
                .linvel(desc.linear_velocity)
                .ccd_enabled(self.config.use_ccd),
        };

        let linear_damping = self.config.linear_damping + desc.linear_damping;
        let angular_damping = self.config.angular_damping + desc.angular_damping;

        let body = builder
            .position(desc.pose())
            .linear_damping(linear_damping)
            .angular_damping(angular_damping)
            .can_sleep(self.config.allow_sleeping)
            .build();

        let surface = self
            .contact_rules
            .material(desc.material)
            .copied()
            .unwrap_or(self.config.default_material);

        let mut collider = desc
            .shape
            .collider_builder()
            .friction(surface.friction)
            .restitution(surface.restitution)
            .user_data(desc.material.0 as u128)
            .active_hooks(ActiveHooks::MODIFY_SOLVER_CONTACTS);
        if desc.body_type() == RigidBodyType::Dynamic {
            collider = collider.mass(desc.mass);
        }

        let raw = self.bodies.insert(body);
        self.colliders
            .insert_with_parent(collider.build(), raw, &mut self.bodies);

        let handle = BodyHandle(raw);
        self.events.push(BodyEventType::Added, handle);
        debug!(
            "added {:?} body {:?} ({}, mass {}) at {:?}",
            desc.body_type(),
            handle,
            desc.shape.shape_type(),
            desc.mass,
            desc.position
        );

        Ok(handle)
    }

    /// Removes a rigid body and its collider from the world
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<()> {
        self.bodies
            .remove(
                handle.0,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .ok_or_else(|| Self::not_found(handle))?;

        self.events.push(BodyEventType::Removed, handle);
        Ok(())
    }

    /// Returns whether the body is live in this world
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle.0)
    }

    /// Returns the number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn not_found(handle: BodyHandle) -> SimError {
        SimError::ResourceNotFound(format!("Body with handle {:?} not found", handle))
    }

    fn body(&self, handle: BodyHandle) -> Result<&RigidBody> {
        self.bodies.get(handle.0).ok_or_else(|| Self::not_found(handle))
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut RigidBody> {
        self.bodies.get_mut(handle.0).ok_or_else(|| Self::not_found(handle))
    }

    /// Gets a snapshot of a body's state
    pub fn body_state(&self, handle: BodyHandle) -> Result<BodyState> {
        let body = self.body(handle)?;
        Ok(BodyState {
            body_type: if body.is_dynamic() {
                RigidBodyType::Dynamic
            } else {
                RigidBodyType::Static
            },
            mass: if body.is_dynamic() { body.mass() } else { 0.0 },
            position: *body.translation(),
            rotation: *body.rotation(),
            linear_velocity: *body.linvel(),
            angular_velocity: *body.angvel(),
        })
    }

    /// Gets the pose of a body
    pub fn body_pose(&self, handle: BodyHandle) -> Result<Isometry3> {
        Ok(*self.body(handle)?.position())
    }

    /// Applies an instantaneous impulse at the body's center of mass
    pub fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vector3) -> Result<()> {
        Self::check_finite(&impulse, "impulse")?;
        self.body_mut(handle)?.apply_impulse(impulse, true);
        Ok(())
    }

    /// Applies an instantaneous impulse at a world-space point (may add spin)
    pub fn apply_impulse_at(&mut self, handle: BodyHandle, impulse: Vector3, point: Point3) -> Result<()> {
        Self::check_finite(&impulse, "impulse")?;
        Self::check_finite(&point.coords, "impulse point")?;
        self.body_mut(handle)?.apply_impulse_at_point(impulse, point, true);
        Ok(())
    }

    /// Overwrites a body's linear velocity
    pub fn set_velocity(&mut self, handle: BodyHandle, velocity: Vector3) -> Result<()> {
        Self::check_finite(&velocity, "velocity")?;
        self.body_mut(handle)?.set_linvel(velocity, true);
        Ok(())
    }

    /// Sets a body in motion
    pub fn kick(&mut self, handle: BodyHandle, kick: Kick) -> Result<()> {
        match kick {
            Kick::Velocity(velocity) => self.set_velocity(handle, velocity),
            Kick::Impulse(impulse) => self.apply_impulse(handle, impulse),
            Kick::ImpulseAtPoint { impulse, point } => self.apply_impulse_at(handle, impulse, point),
        }
    }

    /// Moves a body explicitly; the only way static bodies ever move
    pub fn place_body(&mut self, handle: BodyHandle, pose: Isometry3) -> Result<()> {
        Self::check_finite(&pose.translation.vector, "position")?;
        if !is_finite_quaternion(&pose.rotation) {
            return Err(SimError::InvalidParameter("rotation must be finite".into()));
        }

        let mut pose = pose;
        pose.rotation.renormalize();
        self.body_mut(handle)?.set_position(pose, true);
        self.events.push(BodyEventType::Placed, handle);
        Ok(())
    }

    /// Places a body and clears its velocities, e.g. after divergence
    pub fn reset_body(&mut self, handle: BodyHandle, pose: Isometry3) -> Result<()> {
        self.place_body(handle, pose)?;
        let body = self.body_mut(handle)?;
        body.set_linvel(Vector3::zeros(), true);
        body.set_angvel(Vector3::zeros(), true);
        Ok(())
    }

    fn check_finite(v: &Vector3, what: &str) -> Result<()> {
        if is_finite_vector(v) {
            Ok(())
        } else {
            Err(SimError::InvalidParameter(format!("{} must be finite, got {:?}", what, v)))
        }
    }

    /// Advances the simulation by exactly `dt` seconds
    ///
    /// Returns [`SimError::SolverDiverged`] listing every body whose state became
    /// non-finite; the step itself has still been taken.
    pub fn step(&mut self, dt: f32) -> Result<()> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SimError::InvalidParameter(format!("time step must be positive, got {}", dt)));
        }

        // Clear events from previous step
        self.events.clear();

        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.config.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &self.contact_rules,
            &(),
        );

        self.time += f64::from(dt);
        self.steps += 1;

        let diverged = self.diverged_bodies();
        if diverged.is_empty() {
            return Ok(());
        }

        for handle in &diverged {
            self.events.push(BodyEventType::Diverged, *handle);
        }
        warn!("step {}: {} bodies diverged", self.steps, diverged.len());
        Err(SimError::SolverDiverged { bodies: diverged })
    }

    /// Lists the bodies whose position, orientation or velocity is non-finite
    pub fn diverged_bodies(&self) -> Vec<BodyHandle> {
        self.bodies
            .iter()
            .filter(|(_, body)| {
                !(is_finite_vector(body.translation())
                    && is_finite_quaternion(body.rotation())
                    && is_finite_vector(body.linvel())
                    && is_finite_vector(body.angvel()))
            })
            .map(|(raw, _)| BodyHandle(raw))
            .collect()
    }

    /// Returns the events queued since the last step
    pub fn get_events(&self) -> &EventQueue {
        &self.events
    }

    /// Returns a mutable reference to the event queue
    pub fn get_events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }
}

impl fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("config", &self.config)
            .field("time", &self.time)
            .field("steps", &self.steps)
            .field("bodies", &self.bodies.len())
            .finish()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
