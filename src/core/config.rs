use crate::bodies::Material;
use crate::error::SimError;
use crate::math::{is_finite_vector, Vector3};
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Canonical fixed time step of the simulation (60 Hz)
pub const DEFAULT_TIME_STEP: f32 = 1.0 / 60.0;

/// Configuration parameters for the physics simulation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct SimulationConfig {
    /// The fixed time step for the simulation
    pub time_step: f32,

    /// The maximum number of fixed steps taken per rendered frame
    pub max_substeps: u32,

    /// Constant gravity acceleration
    pub gravity: Vector3,

    /// The number of velocity iterations the solver runs per step
    pub solver_iterations: usize,

    /// Allowed penetration/linear error the solver tolerates
    pub solver_tolerance: f32,

    /// Whether to use continuous collision detection on dynamic bodies
    pub use_ccd: bool,

    /// Whether to allow resting bodies to sleep
    pub allow_sleeping: bool,

    /// Default damping factor for linear velocity
    pub linear_damping: f32,

    /// Default damping factor for angular velocity
    pub angular_damping: f32,

    /// Surface response for materials without an explicit definition
    pub default_material: Material,
}

impl SimulationConfig {
    /// Checks that every parameter is usable by the solver
    pub fn validate(&self) -> Result<()> {
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(SimError::InvalidParameter(format!(
                "time step must be positive, got {}",
                self.time_step
            )));
        }
        if self.max_substeps == 0 {
            return Err(SimError::InvalidParameter("max_substeps must be at least 1".into()));
        }
        if !is_finite_vector(&self.gravity) {
            return Err(SimError::InvalidParameter(format!(
                "gravity must be finite, got {:?}",
                self.gravity
            )));
        }
        if self.solver_iterations == 0 {
            return Err(SimError::InvalidParameter("solver_iterations must be at least 1".into()));
        }
        if !(self.solver_tolerance.is_finite() && self.solver_tolerance > 0.0) {
            return Err(SimError::InvalidParameter(format!(
                "solver tolerance must be positive, got {}",
                self.solver_tolerance
            )));
        }
        if self.linear_damping < 0.0 || self.angular_damping < 0.0 {
            return Err(SimError::InvalidParameter("damping cannot be negative".into()));
        }
        self.default_material.validate()
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP,
            max_substeps: 10,
            gravity: Vector3::new(0.0, -9.81, 0.0),
            solver_iterations: 10,
            solver_tolerance: 0.001,
            use_ccd: false,
            allow_sleeping: true,
            linear_damping: 0.0,
            angular_damping: 0.0,
            default_material: Material::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_time_step() {
        let config = SimulationConfig {
            time_step: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SimError::InvalidParameter(_))));
    }

    #[test]
    fn rejects_non_finite_gravity() {
        let config = SimulationConfig {
            gravity: Vector3::new(0.0, f32::NAN, 0.0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
