use crate::bodies::MaterialId;
use crate::error::SimError;
use crate::math::{is_finite_vector, Axis, Direction3, Vector3, EPSILON};
use crate::shapes::ShapeDesc;
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// How far apart consecutive chain bodies are placed
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum SpacingRule {
    /// Constant distance between body centers
    Fixed(f32),

    /// Multiple of the shape's extent along the placement axis
    FromBounds {
        /// Factor applied to the extent, must be greater than 1
        factor: f32,
    },
}

impl SpacingRule {
    /// Resolves the center distance for a shape placed along `axis`
    ///
    /// Fails unless the distance is strictly greater than the shape's extent along
    /// the axis, otherwise neighbours would spawn interpenetrating.
    pub fn resolve(&self, shape: &ShapeDesc, axis: &Direction3) -> Result<f32> {
        let extent = shape.extent_along(axis);
        let spacing = match *self {
            SpacingRule::Fixed(spacing) => spacing,
            SpacingRule::FromBounds { factor } => extent * factor,
        };

        if !(spacing.is_finite() && spacing > EPSILON) {
            return Err(SimError::InvalidParameter(format!(
                "chain spacing must be positive, got {}",
                spacing
            )));
        }
        if spacing <= extent {
            return Err(SimError::InvalidParameter(format!(
                "chain spacing {} does not exceed body extent {} along the axis",
                spacing, extent
            )));
        }
        Ok(spacing)
    }
}

impl Default for SpacingRule {
    fn default() -> Self {
        SpacingRule::Fixed(2.0)
    }
}

/// Layout and body parameters of a chain
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct ChainConfig {
    /// Number of bodies
    pub count: usize,

    /// Distance between neighbours
    pub spacing: SpacingRule,

    /// Placement axis
    pub axis: Axis,

    /// Position of the lead body
    pub start: Vector3,

    /// Yaw in radians added to even bodies and subtracted from odd ones
    pub yaw_offset: f32,

    /// Mass of each body
    pub mass: f32,

    /// Material of each body
    pub material: MaterialId,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            count: 10,
            spacing: SpacingRule::default(),
            axis: Axis::X,
            start: Vector3::zeros(),
            yaw_offset: 0.0,
            mass: 1.0,
            material: MaterialId::DEFAULT,
        }
    }
}

impl ChainConfig {
    /// Checks the parameters that do not depend on the body shape
    pub fn validate(&self) -> Result<()> {
        if !is_finite_vector(&self.start) {
            return Err(SimError::InvalidParameter("chain start must be finite".into()));
        }
        if !self.yaw_offset.is_finite() {
            return Err(SimError::InvalidParameter("chain yaw offset must be finite".into()));
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(SimError::InvalidParameter(format!(
                "chain bodies must be dynamic, got mass {}",
                self.mass
            )));
        }
        if let SpacingRule::FromBounds { factor } = self.spacing {
            if !(factor.is_finite() && factor > 1.0) {
                return Err(SimError::InvalidParameter(format!(
                    "spacing factor must be greater than 1, got {}",
                    factor
                )));
            }
        }
        Ok(())
    }
}
