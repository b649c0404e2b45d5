use crate::error::SimError;
use crate::scene::Color;
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Color used for heights up to and including `threshold`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct HeightBand {
    /// Upper bound of the band (inclusive)
    pub threshold: f32,

    /// Vertex color of the band
    pub color: Color,
}

/// Ordered height bands plus the color of everything above the last one
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct HeightBands {
    /// Bands in ascending threshold order
    pub bands: Vec<HeightBand>,

    /// Color above the highest threshold
    pub top: Color,
}

impl HeightBands {
    /// Deep blue lowlands
    pub const WATER: Color = [0.2, 0.4, 0.8, 1.0];
    /// Green mid-heights
    pub const GRASS: Color = [0.4, 0.7, 0.2, 1.0];
    /// Brown highlands
    pub const ROCK: Color = [0.6, 0.5, 0.3, 1.0];

    /// Returns the color of a normalized height
    pub fn classify(&self, h: f32) -> Color {
        self.bands
            .iter()
            .find(|band| h <= band.threshold)
            .map_or(self.top, |band| band.color)
    }

    /// Checks that thresholds are finite and strictly ascending
    pub fn validate(&self) -> Result<()> {
        let mut previous = f32::NEG_INFINITY;
        for band in &self.bands {
            if !band.threshold.is_finite() || band.threshold <= previous {
                return Err(SimError::InvalidParameter(format!(
                    "height band thresholds must be finite and ascending, got {} after {}",
                    band.threshold, previous
                )));
            }
            previous = band.threshold;
        }
        Ok(())
    }
}

impl Default for HeightBands {
    fn default() -> Self {
        Self {
            bands: vec![
                HeightBand { threshold: 0.5, color: Self::WATER },
                HeightBand { threshold: 0.8, color: Self::GRASS },
            ],
            top: Self::ROCK,
        }
    }
}

/// How terrain normals are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum NormalMode {
    /// Per-vertex normals averaged over adjacent faces
    #[default]
    Smooth,

    /// Smooth normals plus per-face normals; the mesh is flagged for flat shading
    Flat,
}

/// Terrain generation parameters
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct TerrainConfig {
    /// World height of a sample of 1.0
    pub vertical_scale: f32,

    /// Vertex color bands
    pub bands: HeightBands,

    /// Normal generation
    pub normal_mode: NormalMode,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            vertical_scale: 5.0,
            bands: HeightBands::default(),
            normal_mode: NormalMode::Smooth,
        }
    }
}

impl TerrainConfig {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.vertical_scale.is_finite() {
            return Err(SimError::InvalidParameter(format!(
                "vertical scale must be finite, got {}",
                self.vertical_scale
            )));
        }
        self.bands.validate()
    }
}
