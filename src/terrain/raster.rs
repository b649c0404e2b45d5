use crate::error::SimError;
use crate::Result;

/// Grid of normalized height samples, row-major with `z` as the row index
#[derive(Debug, Clone, PartialEq)]
pub struct HeightRaster {
    width: usize,
    height: usize,
    samples: Vec<f32>,
}

impl HeightRaster {
    /// Creates a raster from samples in [0, 1]
    pub fn from_normalized(width: usize, height: usize, samples: Vec<f32>) -> Result<Self> {
        Self::check_len(width, height, samples.len(), 1)?;
        if let Some(bad) = samples.iter().find(|h| !(0.0..=1.0).contains(*h)) {
            return Err(SimError::InvalidParameter(format!(
                "height sample {} is outside [0, 1]",
                bad
            )));
        }
        Ok(Self { width, height, samples })
    }

    /// Creates a raster from 8-bit intensities, one byte per sample
    pub fn from_luma(width: usize, height: usize, data: &[u8]) -> Result<Self> {
        Self::check_len(width, height, data.len(), 1)?;
        Ok(Self {
            width,
            height,
            samples: data.iter().map(|v| f32::from(*v) / 255.0).collect(),
        })
    }

    /// Creates a raster from RGBA pixels, reading the red channel
    pub fn from_rgba(width: usize, height: usize, data: &[u8]) -> Result<Self> {
        Self::check_len(width, height, data.len(), 4)?;
        Ok(Self {
            width,
            height,
            samples: data.chunks_exact(4).map(|px| f32::from(px[0]) / 255.0).collect(),
        })
    }

    /// Creates a raster by evaluating `f(x, z)` for every cell, clamped to [0, 1]
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut samples = Vec::with_capacity(width * height);
        for z in 0..height {
            for x in 0..width {
                let h = f(x, z);
                samples.push(if h.is_nan() { 0.0 } else { h.clamp(0.0, 1.0) });
            }
        }
        Self { width, height, samples }
    }

    fn check_len(width: usize, height: usize, len: usize, stride: usize) -> Result<()> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(stride))
            .ok_or_else(|| SimError::InvalidParameter(format!("raster {}x{} is too large", width, height)))?;
        if len != expected {
            return Err(SimError::InvalidParameter(format!(
                "raster {}x{} needs {} values, got {}",
                width, height, expected, len
            )));
        }
        Ok(())
    }

    /// Number of samples per row
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the sample at column `x`, row `z`
    pub fn sample(&self, x: usize, z: usize) -> Option<f32> {
        if x < self.width && z < self.height {
            self.samples.get(z * self.width + x).copied()
        } else {
            None
        }
    }

    /// All samples in row-major order
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}
