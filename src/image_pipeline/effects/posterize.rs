use tracing::debug;

use crate::image_pipeline::common::error::{EffectError, Result};
use crate::image_pipeline::raster::{PixelBuffer, Rgba};

pub const DEFAULT_POSTERIZE_LEVELS: u32 = 15;

/// Ulps of slack within which `c * levels` counts as already sitting on a step.
const GRID_ULPS: f32 = 4.0;

/// Quantises each colour channel to `floor(c * levels) / levels`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posterize {
    levels: u32,
}

impl Posterize {
    pub fn new(levels: u32) -> Result<Self> {
        if levels == 0 {
            return Err(EffectError::InvalidArgument(
                "posterize levels must be at least 1".to_string(),
            ));
        }
        Ok(Self { levels })
    }

    pub fn levels(&self) -> u32 {
        self.levels
    }

    #[inline]
    pub fn quantize(&self, v: f32) -> f32 {
        let levels = self.levels as f32;
        let scaled = v * levels;
        let nearest = scaled.round();
        // k / levels * levels can land a few ulps below k; snap those back
        let tolerance = scaled.abs().max(1.0) * f32::EPSILON * GRID_ULPS;
        let step = if (scaled - nearest).abs() <= tolerance {
            nearest
        } else {
            scaled.floor()
        };
        step / levels
    }

    pub fn apply(&self, buffer: &mut PixelBuffer) {
        debug!(levels = self.levels, "Posterizing");
        buffer.par_map(|c| {
            Rgba::new(self.quantize(c.r), self.quantize(c.g), self.quantize(c.b), c.a)
        });
    }
}

impl Default for Posterize {
    fn default() -> Self {
        Self {
            levels: DEFAULT_POSTERIZE_LEVELS,
        }
    }
}
