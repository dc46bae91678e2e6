use tracing::debug;

use crate::image_pipeline::common::error::{EffectError, Result};
use crate::image_pipeline::raster::PixelBuffer;

/// Radial darkening keyed on distance from the image centre.
///
/// `factor = clamp(1 - intensity * d, 0, 1)` where `d` is the distance from
/// `(width / 2, height / 2)` normalised by the distance from the origin to the
/// centre. Colour channels are scaled by `factor`; alpha is left alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vignette {
    intensity: f32,
}

impl Vignette {
    pub fn new(intensity: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&intensity) {
            return Err(EffectError::InvalidArgument(format!(
                "vignette intensity must be within [0, 1], got {}",
                intensity
            )));
        }
        Ok(Self { intensity })
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Darkening factor for the pixel at `(x, y)` of a `width x height` raster.
    pub fn factor_at(&self, x: usize, y: usize, width: usize, height: usize) -> f32 {
        let cx = width as f32 / 2.0;
        let cy = height as f32 / 2.0;
        let max_distance = cx.hypot(cy);
        let distance = (x as f32 - cx).hypot(y as f32 - cy) / max_distance;
        (1.0 - self.intensity * distance).clamp(0.0, 1.0)
    }

    pub fn apply(&self, buffer: &mut PixelBuffer) {
        if self.intensity == 0.0 {
            return;
        }
        let (width, height) = buffer.dimensions();
        debug!(intensity = self.intensity, "Applying vignette");
        buffer.par_map_positioned(|x, y, c| c.scale_rgb(self.factor_at(x, y, width, height)));
    }
}
