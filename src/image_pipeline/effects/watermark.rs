//! Watermark overlay: scale-to-fit then alpha blend into the top-right corner.

use tracing::debug;

use crate::image_pipeline::common::error::{EffectError, Result};
use crate::image_pipeline::raster::{FitBox, OverlaySource, PixelBuffer, fit_within};

pub const DEFAULT_OPACITY: f32 = 0.5;
pub const DEFAULT_MAX_WIDTH_FRACTION: f32 = 0.5;
pub const DEFAULT_MAX_HEIGHT_FRACTION: f32 = 0.5;

/// Where the overlay landed on the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    pub scale: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatermarkCompositor {
    opacity: f32,
    max_width_fraction: f32,
    max_height_fraction: f32,
}

impl WatermarkCompositor {
    pub fn new(opacity: f32, max_width_fraction: f32, max_height_fraction: f32) -> Result<Self> {
        for (name, value) in [
            ("opacity", opacity),
            ("max width fraction", max_width_fraction),
            ("max height fraction", max_height_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EffectError::InvalidArgument(format!(
                    "watermark {} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(Self {
            opacity,
            max_width_fraction,
            max_height_fraction,
        })
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Size and top-right origin of an `overlay_w x overlay_h` overlay on a
    /// `target_w x target_h` target. `None` when the fitted size is zero.
    pub fn placement(
        &self,
        target_w: usize,
        target_h: usize,
        overlay_w: usize,
        overlay_h: usize,
    ) -> Option<Placement> {
        let max_w = (target_w as f32 * self.max_width_fraction).floor() as usize;
        let max_h = (target_h as f32 * self.max_height_fraction).floor() as usize;
        let FitBox {
            width,
            height,
            scale,
        } = fit_within(overlay_w, overlay_h, max_w, max_h);
        if width == 0 || height == 0 {
            return None;
        }
        Some(Placement {
            x: target_w - width,
            y: 0,
            width,
            height,
            scale,
        })
    }

    /// Blends `overlay` into `target`.
    ///
    /// Fails with `UnreadableResource` before touching `target` when the
    /// overlay pixels cannot be read. Returns `Ok(None)` when the overlay
    /// shrinks to nothing.
    pub fn apply(
        &self,
        target: &mut PixelBuffer,
        overlay: &dyn OverlaySource,
    ) -> Result<Option<Placement>> {
        let raster = overlay.read_raster()?;
        let (overlay_w, overlay_h) = raster.dimensions();
        let Some(placement) =
            self.placement(target.width(), target.height(), overlay_w, overlay_h)
        else {
            debug!(
                overlay_w,
                overlay_h, "Watermark scaled to zero size, nothing to draw"
            );
            return Ok(None);
        };

        let fit = FitBox {
            width: placement.width,
            height: placement.height,
            scale: placement.scale,
        };
        for j in 0..placement.height {
            let src_y = fit.source_index(j, overlay_h);
            for i in 0..placement.width {
                let src_x = fit.source_index(i, overlay_w);
                let mut mark = raster.get(src_x, src_y)?;
                mark.a *= self.opacity;
                if mark.a > 0.0 {
                    let (x, y) = (placement.x + i, placement.y + j);
                    let under = target.get(x, y)?;
                    target.set(x, y, under.lerp(mark, mark.a))?;
                }
            }
        }

        debug!(
            x = placement.x,
            y = placement.y,
            width = placement.width,
            height = placement.height,
            "Watermark composited"
        );
        Ok(Some(placement))
    }
}

impl Default for WatermarkCompositor {
    fn default() -> Self {
        Self {
            opacity: DEFAULT_OPACITY,
            max_width_fraction: DEFAULT_MAX_WIDTH_FRACTION,
            max_height_fraction: DEFAULT_MAX_HEIGHT_FRACTION,
        }
    }
}
