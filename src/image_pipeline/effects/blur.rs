//! Separable box blur ("bad eyes").
//!
//! Two mean-filter passes, horizontal then vertical, with clamp-to-edge
//! sampling so borders do not darken. Each pass is row-parallel.

use rayon::prelude::*;
use tracing::debug;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raster::{PixelBuffer, Rgba};

pub const DEFAULT_BLUR_RADIUS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxBlur {
    radius: usize,
}

impl BoxBlur {
    pub fn new(radius: usize) -> Self {
        Self { radius }
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn apply(&self, buffer: &mut PixelBuffer) -> Result<()> {
        if self.radius == 0 {
            return Ok(());
        }
        let (width, height) = buffer.dimensions();
        let r = self.radius as isize;
        let taps = (2 * self.radius + 1) as f32;
        debug!(radius = self.radius, width, height, "Box blur");

        let source = buffer.pixels();

        let mut horizontal = vec![Rgba::TRANSPARENT; source.len()];
        horizontal
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row_out)| {
                let row_in = &source[y * width..(y + 1) * width];
                for (x, out) in row_out.iter_mut().enumerate() {
                    let mut sum = Rgba::TRANSPARENT;
                    for offset in -r..=r {
                        sum = sum + row_in[clamp_index(x, offset, width)];
                    }
                    *out = sum / taps;
                }
            });

        let mut blurred = vec![Rgba::TRANSPARENT; source.len()];
        blurred
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row_out)| {
                for (x, out) in row_out.iter_mut().enumerate() {
                    let mut sum = Rgba::TRANSPARENT;
                    for offset in -r..=r {
                        let sy = clamp_index(y, offset, height);
                        sum = sum + horizontal[sy * width + x];
                    }
                    *out = sum / taps;
                }
            });

        buffer.set_all(blurred)
    }
}

impl Default for BoxBlur {
    fn default() -> Self {
        Self::new(DEFAULT_BLUR_RADIUS)
    }
}

#[inline]
fn clamp_index(pos: usize, offset: isize, len: usize) -> usize {
    (pos as isize + offset).clamp(0, len as isize - 1) as usize
}
