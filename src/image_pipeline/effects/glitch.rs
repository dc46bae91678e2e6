//! Pixel-displacement glitch ("radiation mode").
//!
//! Every source pixel is thrown to a random destination up to
//! [`MAX_OFFSET`] pixels away (wrapping at the edges) and corrupted on the way.
//! The output starts as a copy of the input so uncovered destinations keep
//! their original colour. Iteration is row-major and later writes win.

use rand::Rng;
use tracing::debug;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raster::{PixelBuffer, Rgba};

pub const MAX_OFFSET: i64 = 30;
const FULL_CORRUPTION_CHANCE: f32 = 0.1;
const DIM_CHANCE: f32 = 0.1;
const DIM_LEVEL: f32 = 0.2;
const GREEN_BOOST: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Glitch;

impl Glitch {
    pub fn new() -> Self {
        Self
    }

    /// Consumes, per source pixel and in this order: x offset, y offset, the
    /// full-corruption draw (plus three channel draws when it hits), then the
    /// dim draw when the first one missed.
    pub fn apply<R: Rng>(&self, buffer: &mut PixelBuffer, rng: &mut R) -> Result<()> {
        let (width, height) = buffer.dimensions();
        debug!(width, height, "Glitching");

        let source = buffer.pixels();
        let mut glitched = source.to_vec();

        for y in 0..height {
            for x in 0..width {
                let offset_x = rng.random_range(-MAX_OFFSET..=MAX_OFFSET);
                let offset_y = rng.random_range(-MAX_OFFSET..=MAX_OFFSET);
                let dest_x = wrap(x, offset_x, width);
                let dest_y = wrap(y, offset_y, height);

                glitched[dest_y * width + dest_x] = corrupt(source[y * width + x], rng);
            }
        }

        // green boost may leave g above 1; set_all clamps it
        buffer.set_all(glitched)
    }
}

fn corrupt<R: Rng>(color: Rgba, rng: &mut R) -> Rgba {
    if rng.random::<f32>() < FULL_CORRUPTION_CHANCE {
        Rgba::new(rng.random(), rng.random(), rng.random(), color.a)
    } else if rng.random::<f32>() < DIM_CHANCE {
        Rgba::new(DIM_LEVEL, DIM_LEVEL, DIM_LEVEL, color.a)
    } else {
        Rgba::new(color.r, color.g + GREEN_BOOST, color.b, color.a)
    }
}

#[inline]
fn wrap(pos: usize, offset: i64, len: usize) -> usize {
    (pos as i64 + offset).rem_euclid(len as i64) as usize
}
