use rand::Rng;
use tracing::debug;

use crate::image_pipeline::common::error::{EffectError, Result};
use crate::image_pipeline::raster::{PixelBuffer, Rgba};

/// Additive grain: one draw per pixel, `amount * (2U - 1)`, added to all three
/// colour channels alike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Noise {
    amount: f32,
}

impl Noise {
    pub fn new(amount: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&amount) {
            return Err(EffectError::InvalidArgument(format!(
                "noise amount must be within [0, 1], got {}",
                amount
            )));
        }
        Ok(Self { amount })
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }

    /// Sequential so a seeded `rng` always yields the same grain.
    pub fn apply<R: Rng>(&self, buffer: &mut PixelBuffer, rng: &mut R) -> Result<()> {
        if self.amount <= 0.0 {
            return Ok(());
        }
        debug!(amount = self.amount, "Adding noise");

        let noisy: Vec<Rgba> = buffer
            .pixels()
            .iter()
            .map(|c| {
                let noise = self.amount * (2.0 * rng.random::<f32>() - 1.0);
                Rgba::new(c.r + noise, c.g + noise, c.b + noise, c.a)
            })
            .collect();
        buffer.set_all(noisy)
    }
}
