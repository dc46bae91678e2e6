//! In-memory RGBA raster that every effect reads and writes through.

use rayon::prelude::*;
use tracing::debug;

use crate::image_pipeline::common::error::{EffectError, Result};
use crate::image_pipeline::raster::color::Rgba;
use crate::image_pipeline::raster::geometry::{FitBox, fit_within};

const RGB_CHANNELS: usize = 3;
const RGBA_CHANNELS: usize = 4;

/// Width x height grid of normalised RGBA samples stored row-major.
///
/// Every channel is kept in `[0, 1]`: all writes go through clamping, so
/// effects are free to produce out-of-range intermediates.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl PixelBuffer {
    /// Opaque black buffer.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::filled(width, height, Rgba::BLACK)
    }

    pub fn filled(width: usize, height: usize, color: Rgba) -> Result<Self> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![color.clamped(); len],
        })
    }

    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Rgba>) -> Result<Self> {
        let len = checked_len(width, height)?;
        if pixels.len() != len {
            return Err(EffectError::SizeMismatch {
                expected: len,
                actual: pixels.len(),
            });
        }
        let mut buffer = Self {
            width,
            height,
            pixels,
        };
        buffer.pixels.iter_mut().for_each(|p| *p = p.clamped());
        Ok(buffer)
    }

    /// Ingests an 8-bit RGB raster (`R, G, B, R, G, B, ...`); alpha is set to 1.
    pub fn from_rgb8(width: usize, height: usize, bytes: &[u8]) -> Result<Self> {
        let len = checked_len(width, height)?;
        check_byte_len(len, RGB_CHANNELS, bytes.len())?;
        debug!("Ingesting RGB8 raster {}x{}", width, height);

        let pixels = bytes
            .chunks_exact(RGB_CHANNELS)
            .map(|px| Rgba::rgb(unorm8(px[0]), unorm8(px[1]), unorm8(px[2])))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Ingests an 8-bit RGBA raster (`R, G, B, A, ...`).
    pub fn from_rgba8(width: usize, height: usize, bytes: &[u8]) -> Result<Self> {
        let len = checked_len(width, height)?;
        check_byte_len(len, RGBA_CHANNELS, bytes.len())?;
        debug!("Ingesting RGBA8 raster {}x{}", width, height);

        let pixels = bytes
            .chunks_exact(RGBA_CHANNELS)
            .map(|px| Rgba::new(unorm8(px[0]), unorm8(px[1]), unorm8(px[2]), unorm8(px[3])))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Number of pixels, always `width * height`.
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Always false; zero-sized buffers cannot be constructed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn get(&self, x: usize, y: usize) -> Result<Rgba> {
        let index = self.index_of(x, y)?;
        Ok(self.pixels[index])
    }

    /// Stores `color` at `(x, y)` with every channel clamped to `[0, 1]`.
    pub fn set(&mut self, x: usize, y: usize, color: Rgba) -> Result<()> {
        let index = self.index_of(x, y)?;
        self.pixels[index] = color.clamped();
        Ok(())
    }

    /// Full backing sequence, row-major.
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Replaces the whole backing sequence, clamping every value.
    pub fn set_all(&mut self, pixels: Vec<Rgba>) -> Result<()> {
        if pixels.len() != self.pixels.len() {
            return Err(EffectError::SizeMismatch {
                expected: self.pixels.len(),
                actual: pixels.len(),
            });
        }
        self.pixels = pixels;
        self.pixels.par_iter_mut().for_each(|p| *p = p.clamped());
        Ok(())
    }

    pub fn index_of(&self, x: usize, y: usize) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(EffectError::IndexOutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y * self.width + x)
    }

    /// Rewrites every pixel in parallel. The result is clamped on write.
    pub fn par_map<F>(&mut self, f: F)
    where
        F: Fn(Rgba) -> Rgba + Sync + Send,
    {
        self.pixels.par_iter_mut().for_each(|p| *p = f(*p).clamped());
    }

    /// Like [`par_map`](Self::par_map) but also hands over the pixel position.
    pub fn par_map_positioned<F>(&mut self, f: F)
    where
        F: Fn(usize, usize, Rgba) -> Rgba + Sync + Send,
    {
        let width = self.width;
        self.pixels
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, p) in row.iter_mut().enumerate() {
                    *p = f(x, y, *p).clamped();
                }
            });
    }

    /// Nearest-neighbour copy shrunk to fit within `max_width` x `max_height`,
    /// keeping the aspect ratio. Never enlarges.
    pub fn downscaled_to_fit(&self, max_width: usize, max_height: usize) -> Result<Self> {
        let fit = fit_within(self.width, self.height, max_width, max_height);
        let FitBox {
            width: out_w,
            height: out_h,
            scale,
        } = fit;
        if out_w == 0 || out_h == 0 {
            return Err(EffectError::InvalidArgument(format!(
                "cannot fit {}x{} into {}x{}",
                self.width, self.height, max_width, max_height
            )));
        }
        if out_w == self.width && out_h == self.height {
            return Ok(self.clone());
        }

        let mut pixels = Vec::with_capacity(out_w * out_h);
        for y in 0..out_h {
            let src_y = fit.source_index(y, self.height);
            for x in 0..out_w {
                let src_x = fit.source_index(x, self.width);
                pixels.push(self.pixels[src_y * self.width + src_x]);
            }
        }
        debug!(
            "Downscaled {}x{} -> {}x{} (scale {:.4})",
            self.width, self.height, out_w, out_h, scale
        );
        Ok(Self {
            width: out_w,
            height: out_h,
            pixels,
        })
    }
}

fn checked_len(width: usize, height: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(EffectError::InvalidArgument(format!(
            "buffer dimensions must be positive, got {}x{}",
            width, height
        )));
    }
    width.checked_mul(height).ok_or_else(|| {
        EffectError::InvalidArgument(format!("buffer dimensions {}x{} overflow", width, height))
    })
}

fn check_byte_len(pixel_count: usize, channels: usize, actual: usize) -> Result<()> {
    let expected = pixel_count.saturating_mul(channels);
    if actual != expected {
        return Err(EffectError::SizeMismatch { expected, actual });
    }
    Ok(())
}

#[inline]
fn unorm8(v: u8) -> f32 {
    v as f32 / u8::MAX as f32
}
