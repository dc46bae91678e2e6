use std::fmt::Debug;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raster::buffer::PixelBuffer;

/// A raster that may or may not be pixel-readable, such as a watermark asset
/// whose pixels live only on the GPU.
///
/// `read_raster` returns `EffectError::UnreadableResource` when the pixels cannot
/// be accessed; callers treat that as "no overlay".
pub trait OverlaySource: Debug + Send + Sync {
    fn dimensions(&self) -> (usize, usize);

    fn read_raster(&self) -> Result<&PixelBuffer>;
}

impl OverlaySource for PixelBuffer {
    fn dimensions(&self) -> (usize, usize) {
        PixelBuffer::dimensions(self)
    }

    fn read_raster(&self) -> Result<&PixelBuffer> {
        Ok(self)
    }
}
