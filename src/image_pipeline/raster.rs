//! Raster storage module
//!
//! Pixel storage, 8-bit ingestion, the overlay readability seam and the
//! scale-to-fit geometry used when shrinking rasters.

mod buffer;
mod overlay;
pub mod color;
pub mod geometry;

#[cfg(test)]
mod tests;

pub use buffer::PixelBuffer;
pub use color::Rgba;
pub use geometry::{FitBox, fit_within};
pub use overlay::OverlaySource;
