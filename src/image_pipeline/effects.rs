//! Post-processing effects module
//!
//! One file per effect family. Every effect mutates a [`PixelBuffer`] in place
//! and leaves it clamped to `[0, 1]`; the randomised ones take an explicit
//! random source.
//!
//! [`PixelBuffer`]: crate::image_pipeline::raster::PixelBuffer

pub mod blur;
pub mod color_matrix;
pub mod glitch;
pub mod noise;
pub mod posterize;
pub mod vignette;
pub mod watermark;


pub use blur::{BoxBlur, DEFAULT_BLUR_RADIUS};
pub use color_matrix::{ColorMatrix, ColorblindMode, ToneFilter};
pub use glitch::Glitch;
pub use noise::Noise;
pub use posterize::{DEFAULT_POSTERIZE_LEVELS, Posterize};
pub use vignette::Vignette;
pub use watermark::{Placement, WatermarkCompositor};
