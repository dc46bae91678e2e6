//! Per-pixel linear colour transforms: grayscale, sepia, invert and
//! colour-vision-deficiency simulation.

use tracing::debug;

use crate::image_pipeline::raster::{PixelBuffer, Rgba};

/// Row-major 3x3 matrix mapping input `(r, g, b)` to output `(r, g, b)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix(pub [[f32; 3]; 3]);

impl ColorMatrix {
    pub const IDENTITY: ColorMatrix = ColorMatrix([
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
    ]);

    pub const GRAYSCALE: ColorMatrix = ColorMatrix([
        [1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0],
        [1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0],
        [1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0],
    ]);

    pub const SEPIA: ColorMatrix = ColorMatrix([
        [0.393, 0.769, 0.189],
        [0.349, 0.686, 0.168],
        [0.272, 0.534, 0.131],
    ]);

    // CVD simulation matrices after DaltonLens, "Understanding CVD simulation".
    pub const PROTANOPIA: ColorMatrix = ColorMatrix([
        [0.56667, 0.43333, 0.0],
        [0.55833, 0.44167, 0.0],
        [0.0, 0.24167, 0.75833],
    ]);

    pub const DEUTERANOPIA: ColorMatrix = ColorMatrix([
        [0.625, 0.375, 0.0],
        [0.7, 0.3, 0.0],
        [0.0, 0.3, 0.7],
    ]);

    pub const TRITANOPIA: ColorMatrix = ColorMatrix([
        [0.95, 0.05, 0.0],
        [0.0, 0.43333, 0.56667],
        [0.0, 0.475, 0.525],
    ]);

    /// Transforms one colour. Alpha passes through; the result is not clamped.
    #[inline]
    pub fn transform(&self, c: Rgba) -> Rgba {
        let m = &self.0;
        Rgba {
            r: m[0][0] * c.r + m[0][1] * c.g + m[0][2] * c.b,
            g: m[1][0] * c.r + m[1][1] * c.g + m[1][2] * c.b,
            b: m[2][0] * c.r + m[2][1] * c.g + m[2][2] * c.b,
            a: c.a,
        }
    }

    /// Applies the matrix to every pixel of `buffer`.
    pub fn apply(&self, buffer: &mut PixelBuffer) {
        buffer.par_map(|c| self.transform(c));
    }
}

/// The single-choice tone filters that are not posterize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneFilter {
    Grayscale,
    Sepia,
    Invert,
}

impl ToneFilter {
    pub fn name(&self) -> &'static str {
        match self {
            ToneFilter::Grayscale => "grayscale",
            ToneFilter::Sepia => "sepia",
            ToneFilter::Invert => "invert",
        }
    }

    pub fn apply(&self, buffer: &mut PixelBuffer) {
        debug!(filter = self.name(), "Applying tone filter");
        match self {
            ToneFilter::Grayscale => grayscale(buffer),
            ToneFilter::Sepia => ColorMatrix::SEPIA.apply(buffer),
            ToneFilter::Invert => invert(buffer),
        }
    }
}

/// Colour-vision deficiency to simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorblindMode {
    #[default]
    Normal,
    Protanopia,
    Deuteranopia,
    Tritanopia,
}

impl ColorblindMode {
    /// `None` for `Normal`: nothing to simulate.
    pub fn matrix(&self) -> Option<&'static ColorMatrix> {
        match self {
            ColorblindMode::Normal => None,
            ColorblindMode::Protanopia => Some(&ColorMatrix::PROTANOPIA),
            ColorblindMode::Deuteranopia => Some(&ColorMatrix::DEUTERANOPIA),
            ColorblindMode::Tritanopia => Some(&ColorMatrix::TRITANOPIA),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColorblindMode::Normal => "normal",
            ColorblindMode::Protanopia => "protanopia",
            ColorblindMode::Deuteranopia => "deuteranopia",
            ColorblindMode::Tritanopia => "tritanopia",
        }
    }

    pub fn apply(&self, buffer: &mut PixelBuffer) {
        if let Some(matrix) = self.matrix() {
            debug!(mode = self.name(), "Simulating colour vision");
            matrix.apply(buffer);
        }
    }
}

/// Replaces each colour with the mean of its three channels.
pub fn grayscale(buffer: &mut PixelBuffer) {
    buffer.par_map(|c| {
        let gray = (c.r + c.g + c.b) / 3.0;
        Rgba::new(gray, gray, gray, c.a)
    });
}

/// `1 - c` per colour channel; alpha untouched.
pub fn invert(buffer: &mut PixelBuffer) {
    buffer.par_map(|c| Rgba::new(1.0 - c.r, 1.0 - c.g, 1.0 - c.b, c.a));
}
