//! Normalised RGBA colour sample

use std::ops::{Add, Div};

/// One pixel with channels normalised to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour from three channels.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Every channel clamped to `[0, 1]`. NaN collapses to 0.
    pub fn clamped(self) -> Self {
        Self {
            r: clamp01(self.r),
            g: clamp01(self.g),
            b: clamp01(self.b),
            a: clamp01(self.a),
        }
    }

    /// Colour channels multiplied by `factor`, alpha untouched.
    pub fn scale_rgb(self, factor: f32) -> Self {
        Self {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
            a: self.a,
        }
    }

    /// Linear interpolation of all four channels, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Rgba, t: f32) -> Self {
        let t = clamp01(t);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

impl Add for Rgba {
    type Output = Rgba;

    fn add(self, other: Rgba) -> Rgba {
        Rgba {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
            a: self.a + other.a,
        }
    }
}

impl Div<f32> for Rgba {
    type Output = Rgba;

    fn div(self, divisor: f32) -> Rgba {
        Rgba {
            r: self.r / divisor,
            g: self.g / divisor,
            b: self.b / divisor,
            a: self.a / divisor,
        }
    }
}

#[inline]
pub(crate) fn clamp01(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
