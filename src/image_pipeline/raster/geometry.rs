//! Aspect-preserving scale-to-fit math shared by the watermark and preview paths.

/// Absorbs `(n / d) * d` landing a hair under `n`.
const FIT_EPSILON: f64 = 1e-9;

/// Result of fitting a `src_w x src_h` raster inside a bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitBox {
    pub width: usize,
    pub height: usize,
    /// Uniform scale factor, always in `[0, 1]`.
    pub scale: f64,
}

impl FitBox {
    /// Nearest-neighbour source coordinate for destination coordinate `dest`,
    /// clamped so it never reaches `src_len`.
    pub fn source_index(&self, dest: usize, src_len: usize) -> usize {
        if self.scale <= 0.0 || src_len == 0 {
            return 0;
        }
        let idx = (dest as f64 / self.scale).floor() as usize;
        idx.min(src_len - 1)
    }
}

/// Shrinks (never enlarges) `src_w x src_h` uniformly so it fits inside
/// `max_w x max_h`. A zero-sized source or bound yields a zero-sized box.
pub fn fit_within(src_w: usize, src_h: usize, max_w: usize, max_h: usize) -> FitBox {
    if src_w == 0 || src_h == 0 {
        return FitBox {
            width: 0,
            height: 0,
            scale: 0.0,
        };
    }

    let scale = 1.0f64
        .min(max_w as f64 / src_w as f64)
        .min(max_h as f64 / src_h as f64);

    FitBox {
        width: scaled_len(src_w, scale).min(max_w).min(src_w),
        height: scaled_len(src_h, scale).min(max_h).min(src_h),
        scale,
    }
}

fn scaled_len(len: usize, scale: f64) -> usize {
    (len as f64 * scale + FIT_EPSILON).floor() as usize
}
