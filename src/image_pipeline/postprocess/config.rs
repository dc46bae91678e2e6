//! Post-processing configuration types

use std::sync::Arc;

use crate::image_pipeline::common::error::{EffectError, Result};
use crate::image_pipeline::effects::{ColorblindMode, DEFAULT_POSTERIZE_LEVELS};
use crate::image_pipeline::raster::OverlaySource;

/// Single-choice filter applied first in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterKind {
    #[default]
    None,
    Grayscale,
    Sepia,
    Posterize,
    Invert,
}

/// Snapshot of the user's effect settings for one capture or preview frame
#[derive(Debug, Clone)]
pub struct EffectConfig {
    /// Tone filter or posterize
    pub filter: FilterKind,
    /// Level count used when `filter` is `Posterize`
    pub posterize_levels: u32,
    /// Box blur ("bad eyes") with the fixed radius
    pub blur: bool,
    /// Vignette strength in `[0, 1]`; 0 disables the stage
    pub vignette_intensity: f32,
    /// Noise amplitude in `[0, 1]`; 0 disables the stage
    pub noise_amount: f32,
    /// Pixel-displacement glitch ("radiation mode")
    pub glitch: bool,
    pub colorblind: ColorblindMode,
    /// Optional overlay composited into the top-right corner
    pub watermark: Option<Arc<dyn OverlaySource>>,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            filter: FilterKind::None,
            posterize_levels: DEFAULT_POSTERIZE_LEVELS,
            blur: false,
            vignette_intensity: 0.0,
            noise_amount: 0.0,
            glitch: false,
            colorblind: ColorblindMode::Normal,
            watermark: None,
        }
    }
}

impl EffectConfig {
    pub fn builder() -> EffectConfigBuilder {
        EffectConfigBuilder::default()
    }

    /// Rejects settings that would make a stage fail or misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.filter == FilterKind::Posterize && self.posterize_levels == 0 {
            return Err(EffectError::InvalidArgument(
                "posterize levels must be at least 1".to_string(),
            ));
        }
        check_unit("vignette intensity", self.vignette_intensity)?;
        check_unit("noise amount", self.noise_amount)?;
        Ok(())
    }
}

fn check_unit(name: &str, value: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(EffectError::InvalidArgument(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

/// Builder for EffectConfig
#[derive(Default)]
pub struct EffectConfigBuilder {
    filter: Option<FilterKind>,
    posterize_levels: Option<u32>,
    blur: Option<bool>,
    vignette_intensity: Option<f32>,
    noise_amount: Option<f32>,
    glitch: Option<bool>,
    colorblind: Option<ColorblindMode>,
    watermark: Option<Option<Arc<dyn OverlaySource>>>,
}

impl EffectConfigBuilder {
    pub fn filter(mut self, filter: FilterKind) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn posterize_levels(mut self, levels: u32) -> Self {
        self.posterize_levels = Some(levels);
        self
    }

    pub fn blur(mut self, enable: bool) -> Self {
        self.blur = Some(enable);
        self
    }

    pub fn vignette(mut self, intensity: f32) -> Self {
        self.vignette_intensity = Some(intensity);
        self
    }

    pub fn noise(mut self, amount: f32) -> Self {
        self.noise_amount = Some(amount);
        self
    }

    pub fn glitch(mut self, enable: bool) -> Self {
        self.glitch = Some(enable);
        self
    }

    pub fn colorblind(mut self, mode: ColorblindMode) -> Self {
        self.colorblind = Some(mode);
        self
    }

    pub fn watermark<S: OverlaySource + 'static>(mut self, overlay: S) -> Self {
        let overlay: Arc<dyn OverlaySource> = Arc::new(overlay);
        self.watermark = Some(Some(overlay));
        self
    }

    pub fn shared_watermark(mut self, overlay: Option<Arc<dyn OverlaySource>>) -> Self {
        self.watermark = Some(overlay);
        self
    }

    pub fn build(self) -> EffectConfig {
        let default = EffectConfig::default();
        EffectConfig {
            filter: self.filter.unwrap_or(default.filter),
            posterize_levels: self.posterize_levels.unwrap_or(default.posterize_levels),
            blur: self.blur.unwrap_or(default.blur),
            vignette_intensity: self.vignette_intensity.unwrap_or(default.vignette_intensity),
            noise_amount: self.noise_amount.unwrap_or(default.noise_amount),
            glitch: self.glitch.unwrap_or(default.glitch),
            colorblind: self.colorblind.unwrap_or(default.colorblind),
            watermark: self.watermark.unwrap_or(default.watermark),
        }
    }
}
