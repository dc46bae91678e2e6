//! Tagged stage list built from an [`EffectConfig`].

use std::sync::Arc;

use rand::Rng;
use tracing::warn;

use crate::image_pipeline::common::error::{EffectError, Result};
use crate::image_pipeline::effects::{
    BoxBlur, ColorblindMode, Glitch, Noise, Posterize, ToneFilter, Vignette, WatermarkCompositor,
};
use crate::image_pipeline::postprocess::config::{EffectConfig, FilterKind};
use crate::image_pipeline::postprocess::timing::StageOutcome;
use crate::image_pipeline::raster::{OverlaySource, PixelBuffer};

/// One enabled pipeline step with its parameters resolved.
#[derive(Debug, Clone)]
pub enum Stage {
    Tone(ToneFilter),
    Posterize(Posterize),
    Blur(BoxBlur),
    Glitch(Glitch),
    Noise(Noise),
    Vignette(Vignette),
    Watermark {
        compositor: WatermarkCompositor,
        overlay: Arc<dyn OverlaySource>,
    },
    Colorblind(ColorblindMode),
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Tone(filter) => filter.name(),
            Stage::Posterize(_) => "posterize",
            Stage::Blur(_) => "blur",
            Stage::Glitch(_) => "glitch",
            Stage::Noise(_) => "noise",
            Stage::Vignette(_) => "vignette",
            Stage::Watermark { .. } => "watermark",
            Stage::Colorblind(_) => "colorblind",
        }
    }

    /// Runs the stage to completion. An unreadable watermark is reported as
    /// skipped rather than failing the run.
    pub fn apply<R: Rng>(&self, buffer: &mut PixelBuffer, rng: &mut R) -> Result<StageOutcome> {
        match self {
            Stage::Tone(filter) => filter.apply(buffer),
            Stage::Posterize(posterize) => posterize.apply(buffer),
            Stage::Blur(blur) => blur.apply(buffer)?,
            Stage::Glitch(glitch) => glitch.apply(buffer, rng)?,
            Stage::Noise(noise) => noise.apply(buffer, rng)?,
            Stage::Vignette(vignette) => vignette.apply(buffer),
            Stage::Watermark {
                compositor,
                overlay,
            } => match compositor.apply(buffer, overlay.as_ref()) {
                Ok(Some(_)) => {}
                Ok(None) => {
                    return Ok(StageOutcome::Skipped(
                        "watermark scaled to zero size".to_string(),
                    ));
                }
                Err(EffectError::UnreadableResource(reason)) => {
                    let (w, h) = overlay.dimensions();
                    warn!(
                        overlay_width = w,
                        overlay_height = h,
                        "Watermark is not readable, skipping: {}",
                        reason
                    );
                    return Ok(StageOutcome::Skipped(reason));
                }
                Err(e) => return Err(e),
            },
            Stage::Colorblind(mode) => mode.apply(buffer),
        }
        Ok(StageOutcome::Applied)
    }
}

/// Resolves `config` into the fixed stage order, leaving out disabled stages.
pub fn plan_stages(config: &EffectConfig) -> Result<Vec<Stage>> {
    config.validate()?;
    let mut stages = Vec::new();

    match config.filter {
        FilterKind::None => {}
        FilterKind::Grayscale => stages.push(Stage::Tone(ToneFilter::Grayscale)),
        FilterKind::Sepia => stages.push(Stage::Tone(ToneFilter::Sepia)),
        FilterKind::Invert => stages.push(Stage::Tone(ToneFilter::Invert)),
        FilterKind::Posterize => {
            stages.push(Stage::Posterize(Posterize::new(config.posterize_levels)?))
        }
    }

    if config.blur {
        stages.push(Stage::Blur(BoxBlur::default()));
    }
    if config.glitch {
        stages.push(Stage::Glitch(Glitch::new()));
    }
    if config.noise_amount > 0.0 {
        stages.push(Stage::Noise(Noise::new(config.noise_amount)?));
    }
    if config.vignette_intensity > 0.0 {
        stages.push(Stage::Vignette(Vignette::new(config.vignette_intensity)?));
    }
    if let Some(overlay) = &config.watermark {
        stages.push(Stage::Watermark {
            compositor: WatermarkCompositor::default(),
            overlay: Arc::clone(overlay),
        });
    }
    if config.colorblind != ColorblindMode::Normal {
        stages.push(Stage::Colorblind(config.colorblind));
    }

    Ok(stages)
}
