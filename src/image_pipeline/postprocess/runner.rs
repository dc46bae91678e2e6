use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, instrument};

use crate::image_pipeline::{
    common::error::{EffectError, Result},
    postprocess::{
        cancel::CancelFlag,
        config::EffectConfig,
        stage::{Stage, plan_stages},
        timing::{RunTimings, StageOutcome, Timer},
    },
    raster::PixelBuffer,
};

/// Applies the configured effects to a caller-owned [`PixelBuffer`] in a fixed
/// order. Each stage finishes before the next starts.
#[derive(Debug, Clone)]
pub struct EffectPipeline {
    config: EffectConfig,
    stages: Vec<Stage>,
}

impl EffectPipeline {
    pub fn new(config: EffectConfig) -> Result<Self> {
        let stages = plan_stages(&config)?;
        debug!(
            stages = ?stages.iter().map(Stage::name).collect::<Vec<_>>(),
            "Effect pipeline planned"
        );
        Ok(Self { config, stages })
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    /// Replaces the configuration. The old one stays in place if the new one
    /// does not validate.
    pub fn set_config(&mut self, config: EffectConfig) -> Result<()> {
        self.stages = plan_stages(&config)?;
        self.config = config;
        Ok(())
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(Stage::name).collect()
    }

    pub fn run<R: Rng>(&self, buffer: &mut PixelBuffer, rng: &mut R) -> Result<()> {
        self.execute(buffer, rng, None).map(|_| ())
    }

    /// Runs with a `StdRng` seeded from `seed`, so noise and glitch repeat.
    pub fn run_seeded(&self, buffer: &mut PixelBuffer, seed: u64) -> Result<()> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.run(buffer, &mut rng)
    }

    pub fn run_with_timings<R: Rng>(
        &self,
        buffer: &mut PixelBuffer,
        rng: &mut R,
    ) -> Result<RunTimings> {
        self.execute(buffer, rng, None)
    }

    /// Checks `cancel` before every stage and stops with
    /// `EffectError::Cancelled` once it is set. Stages already run stay applied.
    pub fn run_cancellable<R: Rng>(
        &self,
        buffer: &mut PixelBuffer,
        rng: &mut R,
        cancel: &CancelFlag,
    ) -> Result<RunTimings> {
        self.execute(buffer, rng, Some(cancel))
    }

    /// Runs the pipeline on a copy of `source` shrunk to fit within
    /// `max_width x max_height`. `source` itself is not modified.
    #[instrument(skip(self, source, rng), fields(width = source.width(), height = source.height()))]
    pub fn preview<R: Rng>(
        &self,
        source: &PixelBuffer,
        max_width: usize,
        max_height: usize,
        rng: &mut R,
    ) -> Result<PixelBuffer> {
        let mut frame = source.downscaled_to_fit(max_width, max_height)?;
        self.execute(&mut frame, rng, None)?;
        Ok(frame)
    }

    #[instrument(skip_all, fields(width = buffer.width(), height = buffer.height(), stages = self.stages.len()))]
    fn execute<R: Rng>(
        &self,
        buffer: &mut PixelBuffer,
        rng: &mut R,
        cancel: Option<&CancelFlag>,
    ) -> Result<RunTimings> {
        info!("Starting effect pipeline run");
        let mut timings = RunTimings::new();

        for stage in &self.stages {
            if cancel.is_some_and(CancelFlag::is_cancelled) {
                info!(next_stage = stage.name(), "Effect pipeline run cancelled");
                return Err(EffectError::Cancelled {
                    next_stage: stage.name(),
                });
            }

            let outcome = {
                let _span = tracing::info_span!("stage", name = stage.name()).entered();
                let timer = Timer::start(stage.name());
                let outcome = stage.apply(buffer, rng)?;
                let (name, duration) = timer.stop();
                debug!(
                    stage = name,
                    elapsed_ms = duration.as_secs_f64() * 1000.0,
                    "Stage finished"
                );
                timings.add_stage(name, duration, outcome.clone());
                outcome
            };

            if let StageOutcome::Skipped(reason) = outcome {
                debug!(stage = stage.name(), %reason, "Stage skipped");
            }
        }

        info!(
            width = buffer.width(),
            height = buffer.height(),
            applied = timings.applied().count(),
            total_ms = timings.total_duration().as_secs_f64() * 1000.0,
            "Effect pipeline run complete"
        );
        Ok(timings)
    }
}
