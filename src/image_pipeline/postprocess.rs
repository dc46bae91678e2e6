//! Post-processing orchestration module
//!
//! Turns an [`EffectConfig`] into an ordered stage list and runs it over a
//! caller-owned buffer, with optional timing and cancellation.

mod cancel;
mod runner;
pub mod config;
pub mod stage;
pub mod timing;

#[cfg(test)]
mod tests;

pub use cancel::CancelFlag;
pub use config::{EffectConfig, EffectConfigBuilder, FilterKind};
pub use runner::EffectPipeline;
pub use stage::Stage;
pub use timing::{RunTimings, StageOutcome, StageTiming};
