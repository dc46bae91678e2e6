//! Capture post-processing pipeline module
//!
//! This module applies a fixed chain of pixel effects to a captured raster,
//! with separate modules for raster storage, the individual effects, and
//! pipeline orchestration.

pub mod common;
pub mod effects;
pub mod postprocess;
pub mod raster;

pub use common::{
    EffectError,
    Result,
};

pub use raster::{
    OverlaySource,
    PixelBuffer,
    Rgba,
};

pub use effects::{
    ColorMatrix,
    ColorblindMode,
    WatermarkCompositor,
};

pub use postprocess::{
    CancelFlag,
    EffectConfig,
    EffectConfigBuilder,
    EffectPipeline,
    FilterKind,
    RunTimings,
};
