//! Common utilities module
//!
//! This module contains the error taxonomy shared across the effect pipeline.

pub mod error;

pub use error::{EffectError, Result};
