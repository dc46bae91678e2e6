use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EffectError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Pixel sequence length mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Pixel ({x}, {y}) out of range for {width}x{height} buffer")]
    IndexOutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("Resource is not pixel-readable: {0}")]
    UnreadableResource(String),

    #[error("Pipeline run cancelled before stage '{next_stage}'")]
    Cancelled { next_stage: &'static str },
}

pub type Result<T> = std::result::Result<T, EffectError>;
