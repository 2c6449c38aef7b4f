//! Error types for loudness measurement

use takemeter_core::MeterError;
use thiserror::Error;

/// Result type for loudness operations
pub type Result<T> = std::result::Result<T, LoudnessError>;

/// Errors that can occur while measuring a take
#[derive(Error, Debug)]
pub enum LoudnessError {
    /// Signal construction or concatenation failed
    #[error(transparent)]
    Signal(#[from] MeterError),

    /// Range is shorter than one gating block
    #[error("Insufficient samples: {actual} frames, at least {required} required")]
    InsufficientSamples { required: usize, actual: usize },

    /// Signal is too short to form a single short-term window
    #[error("No short-term windows: {frames} frames, at least {required} required")]
    NoWindows { frames: usize, required: usize },

    /// Invalid measurement configuration
    #[error("Invalid configuration: {0}")]
    Validation(String),

    /// EBU R128 analysis error
    #[error("EBU R128 analysis failed: {0}")]
    Analysis(String),
}

impl From<ebur128::Error> for LoudnessError {
    fn from(err: ebur128::Error) -> Self {
        Self::Analysis(format!("{:?}", err))
    }
}
