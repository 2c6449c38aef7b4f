/// Core error types for Takemeter
use thiserror::Error;

/// Result type alias using `MeterError`
pub type Result<T> = std::result::Result<T, MeterError>;

/// Core error type for Takemeter
#[derive(Error, Debug)]
pub enum MeterError {
    /// Two signals with different sample rates were concatenated
    #[error("Sample rate mismatch: expected {expected} Hz, found {found} Hz")]
    SampleRateMismatch {
        /// Sample rate of the left-hand signal
        expected: u32,
        /// Sample rate of the right-hand signal
        found: u32,
    },

    /// Two signals with different channel counts were concatenated
    #[error("Channel count mismatch: expected {expected}, found {found}")]
    ChannelCountMismatch {
        /// Channel count of the left-hand signal
        expected: usize,
        /// Channel count of the right-hand signal
        found: usize,
    },

    /// Only mono and stereo signals are measured
    #[error("Unsupported channel count: {0} (must be 1 or 2)")]
    UnsupportedChannelCount(usize),

    /// Sample rate must be positive
    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),

    /// Sample buffer does not hold whole frames
    #[error("Invalid audio buffer: {0}")]
    InvalidBuffer(String),

    /// A take could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MeterError {
    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}
