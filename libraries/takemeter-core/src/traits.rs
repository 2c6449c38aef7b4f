/// Core traits for Takemeter
use crate::error::Result;
use crate::signal::AudioSignal;
use std::path::Path;

/// Audio decoder trait
///
/// Implementers decode a whole audio file into an [`AudioSignal`]. The
/// measurement crates only ever see the returned signal.
pub trait AudioDecoder: Send {
    /// Decode an audio file from the given path (loads entire file)
    ///
    /// # Errors
    /// Returns `MeterError::Decode` if the file cannot be read or decoded
    fn decode(&mut self, path: &Path) -> Result<AudioSignal>;

    /// Check if the decoder supports the given file format
    fn supports_format(&self, path: &Path) -> bool;
}
