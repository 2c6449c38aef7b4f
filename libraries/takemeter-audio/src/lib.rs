//! Takemeter Audio
//!
//! Decodes recorded takes into [`AudioSignal`](takemeter_core::AudioSignal)s
//! via Symphonia (WAV, FLAC, MP3, OGG Vorbis, AAC / M4A).
//!
//! # Example
//!
//! ```rust,no_run
//! use takemeter_audio::SymphoniaDecoder;
//! use takemeter_core::AudioDecoder;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut decoder = SymphoniaDecoder::new();
//! let take = decoder.decode(Path::new("/sessions/vocals/take1.wav"))?;
//!
//! println!("Decoded {} frames at {} Hz", take.len(), take.sample_rate());
//! # Ok(())
//! # }
//! ```

mod decoder;
mod error;

pub use decoder::{SymphoniaDecoder, SUPPORTED_EXTENSIONS};
pub use error::{AudioError, Result};
