//! Takemeter Core
//!
//! Platform-agnostic signal types, time labels, traits, and error handling
//! shared by every Takemeter crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Signal Types**: [`AudioSignal`], an immutable buffer of interleaved frames
//! - **Time Labels**: [`TimeCodec`], sample offsets to `MM:SS` / `HH:MM:SS`
//! - **Core Traits**: [`AudioDecoder`], the seam to the file decoder
//! - **Error Handling**: Unified [`MeterError`] and [`Result`] types
//!
//! # Example
//!
//! ```rust
//! use takemeter_core::{AudioSignal, TimeCodec};
//!
//! let a = AudioSignal::mono(vec![0.0; 48_000], 48_000).unwrap();
//! let b = AudioSignal::mono(vec![0.5; 96_000], 48_000).unwrap();
//!
//! let total = a.concat(&b).unwrap();
//! assert_eq!(total.len(), 144_000);
//! assert_eq!(total.duration_label(), "00:03");
//! assert_eq!(TimeCodec::format_seconds(3661.0), "01:01:01");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod signal;
pub mod time;
pub mod traits;

pub use error::{MeterError, Result};
pub use signal::{AudioSignal, MAX_CHANNELS};
pub use time::TimeCodec;
pub use traits::AudioDecoder;
