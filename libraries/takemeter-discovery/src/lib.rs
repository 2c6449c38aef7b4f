//! Take discovery for Takemeter
//!
//! Turns the file and folder arguments of a run into the ordered list of
//! takes to measure. Folders are expanded to the audio files they contain,
//! non-audio files are dropped, and the result is sorted and de-duplicated
//! so report order never depends on directory iteration order.
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use takemeter_discovery::TakeScanner;
//!
//! # fn example() -> takemeter_discovery::Result<()> {
//! let takes = TakeScanner::new()
//!     .recursive(true)
//!     .discover(&[PathBuf::from("/sessions/vocals")])?;
//! # Ok(())
//! # }
//! ```

mod error;
mod scanner;

pub use error::{DiscoveryError, Result};
pub use scanner::{TakeScanner, DEFAULT_EXTENSIONS};
