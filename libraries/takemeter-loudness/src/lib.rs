//! Loudness and dynamics measurement for Takemeter
//!
//! This crate provides:
//! - BS.1770 K-weighted, gated integrated loudness (LUFS) over any frame range
//! - Sliding-window short-term loudness with timestamped extremes
//! - Sample peak, trough and smoothed peak per channel (dBFS)
//! - PLR / PSR and the per-take report with a concatenated "Total"
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌───────────────┐     ┌─────────────┐     ┌────────┐
//! │ AudioSignal │ ──► │ ReportBuilder │ ──► │ MetricsRow  │ ──► │ Report │
//! └─────────────┘     └───────────────┘     └─────────────┘     └────────┘
//!                       │    │      │                               │
//!                       ▼    ▼      ▼                               ▼
//!             LoudnessMeter  │  PeakAnalyzer                   flag_row
//!                 SlidingWindowAnalyzer
//! ```
//!
//! # Example
//!
//! ```rust
//! use takemeter_core::AudioSignal;
//! use takemeter_loudness::{ReportBuilder, Targets, WindowConfig};
//!
//! let tone: Vec<f32> = (0..48_000 * 5)
//!     .map(|i| 0.5 * (i as f32 * 0.05).sin())
//!     .collect();
//! let take = AudioSignal::mono(tone, 48_000).unwrap();
//!
//! let builder = ReportBuilder::new(WindowConfig::default(), Targets::default());
//! let row = builder.build_row(&take).unwrap();
//!
//! println!("Integrated loudness: {:.1} LUFS", row.integrated_loudness);
//! println!("Max short-term: {:.1} LUFS at {}", row.max_short_term.lufs, row.max_short_term.label);
//! ```

#![deny(unsafe_code)]

mod error;
mod meter;
mod peak;
mod report;
mod row;
mod window;

pub use error::{LoudnessError, Result};
pub use meter::{LoudnessMeter, GATING_BLOCK_MS};
pub use peak::{to_db, PeakAnalyzer, DEFAULT_SMOOTHED_PEAK_SECONDS};
pub use report::{
    FailureKind, Report, ReportBuilder, ReportEntry, RowFailure, RowOutcome, TOTAL_NAME,
};
pub use row::{flag_row, Flag, MetricsRow, RowFlags, Targets, DEFAULT_SHORT_TERM_TARGET};
pub use window::{
    LoudnessWindow, ShortTermExtremes, ShortTermValue, SlidingWindowAnalyzer, WindowConfig,
    Windows, DEFAULT_WINDOW_SECONDS, MIN_WINDOW_SECONDS,
};
