//! Per-take report record and target flagging

use crate::window::ShortTermValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default short-term loudness ceiling in LUFS
pub const DEFAULT_SHORT_TERM_TARGET: f64 = -9.0;

/// Measurements of one take (or of the concatenated Total)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRow {
    pub sample_rate: u32,
    /// `MM:SS` length of the take
    pub duration_label: String,
    /// Integrated loudness in LUFS
    pub integrated_loudness: f64,
    /// Loudest short-term window
    pub max_short_term: ShortTermValue,
    /// Quietest short-term window
    pub min_short_term: ShortTermValue,
    /// Sample peak per channel in dBFS
    pub peak_per_channel: Vec<f64>,
    /// Sample trough per channel in dBFS
    pub trough_per_channel: Vec<f64>,
    /// Rolling-mean peak per channel in dBFS, absent for takes shorter
    /// than the smoothing window
    pub smoothed_peak_per_channel: Option<Vec<f64>>,
    /// Peak-to-loudness ratio: mean peak minus integrated loudness
    pub plr: f64,
    /// Peak-to-short-term ratio: mean peak minus maximum short-term loudness
    pub psr: f64,
}

impl MetricsRow {
    /// Mean of the per-channel sample peaks in dB
    pub fn mean_peak(&self) -> f64 {
        mean(&self.peak_per_channel)
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NEG_INFINITY;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Loudness ceilings the report is checked against
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Targets {
    /// Ceiling for the maximum short-term loudness
    pub short_term: Option<f64>,
    /// Ceiling for the integrated loudness
    pub integrated: Option<f64>,
}

impl Targets {
    pub fn new(short_term: Option<f64>, integrated: Option<f64>) -> Self {
        Self {
            short_term,
            integrated,
        }
    }
}

/// Whether a value exceeds its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    /// No target configured
    Unchecked,
    /// At or below the target
    Within,
    /// Above the target
    Over,
}

impl Flag {
    fn check(value: f64, target: Option<f64>) -> Self {
        match target {
            None => Self::Unchecked,
            Some(target) if value > target => Self::Over,
            Some(_) => Self::Within,
        }
    }

    pub fn is_over(self) -> bool {
        self == Self::Over
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unchecked => "unchecked",
            Self::Within => "within",
            Self::Over => "over",
        };
        f.write_str(s)
    }
}

/// Target flags of one row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowFlags {
    pub integrated: Flag,
    pub max_short_term: Flag,
}

impl RowFlags {
    pub fn any_over(&self) -> bool {
        self.integrated.is_over() || self.max_short_term.is_over()
    }
}

/// Compare a row against the targets
pub fn flag_row(row: &MetricsRow, targets: &Targets) -> RowFlags {
    RowFlags {
        integrated: Flag::check(row.integrated_loudness, targets.integrated),
        max_short_term: Flag::check(row.max_short_term.lufs, targets.short_term),
    }
}
