//! Per-take and Total report assembly
//!
//! Every take is measured on its own; a take that fails becomes a failure
//! row instead of aborting the report. With more than one take, all signals
//! are concatenated in input order into a synthetic "Total" take, measured
//! last. The Total is only formed when every take decoded.

use crate::error::{LoudnessError, Result};
use crate::meter::LoudnessMeter;
use crate::peak::PeakAnalyzer;
use crate::row::{flag_row, mean, MetricsRow, RowFlags, Targets};
use crate::window::{LoudnessWindow, ShortTermExtremes, SlidingWindowAnalyzer, WindowConfig};
use serde::Serialize;
use std::fmt;
use takemeter_core::{AudioSignal, MeterError};
use tracing::{debug, info, warn};

/// Report key of the concatenated pseudo-take
pub const TOTAL_NAME: &str = "Total";

/// Why a row has no measurements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The take could not be decoded
    Decode,
    /// The take decoded but could not be measured (too short, invalid)
    Measurement,
    /// Takes could not be concatenated into the Total
    Concatenation,
    /// The Total was skipped because a take failed to decode
    TotalAborted,
}

/// Row-level failure marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl RowFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// A take that failed to decode
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Decode, message)
    }
}

impl From<&LoudnessError> for RowFailure {
    fn from(err: &LoudnessError) -> Self {
        let kind = match err {
            LoudnessError::Signal(
                MeterError::SampleRateMismatch { .. } | MeterError::ChannelCountMismatch { .. },
            ) => FailureKind::Concatenation,
            LoudnessError::Signal(MeterError::Decode(_)) => FailureKind::Decode,
            _ => FailureKind::Measurement,
        };
        Self::new(kind, err.to_string())
    }
}

impl fmt::Display for RowFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Measured row or failure marker
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum RowOutcome {
    Measured(MetricsRow),
    Failed(RowFailure),
}

impl RowOutcome {
    pub fn row(&self) -> Option<&MetricsRow> {
        match self {
            Self::Measured(row) => Some(row),
            Self::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&RowFailure> {
        match self {
            Self::Measured(_) => None,
            Self::Failed(failure) => Some(failure),
        }
    }
}

/// One keyed entry of the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    /// Take path, or [`TOTAL_NAME`]
    pub name: String,
    #[serde(flatten)]
    pub outcome: RowOutcome,
    /// Short-term windows in scan order, collected only when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<Vec<LoudnessWindow>>,
}

impl ReportEntry {
    pub fn is_total(&self) -> bool {
        self.name == TOTAL_NAME
    }
}

/// Ordered report: takes in input order, Total last
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub targets: Targets,
    entries: Vec<ReportEntry>,
}

impl Report {
    pub fn new(targets: Targets) -> Self {
        Self {
            targets,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&ReportEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn total(&self) -> Option<&ReportEntry> {
        self.get(TOTAL_NAME)
    }

    /// Names and rows of the successfully measured entries
    pub fn rows(&self) -> impl Iterator<Item = (&str, &MetricsRow)> {
        self.entries
            .iter()
            .filter_map(|e| e.outcome.row().map(|row| (e.name.as_str(), row)))
    }

    /// Target flags per entry; `None` for failed rows
    pub fn flags(&self) -> Vec<Option<RowFlags>> {
        self.entries
            .iter()
            .map(|e| e.outcome.row().map(|row| flag_row(row, &self.targets)))
            .collect()
    }

    pub fn measured_count(&self) -> usize {
        self.rows().count()
    }

    pub fn failed_count(&self) -> usize {
        self.entries.len() - self.measured_count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Drives measurement of takes and assembles the report
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    analyzer: SlidingWindowAnalyzer,
    targets: Targets,
    smoothed_peak_seconds: Option<f64>,
    collect_series: bool,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new(WindowConfig::default(), Targets::default())
    }
}

impl ReportBuilder {
    pub fn new(config: WindowConfig, targets: Targets) -> Self {
        Self {
            analyzer: SlidingWindowAnalyzer::new(config),
            targets,
            smoothed_peak_seconds: None,
            collect_series: false,
        }
    }

    /// Also measure the rolling-mean peak over `seconds`
    pub fn with_smoothed_peak(mut self, seconds: f64) -> Self {
        self.smoothed_peak_seconds = Some(seconds);
        self
    }

    /// Keep every short-term window in the report entries
    pub fn with_series(mut self, collect: bool) -> Self {
        self.collect_series = collect;
        self
    }

    pub fn targets(&self) -> &Targets {
        &self.targets
    }

    pub fn analyzer(&self) -> &SlidingWindowAnalyzer {
        &self.analyzer
    }

    /// Measure one signal
    ///
    /// # Errors
    /// `NoWindows` for signals shorter than one second, `Signal` for
    /// formats the meter cannot handle.
    pub fn build_row(&self, signal: &AudioSignal) -> Result<MetricsRow> {
        self.measure(signal, false).map(|(row, _)| row)
    }

    fn measure(
        &self,
        signal: &AudioSignal,
        keep_series: bool,
    ) -> Result<(MetricsRow, Option<Vec<LoudnessWindow>>)> {
        let mut meter = LoudnessMeter::for_signal(signal)?;

        let (extremes, series) = if keep_series {
            let series = self.analyzer.series(signal, &mut meter)?;
            let extremes = ShortTermExtremes::from_windows(&series).ok_or_else(|| {
                LoudnessError::NoWindows {
                    frames: signal.len(),
                    required: signal.sample_rate() as usize,
                }
            })?;
            (extremes, Some(series))
        } else {
            (self.analyzer.extremes(signal, &mut meter)?, None)
        };

        let integrated_loudness = meter.integrated_loudness(signal)?;
        let peak_per_channel = PeakAnalyzer::sample_peak(signal);
        let trough_per_channel = PeakAnalyzer::sample_trough(signal);

        let smoothed_peak_per_channel = match self.smoothed_peak_seconds {
            None => None,
            Some(seconds) => match PeakAnalyzer::smoothed_peak(signal, seconds) {
                Ok(peaks) => Some(peaks),
                Err(LoudnessError::InsufficientSamples { .. }) => None,
                Err(e) => return Err(e),
            },
        };

        let mean_peak = mean(&peak_per_channel);
        let row = MetricsRow {
            sample_rate: signal.sample_rate(),
            duration_label: signal.duration_label(),
            integrated_loudness,
            psr: mean_peak - extremes.max.lufs,
            plr: mean_peak - integrated_loudness,
            max_short_term: extremes.max,
            min_short_term: extremes.min,
            peak_per_channel,
            trough_per_channel,
            smoothed_peak_per_channel,
        };

        Ok((row, series))
    }

    /// Measure a named take into a report entry; failures become markers
    pub fn take_entry(&self, name: impl Into<String>, signal: &AudioSignal) -> ReportEntry {
        let name = name.into();
        debug!(
            take = %name,
            frames = signal.len(),
            sample_rate = signal.sample_rate(),
            "Measuring take"
        );

        let (outcome, series) = match self.measure(signal, self.collect_series) {
            Ok((row, series)) => {
                info!(
                    take = %name,
                    integrated = row.integrated_loudness,
                    max_short_term = row.max_short_term.lufs,
                    "Measured take"
                );
                (RowOutcome::Measured(row), series)
            }
            Err(e) => {
                warn!(take = %name, error = %e, "Failed to measure take");
                (RowOutcome::Failed(RowFailure::from(&e)), None)
            }
        };

        ReportEntry {
            name,
            outcome,
            series,
        }
    }

    /// Entry for one take's decode outcome
    ///
    /// Decoded takes are measured; decode failures are kept as they are.
    pub fn outcome_entry(
        &self,
        name: impl Into<String>,
        decoded: &std::result::Result<AudioSignal, RowFailure>,
    ) -> ReportEntry {
        match decoded {
            Ok(signal) => self.take_entry(name, signal),
            Err(failure) => ReportEntry {
                name: name.into(),
                outcome: RowOutcome::Failed(failure.clone()),
                series: None,
            },
        }
    }

    /// Concatenate `signals` in order into one signal
    ///
    /// # Errors
    /// `Validation` when `signals` is empty, `Signal` on rate or
    /// channel mismatches between takes.
    pub fn build_total(&self, signals: &[&AudioSignal]) -> Result<AudioSignal> {
        let first = signals
            .first()
            .ok_or_else(|| LoudnessError::Validation("no takes to concatenate".to_string()))?;
        let identity = AudioSignal::empty(first.sample_rate(), first.channel_count())?;
        Ok(AudioSignal::concat_all(identity, signals.iter().copied())?)
    }

    /// The Total entry, given every take's decoded signal in input order
    ///
    /// `None` marks a take without a signal, which aborts the Total.
    /// A single take gets no Total, so this returns `None` then.
    pub fn total_entry(&self, signals: &[Option<&AudioSignal>]) -> Option<ReportEntry> {
        if signals.len() < 2 {
            return None;
        }

        let failed = signals.iter().filter(|s| s.is_none()).count();
        if failed > 0 {
            warn!(failed, "Skipping Total: not every take decoded");
            return Some(ReportEntry {
                name: TOTAL_NAME.to_string(),
                outcome: RowOutcome::Failed(RowFailure::new(
                    FailureKind::TotalAborted,
                    format!("{failed} take(s) failed to decode"),
                )),
                series: None,
            });
        }

        let decoded: Vec<&AudioSignal> = signals.iter().flatten().copied().collect();
        let entry = match self.build_total(&decoded) {
            Ok(total) => self.take_entry(TOTAL_NAME, &total),
            Err(e) => {
                warn!(error = %e, "Failed to concatenate takes into Total");
                ReportEntry {
                    name: TOTAL_NAME.to_string(),
                    outcome: RowOutcome::Failed(RowFailure::from(&e)),
                    series: None,
                }
            }
        };
        Some(entry)
    }

    /// Measure decoded takes in order, then the Total when there are several
    pub fn build_report(&self, takes: &[(String, AudioSignal)]) -> Report {
        let mut report = Report::new(self.targets);
        for (name, signal) in takes {
            report.push(self.take_entry(name.clone(), signal));
        }

        let signals: Vec<Option<&AudioSignal>> = takes.iter().map(|(_, s)| Some(s)).collect();
        if let Some(total) = self.total_entry(&signals) {
            report.push(total);
        }
        report
    }

    /// Like [`ReportBuilder::build_report`], for takes that may have failed to decode
    pub fn build_report_from_outcomes(
        &self,
        takes: &[(String, std::result::Result<AudioSignal, RowFailure>)],
    ) -> Report {
        let mut report = Report::new(self.targets);
        for (name, decoded) in takes {
            report.push(self.outcome_entry(name.clone(), decoded));
        }

        let signals: Vec<Option<&AudioSignal>> =
            takes.iter().map(|(_, s)| s.as_ref().ok()).collect();
        if let Some(total) = self.total_entry(&signals) {
            report.push(total);
        }
        report
    }
}
