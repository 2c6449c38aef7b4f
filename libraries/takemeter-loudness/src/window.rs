//! Sliding-window short-term loudness
//!
//! A fixed-duration window (3 s by default) is moved across the signal with a
//! fixed hop (half a second by default). Each window is measured with the
//! integrated-loudness gating of BS.1770 and labelled with its time range.
//! Windows shorter than one second, which only occur at the end of the
//! signal, are never reported.

use crate::error::{LoudnessError, Result};
use crate::meter::LoudnessMeter;
use serde::Serialize;
use takemeter_core::{AudioSignal, TimeCodec};

/// Default short-term window length in seconds
pub const DEFAULT_WINDOW_SECONDS: f64 = 3.0;

/// Shortest window that is measured, in seconds
pub const MIN_WINDOW_SECONDS: f64 = 1.0;

/// Window and hop durations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowConfig {
    window_seconds: f64,
    /// `None` hops by half the sample rate
    step_seconds: Option<f64>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_seconds: DEFAULT_WINDOW_SECONDS,
            step_seconds: None,
        }
    }
}

impl WindowConfig {
    /// Create a window configuration
    ///
    /// # Errors
    /// `Validation` when a duration is not positive, or the window is
    /// shorter than [`MIN_WINDOW_SECONDS`] and could never be reported.
    pub fn new(window_seconds: f64, step_seconds: Option<f64>) -> Result<Self> {
        if !window_seconds.is_finite() || window_seconds <= 0.0 {
            return Err(LoudnessError::Validation(format!(
                "window must be positive, got {window_seconds} s"
            )));
        }
        if window_seconds < MIN_WINDOW_SECONDS {
            return Err(LoudnessError::Validation(format!(
                "window must be at least {MIN_WINDOW_SECONDS} s, got {window_seconds} s"
            )));
        }
        if let Some(step) = step_seconds {
            if !step.is_finite() || step <= 0.0 {
                return Err(LoudnessError::Validation(format!(
                    "step must be positive, got {step} s"
                )));
            }
        }

        Ok(Self {
            window_seconds,
            step_seconds,
        })
    }

    pub fn window_seconds(&self) -> f64 {
        self.window_seconds
    }

    pub fn step_seconds(&self) -> Option<f64> {
        self.step_seconds
    }

    /// Window length in frames
    pub fn window_frames(&self, sample_rate: u32) -> usize {
        (self.window_seconds * f64::from(sample_rate)).round() as usize
    }

    /// Hop length in frames, never zero
    pub fn step_frames(&self, sample_rate: u32) -> usize {
        let frames = match self.step_seconds {
            Some(step) => (step * f64::from(sample_rate)).round() as usize,
            None => sample_rate as usize / 2,
        };
        frames.max(1)
    }
}

/// One measured short-term window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoudnessWindow {
    /// First frame of the window
    pub start_sample: usize,
    /// One past the last frame of the window
    pub end_sample: usize,
    /// Loudness in LUFS, `-inf` for silence
    pub loudness_lufs: f64,
    /// `MM:SS - MM:SS` range label
    pub label: String,
}

/// A short-term loudness value and the window it was measured in
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortTermValue {
    pub lufs: f64,
    pub label: String,
}

impl From<&LoudnessWindow> for ShortTermValue {
    fn from(window: &LoudnessWindow) -> Self {
        Self {
            lufs: window.loudness_lufs,
            label: window.label.clone(),
        }
    }
}

/// Loudest and quietest short-term windows of a signal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortTermExtremes {
    pub max: ShortTermValue,
    pub min: ShortTermValue,
}

impl ShortTermExtremes {
    fn starting_at(window: &LoudnessWindow) -> Self {
        let value = ShortTermValue::from(window);
        Self {
            max: value.clone(),
            min: value,
        }
    }

    /// Fold in the next window in scan order; ties keep the earlier window
    fn observe(&mut self, window: &LoudnessWindow) {
        if window.loudness_lufs > self.max.lufs {
            self.max = window.into();
        }
        if window.loudness_lufs < self.min.lufs {
            self.min = window.into();
        }
    }

    /// Reduce windows to their extremes; ties keep the earliest window
    ///
    /// Returns `None` for an empty sequence.
    pub fn from_windows<'a, I>(windows: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a LoudnessWindow>,
    {
        let mut iter = windows.into_iter();
        let mut extremes = Self::starting_at(iter.next()?);
        for window in iter {
            extremes.observe(window);
        }
        Some(extremes)
    }
}

/// Scans a signal with a fixed window and hop
#[derive(Debug, Clone, Default)]
pub struct SlidingWindowAnalyzer {
    config: WindowConfig,
}

impl SlidingWindowAnalyzer {
    pub fn new(config: WindowConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Lazily measure every retained window in scan order
    ///
    /// The sequence is finite; calling this again restarts the scan.
    pub fn windows<'a>(
        &self,
        signal: &'a AudioSignal,
        meter: &'a mut LoudnessMeter,
    ) -> Windows<'a> {
        let sample_rate = signal.sample_rate();
        Windows {
            signal,
            meter,
            next_start: 0,
            window: self.config.window_frames(sample_rate),
            step: self.config.step_frames(sample_rate),
            min_frames: sample_rate as usize,
        }
    }

    /// Measure and collect every retained window
    ///
    /// # Errors
    /// `NoWindows` when the signal is shorter than one second.
    pub fn series(
        &self,
        signal: &AudioSignal,
        meter: &mut LoudnessMeter,
    ) -> Result<Vec<LoudnessWindow>> {
        let series = self
            .windows(signal, meter)
            .collect::<Result<Vec<_>>>()?;
        if series.is_empty() {
            return Err(no_windows(signal));
        }
        Ok(series)
    }

    /// Loudest and quietest short-term windows
    ///
    /// # Errors
    /// `NoWindows` when the signal is shorter than one second.
    pub fn extremes(
        &self,
        signal: &AudioSignal,
        meter: &mut LoudnessMeter,
    ) -> Result<ShortTermExtremes> {
        let mut windows = self.windows(signal, meter);
        let first = windows.next().ok_or_else(|| no_windows(signal))??;
        let mut extremes = ShortTermExtremes::starting_at(&first);
        for window in windows {
            extremes.observe(&window?);
        }
        Ok(extremes)
    }
}

fn no_windows(signal: &AudioSignal) -> LoudnessError {
    LoudnessError::NoWindows {
        frames: signal.len(),
        required: signal.sample_rate() as usize,
    }
}

/// Lazy sequence of measured windows, see [`SlidingWindowAnalyzer::windows`]
pub struct Windows<'a> {
    signal: &'a AudioSignal,
    meter: &'a mut LoudnessMeter,
    next_start: usize,
    window: usize,
    step: usize,
    min_frames: usize,
}

impl Iterator for Windows<'_> {
    type Item = Result<LoudnessWindow>;

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.signal.len();
        let start = self.next_start;
        if start >= len {
            return None;
        }

        let end = len.min(start.saturating_add(self.window));
        if end - start < self.min_frames {
            // Every later window ends at `len` too and is shorter still
            self.next_start = len;
            return None;
        }
        self.next_start = start.saturating_add(self.step);

        let sample_rate = self.signal.sample_rate();
        Some(
            self.meter
                .integrated_loudness_range(self.signal, start, end)
                .map(|loudness_lufs| LoudnessWindow {
                    start_sample: start,
                    end_sample: end,
                    loudness_lufs,
                    label: TimeCodec::format_range(start, end, sample_rate),
                }),
        )
    }
}
