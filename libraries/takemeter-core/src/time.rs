//! Sample offsets to wall-clock style labels
//!
//! Offsets are converted with integer arithmetic, so a label never drifts
//! from the sample count it was derived from. Sub-second remainders are kept
//! in the [`Duration`] (nanosecond resolution) and truncated when formatting.

use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Converts sample offsets to `MM:SS` and `HH:MM:SS` labels
pub struct TimeCodec;

impl TimeCodec {
    /// Seconds covered by `samples` frames at `sample_rate`
    pub fn samples_to_seconds(samples: usize, sample_rate: u32) -> f64 {
        if sample_rate == 0 {
            return 0.0;
        }
        samples as f64 / f64::from(sample_rate)
    }

    /// Exact duration covered by `samples` frames, truncated to the nanosecond
    pub fn samples_to_duration(samples: usize, sample_rate: u32) -> Duration {
        if sample_rate == 0 {
            return Duration::ZERO;
        }
        let nanos = samples as u128 * NANOS_PER_SEC / u128::from(sample_rate);
        let secs = (nanos / NANOS_PER_SEC) as u64;
        let subsec = (nanos % NANOS_PER_SEC) as u32;
        Duration::new(secs, subsec)
    }

    /// Format as `MM:SS` below one hour, `HH:MM:SS` otherwise
    pub fn format(duration: Duration) -> String {
        let total = duration.as_secs();
        let (hours, minutes, seconds) = (total / 3600, (total / 60) % 60, total % 60);

        if hours > 0 {
            format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
        } else {
            format!("{:02}:{:02}", minutes, seconds)
        }
    }

    /// Format a number of seconds; negative or non-finite input formats as zero
    pub fn format_seconds(seconds: f64) -> String {
        Self::format(Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO))
    }

    /// Like [`TimeCodec::format`], with a microsecond fraction appended
    pub fn format_precise(duration: Duration) -> String {
        format!("{}.{:06}", Self::format(duration), duration.subsec_micros())
    }

    /// Label for the half-open sample range `[start, end)`
    pub fn format_range(start: usize, end: usize, sample_rate: u32) -> String {
        format!(
            "{} - {}",
            Self::format(Self::samples_to_duration(start, sample_rate)),
            Self::format(Self::samples_to_duration(end, sample_rate))
        )
    }
}
