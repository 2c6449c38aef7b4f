//! Sample peak, trough and smoothed peak per channel, in dBFS

use crate::error::{LoudnessError, Result};
use takemeter_core::AudioSignal;

/// Default rolling-mean window of [`PeakAnalyzer::smoothed_peak`], in seconds
pub const DEFAULT_SMOOTHED_PEAK_SECONDS: f64 = 2.0;

/// Convert a linear amplitude to decibels; silence maps to `-inf`
pub fn to_db(amplitude: f64) -> f64 {
    let amplitude = amplitude.abs();
    if amplitude == 0.0 {
        return f64::NEG_INFINITY;
    }
    20.0 * amplitude.log10()
}

/// Per-channel peak measurements
pub struct PeakAnalyzer;

impl PeakAnalyzer {
    /// Largest absolute sample value of each channel, in dBFS
    pub fn sample_peak(signal: &AudioSignal) -> Vec<f64> {
        Self::per_channel(signal, |samples| {
            samples.map(f32::abs).reduce(f32::max)
        })
    }

    /// Smallest absolute sample value of each channel, in dBFS
    pub fn sample_trough(signal: &AudioSignal) -> Vec<f64> {
        Self::per_channel(signal, |samples| {
            samples.map(f32::abs).reduce(f32::min)
        })
    }

    /// Peak of a causal rolling mean over `window_seconds`, per channel
    ///
    /// Positions without a full window behind them produce no output.
    ///
    /// # Errors
    /// `Validation` for a non-positive window, `InsufficientSamples` when
    /// the signal is shorter than one window.
    pub fn smoothed_peak(signal: &AudioSignal, window_seconds: f64) -> Result<Vec<f64>> {
        if !window_seconds.is_finite() || window_seconds <= 0.0 {
            return Err(LoudnessError::Validation(format!(
                "smoothing window must be positive, got {window_seconds} s"
            )));
        }

        let window = (window_seconds * f64::from(signal.sample_rate())).round() as usize;
        if window == 0 || signal.len() < window {
            return Err(LoudnessError::InsufficientSamples {
                required: window.max(1),
                actual: signal.len(),
            });
        }

        let peaks = (0..signal.channel_count())
            .map(|ch| {
                let mut trailing = signal.channel(ch);
                let mut sum = 0.0_f64;
                let mut peak = 0.0_f64;

                for (i, sample) in signal.channel(ch).enumerate() {
                    sum += f64::from(sample);
                    if i >= window {
                        sum -= trailing.next().map_or(0.0, f64::from);
                    }
                    if i + 1 >= window {
                        peak = peak.max((sum / window as f64).abs());
                    }
                }

                to_db(peak)
            })
            .collect();

        Ok(peaks)
    }

    fn per_channel<F>(signal: &AudioSignal, reduce: F) -> Vec<f64>
    where
        F: Fn(&mut dyn Iterator<Item = f32>) -> Option<f32>,
    {
        (0..signal.channel_count())
            .map(|ch| {
                reduce(&mut signal.channel(ch))
                    .map_or(f64::NEG_INFINITY, |amplitude| to_db(f64::from(amplitude)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_db() {
        assert_eq!(to_db(1.0), 0.0);
        assert!((to_db(0.5) - -6.0206).abs() < 1e-3);
        assert!((to_db(-0.1) - -20.0).abs() < 1e-9);
        assert_eq!(to_db(0.0), f64::NEG_INFINITY);
    }

    #[test]
    fn test_full_scale_peak_is_zero_db() {
        let signal = AudioSignal::mono(vec![1.0, -1.0, 1.0, -1.0], 48_000).unwrap();
        let peak = PeakAnalyzer::sample_peak(&signal);
        assert_eq!(peak.len(), 1);
        assert!(peak[0].abs() < 1e-6);
    }

    #[test]
    fn test_peak_and_trough_per_channel() {
        let signal = AudioSignal::from_planar(
            &[vec![0.5, -0.25, 0.1], vec![-0.05, 0.01, 0.0]],
            48_000,
        )
        .unwrap();

        let peak = PeakAnalyzer::sample_peak(&signal);
        assert!((peak[0] - to_db(0.5)).abs() < 1e-9);
        assert!((peak[1] - to_db(0.05)).abs() < 1e-6);

        let trough = PeakAnalyzer::sample_trough(&signal);
        assert!((trough[0] - to_db(0.1)).abs() < 1e-6);
        assert_eq!(trough[1], f64::NEG_INFINITY);
    }

    #[test]
    fn test_silence_peaks() {
        let silence = AudioSignal::new(vec![0.0; 200], 48_000, 2).unwrap();
        assert_eq!(
            PeakAnalyzer::sample_peak(&silence),
            vec![f64::NEG_INFINITY, f64::NEG_INFINITY]
        );
        assert_eq!(
            PeakAnalyzer::sample_trough(&silence),
            vec![f64::NEG_INFINITY, f64::NEG_INFINITY]
        );

        let empty = AudioSignal::empty(48_000, 1).unwrap();
        assert_eq!(PeakAnalyzer::sample_peak(&empty), vec![f64::NEG_INFINITY]);
    }

    #[test]
    fn test_smoothed_peak_drops_leading_window() {
        // 4 frames per window at 2 Hz over 2 seconds
        let samples = vec![1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let signal = AudioSignal::mono(samples, 2).unwrap();

        // Full windows: [1,1,1,0] .. [0,0,0,0]; the partial leading
        // windows (mean 1.0) are excluded, so the peak is 0.75
        let peak = PeakAnalyzer::smoothed_peak(&signal, 2.0).unwrap();
        assert!((peak[0] - to_db(0.75)).abs() < 1e-9);
    }

    #[test]
    fn test_smoothed_peak_needs_a_full_window() {
        let signal = AudioSignal::mono(vec![0.5; 3], 2).unwrap();
        assert!(matches!(
            PeakAnalyzer::smoothed_peak(&signal, 2.0),
            Err(LoudnessError::InsufficientSamples {
                required: 4,
                actual: 3
            })
        ));
        assert!(matches!(
            PeakAnalyzer::smoothed_peak(&signal, 0.0),
            Err(LoudnessError::Validation(_))
        ));
    }

    #[test]
    fn test_smoothed_mean_cancels_symmetric_wave() {
        let samples: Vec<f32> = (0..400).map(|i| if i % 2 == 0 { 0.8 } else { -0.8 }).collect();
        let signal = AudioSignal::mono(samples, 100).unwrap();
        let peak = PeakAnalyzer::smoothed_peak(&signal, 1.0).unwrap();
        assert!(peak[0] < -100.0);
    }
}
