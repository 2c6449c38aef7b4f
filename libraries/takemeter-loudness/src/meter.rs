//! K-weighted integrated loudness
//!
//! Wraps the ebur128 crate, which implements the K-weighting pre-filter and
//! the absolute (-70 LUFS) and relative (-10 LU) gating of ITU-R BS.1770.
//! One meter is built per sample rate and channel layout; every window and
//! the whole-signal measurement reuse it via `reset`, which clears the
//! gating history but keeps the filter coefficients.

use crate::error::{LoudnessError, Result};
use ebur128::{EbuR128, Mode};
use takemeter_core::{AudioSignal, MeterError};

/// Length of one BS.1770 gating block in milliseconds
pub const GATING_BLOCK_MS: usize = 400;

/// Integrated loudness meter for one sample rate and channel count
pub struct LoudnessMeter {
    /// EBU R128 analyzer instance
    ebur128: EbuR128,
    sample_rate: u32,
    channels: usize,
}

impl LoudnessMeter {
    /// Create a new loudness meter
    ///
    /// # Arguments
    /// * `sample_rate` - Sample rate in Hz, any positive rate ebur128 accepts
    /// * `channels` - Number of channels (1-2)
    ///
    /// # Errors
    /// Returns error if sample rate or channel count is invalid
    pub fn new(sample_rate: u32, channels: usize) -> Result<Self> {
        if sample_rate == 0 {
            return Err(MeterError::InvalidSampleRate(sample_rate).into());
        }
        if !(1..=takemeter_core::MAX_CHANNELS).contains(&channels) {
            return Err(MeterError::UnsupportedChannelCount(channels).into());
        }

        let ebur128 = EbuR128::new(channels as u32, sample_rate, Mode::I)?;

        Ok(Self {
            ebur128,
            sample_rate,
            channels,
        })
    }

    /// Create a meter matching the format of `signal`
    pub fn for_signal(signal: &AudioSignal) -> Result<Self> {
        Self::new(signal.sample_rate(), signal.channel_count())
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Frames in one gating block, the shortest measurable range
    pub fn min_frames(&self) -> usize {
        (self.sample_rate as usize * GATING_BLOCK_MS).div_ceil(1000)
    }

    /// Integrated loudness of the whole signal in LUFS
    pub fn integrated_loudness(&mut self, signal: &AudioSignal) -> Result<f64> {
        self.integrated_loudness_range(signal, 0, signal.len())
    }

    /// Integrated loudness of the frames `[start, end)` in LUFS
    ///
    /// Returns `-inf` when every gating block is silent.
    ///
    /// # Errors
    /// `InsufficientSamples` when the range is shorter than one gating block,
    /// `Signal` when the signal format differs from the meter's.
    pub fn integrated_loudness_range(
        &mut self,
        signal: &AudioSignal,
        start: usize,
        end: usize,
    ) -> Result<f64> {
        self.check_format(signal)?;

        let frames = signal.frame_range(start, end);
        let actual = frames.len() / self.channels;
        let required = self.min_frames();
        if actual < required {
            return Err(LoudnessError::InsufficientSamples { required, actual });
        }

        self.ebur128.reset();
        self.ebur128.add_frames_f32(frames)?;
        let lufs = self.ebur128.loudness_global()?;

        if lufs.is_nan() {
            return Ok(f64::NEG_INFINITY);
        }
        Ok(lufs)
    }

    fn check_format(&self, signal: &AudioSignal) -> Result<()> {
        if signal.sample_rate() != self.sample_rate {
            return Err(MeterError::SampleRateMismatch {
                expected: self.sample_rate,
                found: signal.sample_rate(),
            }
            .into());
        }
        if signal.channel_count() != self.channels {
            return Err(MeterError::ChannelCountMismatch {
                expected: self.channels,
                found: signal.channel_count(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(sample_rate: u32, amplitude: f32, seconds: f32) -> AudioSignal {
        let frames = (sample_rate as f32 * seconds) as usize;
        let samples = (0..frames)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                amplitude * (2.0 * std::f32::consts::PI * 997.0 * t).sin()
            })
            .collect();
        AudioSignal::mono(samples, sample_rate).unwrap()
    }

    #[test]
    fn test_meter_creation() {
        assert!(LoudnessMeter::new(44_100, 2).is_ok());
        assert!(LoudnessMeter::new(48_000, 1).is_ok());

        assert!(LoudnessMeter::new(4_000, 1).is_ok());
        assert!(LoudnessMeter::new(768_000, 2).is_ok());

        assert!(LoudnessMeter::new(0, 2).is_err());
        assert!(LoudnessMeter::new(44_100, 0).is_err());
        assert!(LoudnessMeter::new(44_100, 6).is_err());
    }

    #[test]
    fn test_silence_is_negative_infinity() {
        let silence = AudioSignal::mono(vec![0.0; 48_000 * 2], 48_000).unwrap();
        let mut meter = LoudnessMeter::for_signal(&silence).unwrap();
        let lufs = meter.integrated_loudness(&silence).unwrap();
        assert!(lufs.is_infinite() && lufs.is_sign_negative());
    }

    #[test]
    fn test_full_scale_sine_reference() {
        // 997 Hz at 0 dBFS on one channel measures -3.01 LUFS
        let signal = sine(48_000, 1.0, 3.0);
        let mut meter = LoudnessMeter::for_signal(&signal).unwrap();
        let lufs = meter.integrated_loudness(&signal).unwrap();
        assert!((lufs - -3.01).abs() < 0.1, "got {:.2} LUFS", lufs);
    }

    #[test]
    fn test_range_shorter_than_gating_block() {
        let signal = sine(48_000, 0.5, 1.0);
        let mut meter = LoudnessMeter::for_signal(&signal).unwrap();
        assert_eq!(meter.min_frames(), 19_200);

        assert!(matches!(
            meter.integrated_loudness_range(&signal, 0, 19_199),
            Err(LoudnessError::InsufficientSamples {
                required: 19_200,
                actual: 19_199
            })
        ));
        assert!(meter.integrated_loudness_range(&signal, 0, 19_200).is_ok());
    }

    #[test]
    fn test_reuse_is_stateless_between_ranges() {
        let signal = sine(48_000, 0.25, 4.0);
        let mut meter = LoudnessMeter::for_signal(&signal).unwrap();

        let first = meter.integrated_loudness_range(&signal, 0, 96_000).unwrap();
        let _ = meter.integrated_loudness(&signal).unwrap();
        let again = meter.integrated_loudness_range(&signal, 0, 96_000).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn test_format_mismatch() {
        let signal = sine(44_100, 0.5, 1.0);
        let mut meter = LoudnessMeter::new(48_000, 1).unwrap();
        assert!(matches!(
            meter.integrated_loudness(&signal),
            Err(LoudnessError::Signal(MeterError::SampleRateMismatch { .. }))
        ));
    }
}
