/// Immutable audio signal shared by every measurement stage
use crate::error::{MeterError, Result};
use crate::time::TimeCodec;
use std::time::Duration;

/// Largest channel count a measured take may have
pub const MAX_CHANNELS: usize = 2;

/// Decoded audio of one take
///
/// Samples are stored as f32 in the nominal range [-1.0, 1.0].
/// Interleaved format: [L, R, L, R, ...] for stereo.
///
/// A signal never changes after construction; [`AudioSignal::concat`]
/// produces a new signal and leaves both operands untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSignal {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: usize,
}

impl AudioSignal {
    /// Create a signal from interleaved samples
    ///
    /// # Errors
    /// Fails when the sample rate is zero, the channel count is not 1 or 2,
    /// or the buffer does not hold a whole number of frames.
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: usize) -> Result<Self> {
        if sample_rate == 0 {
            return Err(MeterError::InvalidSampleRate(sample_rate));
        }
        if !(1..=MAX_CHANNELS).contains(&channels) {
            return Err(MeterError::UnsupportedChannelCount(channels));
        }
        if samples.len() % channels != 0 {
            return Err(MeterError::InvalidBuffer(format!(
                "Sample count {} is not divisible by channel count {}",
                samples.len(),
                channels
            )));
        }

        Ok(Self {
            samples,
            sample_rate,
            channels,
        })
    }

    /// Create a mono signal
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        Self::new(samples, sample_rate, 1)
    }

    /// Create a signal from one sample vector per channel
    ///
    /// All channels must have the same length.
    pub fn from_planar(channels: &[Vec<f32>], sample_rate: u32) -> Result<Self> {
        let frames = channels.first().map_or(0, Vec::len);
        if let Some(ragged) = channels.iter().find(|c| c.len() != frames) {
            return Err(MeterError::InvalidBuffer(format!(
                "Channel length {} differs from {}",
                ragged.len(),
                frames
            )));
        }

        let mut samples = Vec::with_capacity(frames * channels.len());
        for i in 0..frames {
            samples.extend(channels.iter().map(|c| c[i]));
        }

        Self::new(samples, sample_rate, channels.len())
    }

    /// The empty signal: identity element of [`AudioSignal::concat`]
    pub fn empty(sample_rate: u32, channels: usize) -> Result<Self> {
        Self::new(Vec::new(), sample_rate, channels)
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels (1 = mono, 2 = stereo)
    pub fn channel_count(&self) -> usize {
        self.channels
    }

    /// Interleaved samples of the whole signal
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Number of frames (samples per channel)
    pub fn len(&self) -> usize {
        self.samples.len() / self.channels
    }

    /// Check if the signal holds no frames
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterate frames, each a slice of `channel_count` samples
    pub fn frames(&self) -> impl Iterator<Item = &[f32]> + '_ {
        self.samples.chunks_exact(self.channels)
    }

    /// Interleaved samples of the half-open frame range `[start, end)`
    ///
    /// The range is clamped to the signal length.
    pub fn frame_range(&self, start: usize, end: usize) -> &[f32] {
        let end = end.min(self.len());
        let start = start.min(end);
        &self.samples[start * self.channels..end * self.channels]
    }

    /// Iterate the samples of one channel
    pub fn channel(&self, channel: usize) -> impl Iterator<Item = f32> + '_ {
        let skip = if channel < self.channels {
            channel
        } else {
            self.samples.len()
        };
        self.samples.iter().skip(skip).step_by(self.channels).copied()
    }

    /// Duration of the signal
    pub fn duration(&self) -> Duration {
        TimeCodec::samples_to_duration(self.len(), self.sample_rate)
    }

    /// Duration formatted as `MM:SS` (or `HH:MM:SS` from one hour)
    pub fn duration_label(&self) -> String {
        TimeCodec::format(self.duration())
    }

    /// Concatenate two signals into a new one
    ///
    /// Frames of `self` come first, followed by the frames of `other`.
    /// Signals are never resampled or remixed.
    ///
    /// # Errors
    /// Returns `SampleRateMismatch` or `ChannelCountMismatch` when the
    /// formats differ.
    pub fn concat(&self, other: &AudioSignal) -> Result<AudioSignal> {
        self.check_compatible(other)?;

        let mut samples = Vec::with_capacity(self.samples.len() + other.samples.len());
        samples.extend_from_slice(&self.samples);
        samples.extend_from_slice(&other.samples);

        Ok(Self {
            samples,
            sample_rate: self.sample_rate,
            channels: self.channels,
        })
    }

    /// Fold signals left to right onto `identity` by concatenation
    ///
    /// Equivalent to repeated [`AudioSignal::concat`], but appends into a
    /// single buffer.
    pub fn concat_all<'a, I>(identity: AudioSignal, signals: I) -> Result<AudioSignal>
    where
        I: IntoIterator<Item = &'a AudioSignal>,
    {
        signals.into_iter().try_fold(identity, |mut acc, next| {
            acc.check_compatible(next)?;
            acc.samples.extend_from_slice(&next.samples);
            Ok(acc)
        })
    }

    fn check_compatible(&self, other: &AudioSignal) -> Result<()> {
        if self.sample_rate != other.sample_rate {
            return Err(MeterError::SampleRateMismatch {
                expected: self.sample_rate,
                found: other.sample_rate,
            });
        }
        if self.channels != other.channels {
            return Err(MeterError::ChannelCountMismatch {
                expected: self.channels,
                found: other.channels,
            });
        }
        Ok(())
    }
}
