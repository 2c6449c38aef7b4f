/// Take decoder implementation using Symphonia
use crate::error::{AudioError, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use takemeter_core::{AudioDecoder, AudioSignal, MAX_CHANNELS};
use tracing::{debug, warn};

/// File extensions the decoder is built to read
pub const SUPPORTED_EXTENSIONS: &[&str] = &["wav", "flac", "mp3", "ogg", "m4a", "aac"];

/// Whole-file decoder using Symphonia
///
/// Supports: WAV, FLAC, MP3, OGG Vorbis, AAC / M4A
///
/// Unlike a playback decoder the channel layout is preserved: mono takes
/// stay mono, stereo takes stay stereo, and anything wider is rejected.
/// Samples are f32 in the nominal range [-1.0, 1.0].
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self
    }

    /// Decode an entire file into an [`AudioSignal`]
    ///
    /// Corrupt packets are skipped with a warning; any other error aborts
    /// the take.
    pub fn decode_file(&self, path: &Path) -> Result<AudioSignal> {
        if !path.exists() {
            return Err(AudioError::FileNotFound(path.display().to_string()));
        }
        debug!(path = %path.display(), "Decoding take");

        let file = std::fs::File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // Create a hint to help the format registry guess the format
        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| match e {
                SymphoniaError::Unsupported(what) => {
                    AudioError::UnsupportedFormat(format!("{}: {}", path.display(), what))
                }
                e => AudioError::Symphonia(format!("Failed to probe file: {}", e)),
            })?;

        let mut format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| AudioError::DecodeError("No audio tracks found".to_string()))?;

        let track_id = track.id;
        let mut sample_rate = track.codec_params.sample_rate;
        let mut channels = track.codec_params.channels.map(|c| c.count());
        if let Some(count) = channels {
            check_channels(count)?;
        }

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::Symphonia(format!("Failed to create decoder: {}", e)))?;

        let mut samples = Vec::new();
        let mut sample_buf: Option<SampleBuffer<f32>> = None;
        let mut skipped_packets = 0usize;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => {
                    return Err(AudioError::Symphonia(format!(
                        "Error reading packet: {}",
                        e
                    )));
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(msg)) => {
                    skipped_packets += 1;
                    warn!(path = %path.display(), error = msg, "Skipping corrupt packet");
                    continue;
                }
                Err(e) => return Err(AudioError::DecodeError(e.to_string())),
            };

            let spec = *decoded.spec();
            let count = spec.channels.count();
            match channels {
                None => {
                    check_channels(count)?;
                    channels = Some(count);
                }
                Some(expected) if expected != count => {
                    return Err(AudioError::DecodeError(format!(
                        "Channel count changed from {} to {} mid-stream",
                        expected, count
                    )));
                }
                Some(_) => {}
            }
            sample_rate.get_or_insert(spec.rate);

            // Packets may grow past the first buffer's capacity
            let required = decoded.capacity() * count;
            if sample_buf.as_ref().map_or(true, |buf| buf.capacity() < required) {
                sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
            }
            if let Some(buf) = sample_buf.as_mut() {
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
        }

        let sample_rate = sample_rate
            .ok_or_else(|| AudioError::DecodeError("Unknown sample rate".to_string()))?;
        let channels =
            channels.ok_or_else(|| AudioError::DecodeError("Unknown channel layout".to_string()))?;

        let signal = AudioSignal::new(samples, sample_rate, channels)
            .map_err(|e| AudioError::DecodeError(e.to_string()))?;

        debug!(
            path = %path.display(),
            frames = signal.len(),
            sample_rate,
            channels,
            skipped_packets,
            "Decoded take"
        );

        Ok(signal)
    }
}

fn check_channels(count: usize) -> Result<()> {
    if count == 0 || count > MAX_CHANNELS {
        return Err(AudioError::UnsupportedChannelCount(count));
    }
    Ok(())
}

impl AudioDecoder for SymphoniaDecoder {
    fn decode(&mut self, path: &Path) -> takemeter_core::Result<AudioSignal> {
        Ok(self.decode_file(path)?)
    }

    fn supports_format(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_lowercase();
                SUPPORTED_EXTENSIONS.contains(&ext.as_str())
            })
    }
}
