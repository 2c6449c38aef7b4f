/// Integration tests for the take decoder
///
/// WAV fixtures are written with hound and read back through Symphonia.
use std::path::Path;
use takemeter_audio::{AudioError, SymphoniaDecoder};
use takemeter_core::{AudioDecoder, MeterError};

/// Write a 16-bit PCM WAV with one sine per channel
///
/// Channel `n` uses amplitude `amplitudes[n]` of a 440 Hz sine.
fn create_test_wav(path: &Path, sample_rate: u32, duration_secs: f32, amplitudes: &[f32]) {
    let spec = hound::WavSpec {
        channels: amplitudes.len() as u16,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();

    let num_frames = (sample_rate as f32 * duration_secs) as usize;
    for i in 0..num_frames {
        let t = i as f32 / sample_rate as f32;
        let sine = (2.0 * std::f32::consts::PI * 440.0 * t).sin();
        for amplitude in amplitudes {
            writer
                .write_sample((sine * amplitude * i16::MAX as f32) as i16)
                .unwrap();
        }
    }
    writer.finalize().unwrap();
}

fn max_abs(samples: impl Iterator<Item = f32>) -> f32 {
    samples.map(f32::abs).fold(0.0, f32::max)
}

#[test]
fn test_decode_mono_wav() {
    let temp_dir = tempfile::tempdir().unwrap();
    let wav_path = temp_dir.path().join("mono.wav");
    create_test_wav(&wav_path, 48_000, 1.0, &[0.5]);

    let mut decoder = SymphoniaDecoder::new();
    let signal = decoder.decode(&wav_path).expect("Failed to decode mono WAV");

    // Mono stays mono
    assert_eq!(signal.channel_count(), 1);
    assert_eq!(signal.sample_rate(), 48_000);
    assert_eq!(signal.len(), 48_000);
    assert_eq!(signal.duration_label(), "00:01");

    let peak = max_abs(signal.channel(0));
    assert!((peak - 0.5).abs() < 0.01, "peak {}", peak);
}

#[test]
fn test_decode_stereo_keeps_channels_apart() {
    let temp_dir = tempfile::tempdir().unwrap();
    let wav_path = temp_dir.path().join("stereo.wav");
    create_test_wav(&wav_path, 44_100, 2.0, &[0.8, 0.2]);

    let signal = SymphoniaDecoder::new().decode_file(&wav_path).unwrap();

    assert_eq!(signal.channel_count(), 2);
    assert_eq!(signal.sample_rate(), 44_100);
    assert_eq!(signal.len(), 88_200);

    let left = max_abs(signal.channel(0));
    let right = max_abs(signal.channel(1));
    assert!((left - 0.8).abs() < 0.01, "left peak {}", left);
    assert!((right - 0.2).abs() < 0.01, "right peak {}", right);
}

#[test]
fn test_decode_float_wav() {
    let temp_dir = tempfile::tempdir().unwrap();
    let wav_path = temp_dir.path().join("float.wav");

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 96_000,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(&wav_path, spec).unwrap();
    let written = [0.0f32, 0.25, -0.5, 0.75, -1.0];
    for _ in 0..1000 {
        for &s in &written {
            writer.write_sample(s).unwrap();
        }
    }
    writer.finalize().unwrap();

    let signal = SymphoniaDecoder::new().decode_file(&wav_path).unwrap();
    assert_eq!(signal.sample_rate(), 96_000);
    assert_eq!(signal.len(), 5000);
    assert_eq!(&signal.samples()[..5], &written);
}

#[test]
fn test_missing_file_is_decode_error() {
    let mut decoder = SymphoniaDecoder::new();
    let result = decoder.decode(Path::new("/nonexistent/take.flac"));

    match result {
        Err(MeterError::Decode(msg)) => assert!(msg.contains("File not found")),
        other => panic!("expected decode error, got {:?}", other),
    }
}

#[test]
fn test_garbage_file_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("corrupt.wav");
    std::fs::write(&path, b"this is not a riff file at all").unwrap();

    let result = SymphoniaDecoder::new().decode_file(&path);
    assert!(matches!(
        result,
        Err(AudioError::UnsupportedFormat(_) | AudioError::Symphonia(_))
    ));
}

#[test]
fn test_surround_take_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    let wav_path = temp_dir.path().join("surround.wav");
    create_test_wav(&wav_path, 48_000, 0.5, &[0.5; 6]);

    let mut decoder = SymphoniaDecoder::new();
    assert!(decoder.decode(&wav_path).is_err());
}

#[test]
fn test_decoder_is_reusable() {
    let temp_dir = tempfile::tempdir().unwrap();
    let first = temp_dir.path().join("first.wav");
    let second = temp_dir.path().join("second.wav");
    create_test_wav(&first, 48_000, 0.5, &[0.5]);
    create_test_wav(&second, 48_000, 0.25, &[0.5, 0.5]);

    let mut decoder = SymphoniaDecoder::new();
    let a = decoder.decode(&first).unwrap();
    let b = decoder.decode(&second).unwrap();

    assert_eq!(a.len(), 24_000);
    assert_eq!(b.len(), 12_000);
    assert_eq!(b.channel_count(), 2);
}
