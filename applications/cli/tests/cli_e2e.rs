/// End-to-end tests: WAV fixtures through the pipeline and the binary
use std::path::{Path, PathBuf};
use std::process::Command;
use takemeter_cli::{pipeline, RunStatus};
use takemeter_loudness::{FailureKind, ReportBuilder, TOTAL_NAME};

/// Write a 16-bit mono WAV holding a 440 Hz sine
fn create_test_wav(path: &Path, sample_rate: u32, duration_secs: f32, amplitude: f32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    let num_frames = (sample_rate as f32 * duration_secs) as usize;
    for i in 0..num_frames {
        let t = i as f32 / sample_rate as f32;
        let sample = amplitude * (2.0 * std::f32::consts::PI * 440.0 * t).sin();
        writer.write_sample((sample * i16::MAX as f32) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

fn session(takes: &[(&str, u32, f32)]) -> (tempfile::TempDir, Vec<PathBuf>) {
    let dir = tempfile::tempdir().unwrap();
    let paths = takes
        .iter()
        .map(|(name, rate, seconds)| {
            let path = dir.path().join(name);
            create_test_wav(&path, *rate, *seconds, 0.5);
            path
        })
        .collect();
    (dir, paths)
}

fn takemeter(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_takemeter"));
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

// ========== Pipeline ==========

#[tokio::test]
async fn test_pipeline_two_takes_and_total() {
    let (_dir, paths) = session(&[("take1.wav", 48_000, 2.0), ("take2.wav", 48_000, 3.0)]);

    let report = pipeline::measure_takes(paths.clone(), ReportBuilder::default()).await;

    let names: Vec<_> = report.entries().iter().map(|e| e.name.clone()).collect();
    assert_eq!(
        names,
        vec![
            paths[0].display().to_string(),
            paths[1].display().to_string(),
            TOTAL_NAME.to_string()
        ]
    );

    let total = report.total().unwrap().outcome.row().unwrap();
    assert_eq!(total.sample_rate, 48_000);
    assert_eq!(total.duration_label, "00:05");
    assert_eq!(RunStatus::from_report(&report), RunStatus::Complete);
}

#[tokio::test]
async fn test_pipeline_corrupt_take_aborts_total() {
    let (dir, mut paths) = session(&[("take1.wav", 48_000, 2.0)]);
    let corrupt = dir.path().join("take2.wav");
    std::fs::write(&corrupt, b"RIFF....not really").unwrap();
    paths.push(corrupt);

    let report = pipeline::measure_takes(paths, ReportBuilder::default()).await;

    assert_eq!(report.measured_count(), 1);
    let failure = report.entries()[1].outcome.failure().unwrap();
    assert_eq!(failure.kind, FailureKind::Decode);
    assert_eq!(
        report.total().unwrap().outcome.failure().unwrap().kind,
        FailureKind::TotalAborted
    );
    assert_eq!(RunStatus::from_report(&report), RunStatus::Partial);
}

#[tokio::test]
async fn test_pipeline_rate_mismatch_keeps_take_rows() {
    let (_dir, paths) = session(&[("a.wav", 44_100, 2.0), ("b.wav", 48_000, 2.0)]);

    let report = pipeline::measure_takes(paths, ReportBuilder::default()).await;

    assert_eq!(report.measured_count(), 2);
    assert_eq!(
        report.total().unwrap().outcome.failure().unwrap().kind,
        FailureKind::Concatenation
    );
}

// ========== Binary ==========

#[test]
fn test_binary_json_report() {
    let (dir, _paths) = session(&[("take2.wav", 8_000, 2.0), ("take1.wav", 8_000, 2.0)]);

    let output = takemeter(dir.path())
        .args(["--format", "json", "-f", "."])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = report["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 3);
    // Folder contents are sorted
    assert!(entries[0]["name"].as_str().unwrap().ends_with("take1.wav"));
    assert!(entries[1]["name"].as_str().unwrap().ends_with("take2.wav"));
    assert_eq!(entries[2]["name"], TOTAL_NAME);
    assert_eq!(entries[2]["status"], "measured");
    assert_eq!(report["targets"]["short_term"], -9.0);
}

#[test]
fn test_binary_table_with_plot() {
    let (dir, _paths) = session(&[("take1.wav", 8_000, 4.0)]);

    let output = takemeter(dir.path())
        .args(["-p", "-s", "-12", "take1.wav"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Max LU-S Time"));
    assert!(stdout.contains("target -12.0"));
    // Not a terminal, so no color
    assert!(!stdout.contains('\x1b'));
}

#[test]
fn test_binary_partial_output() {
    let (dir, _paths) = session(&[("good.wav", 8_000, 2.0)]);
    std::fs::write(dir.path().join("bad.wav"), b"garbage").unwrap();

    let output = takemeter(dir.path()).args(["."]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("decode failed"));
}

#[test]
fn test_binary_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let output = takemeter(dir.path())
        .args(["-f", "missing.wav"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("File not found"));
}

#[test]
fn test_binary_no_takes() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"not audio").unwrap();

    let output = takemeter(dir.path()).args(["."]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_binary_rejects_short_window() {
    let (dir, _paths) = session(&[("take1.wav", 8_000, 2.0)]);
    let output = takemeter(dir.path())
        .args(["--window", "0.5", "take1.wav"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("window_seconds"));
}

#[test]
fn test_binary_reads_config_file() {
    let (dir, _paths) = session(&[("take1.wav", 8_000, 2.0)]);
    std::fs::write(
        dir.path().join("takemeter.toml"),
        "[output]\nformat = \"json\"\n",
    )
    .unwrap();

    let output = takemeter(dir.path()).args(["take1.wav"]).output().unwrap();
    assert_eq!(output.status.code(), Some(0));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["entries"].as_array().unwrap().len(), 1);
}
