//! Parallel decode and measurement of takes
//!
//! Every take is decoded and measured on the blocking pool. Results are
//! collected in input order, then the Total is measured from the decoded
//! signals once all of them are available.

use std::path::{Path, PathBuf};
use takemeter_audio::SymphoniaDecoder;
use takemeter_core::AudioSignal;
use takemeter_loudness::{FailureKind, Report, ReportBuilder, ReportEntry, RowFailure, TOTAL_NAME};
use tracing::{debug, info, warn};

/// Decoded signal (if any) and report entry of one take
struct TakeResult {
    signal: Option<AudioSignal>,
    entry: ReportEntry,
}

/// Decode and measure one take
fn process_take(path: &Path, builder: &ReportBuilder) -> TakeResult {
    let name = path.display().to_string();

    let decoded = SymphoniaDecoder::new().decode_file(path).map_err(|e| {
        warn!(take = %name, error = %e, "Failed to decode take");
        RowFailure::decode(e.to_string())
    });
    let entry = builder.outcome_entry(name, &decoded);
    TakeResult {
        signal: decoded.ok(),
        entry,
    }
}

/// Measure `takes` concurrently and assemble the report
///
/// With more than one take the Total is appended last.
pub async fn measure_takes(takes: Vec<PathBuf>, builder: ReportBuilder) -> Report {
    info!(count = takes.len(), "Measuring takes");

    let handles: Vec<_> = takes
        .iter()
        .cloned()
        .map(|path| {
            let builder = builder.clone();
            tokio::task::spawn_blocking(move || process_take(&path, &builder))
        })
        .collect();

    let mut report = Report::new(*builder.targets());
    let mut signals = Vec::with_capacity(takes.len());

    for (path, handle) in takes.iter().zip(handles) {
        match handle.await {
            Ok(result) => {
                signals.push(result.signal);
                report.push(result.entry);
            }
            Err(e) => {
                warn!(take = %path.display(), error = %e, "Measurement task failed");
                signals.push(None);
                let failure =
                    RowFailure::new(FailureKind::Measurement, format!("Task failed: {}", e));
                report.push(builder.outcome_entry(path.display().to_string(), &Err(failure)));
            }
        }
    }

    if signals.len() > 1 {
        debug!("Measuring Total");
        let total_builder = builder.clone();
        let total = tokio::task::spawn_blocking(move || {
            let refs: Vec<Option<&AudioSignal>> = signals.iter().map(Option::as_ref).collect();
            total_builder.total_entry(&refs)
        })
        .await;

        match total {
            Ok(Some(entry)) => report.push(entry),
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "Total task failed");
                let failure =
                    RowFailure::new(FailureKind::Measurement, format!("Task failed: {}", e));
                report.push(builder.outcome_entry(TOTAL_NAME, &Err(failure)));
            }
        }
    }

    info!(
        measured = report.measured_count(),
        failed = report.failed_count(),
        "Report complete"
    );
    report
}
