/// Table and JSON presentation of a report
use crate::error::Result;
use serde::Serialize;
use takemeter_loudness::{FailureKind, Flag, MetricsRow, Report, RowFlags};

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const WHITE: &str = "\x1b[37m";
const RESET: &str = "\x1b[0m";

/// Placeholder shown in every value cell of a failed row
pub const FAILED_CELL: &str = "ERR";

/// Format a measurement rounded to 3 decimals
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    // Adding 0.0 turns a negative zero into a positive one
    let rounded = (value * 1000.0).round() / 1000.0 + 0.0;
    format!("{:.3}", rounded)
}

fn peak_headers(channels: usize) -> Vec<String> {
    match channels {
        0 | 1 => vec!["Peak".to_string()],
        2 => vec!["Peak L".to_string(), "Peak R".to_string()],
        n => (1..=n).map(|ch| format!("Peak {}", ch)).collect(),
    }
}

struct Cell {
    text: String,
    flag: Flag,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            flag: Flag::Unchecked,
        }
    }

    fn flagged(text: String, flag: Flag) -> Self {
        Self { text, flag }
    }
}

fn measured_cells(row: &MetricsRow, flags: RowFlags, channels: usize) -> Vec<Cell> {
    let mut cells = vec![
        Cell::plain(row.sample_rate.to_string()),
        Cell::plain(row.duration_label.clone()),
        Cell::flagged(format_value(row.integrated_loudness), flags.integrated),
        Cell::flagged(format_value(row.max_short_term.lufs), flags.max_short_term),
        Cell::plain(row.max_short_term.label.clone()),
        Cell::plain(format_value(row.min_short_term.lufs)),
        Cell::plain(row.min_short_term.label.clone()),
    ];
    cells.extend((0..channels.max(1)).map(|ch| {
        Cell::plain(
            row.peak_per_channel
                .get(ch)
                .map(|peak| format_value(*peak))
                .unwrap_or_default(),
        )
    }));
    cells.push(Cell::plain(format_value(row.plr)));
    cells.push(Cell::plain(format_value(row.psr)));
    cells
}

fn failure_label(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::Decode => "decode failed",
        FailureKind::Measurement => "measurement failed",
        FailureKind::Concatenation => "concatenation failed",
        FailureKind::TotalAborted => "skipped",
    }
}

/// Render the report as an aligned text table
///
/// With `color`, the integrated and maximum short-term cells are yellow
/// above their target and white otherwise, and targeted headers are green.
/// Failed rows show [`FAILED_CELL`] and are explained below the table.
pub fn render_table(report: &Report, color: bool) -> String {
    let channels = report
        .rows()
        .map(|(_, row)| row.peak_per_channel.len())
        .max()
        .unwrap_or(1);

    let mut headers: Vec<String> = [
        "",
        "Sample Rate",
        "Length",
        "LU-I",
        "Max LU-S",
        "Max LU-S Time",
        "Min LU-S",
        "Min LU-S Time",
    ]
    .iter()
    .map(|h| (*h).to_string())
    .collect();
    headers.extend(peak_headers(channels));
    headers.push("PLR".to_string());
    headers.push("PSR".to_string());

    let targeted = |index: usize| match index {
        3 => report.targets.integrated.is_some(),
        4 => report.targets.short_term.is_some(),
        _ => false,
    };

    let flags = report.flags();
    let rows: Vec<Vec<Cell>> = report
        .entries()
        .iter()
        .zip(&flags)
        .map(|(entry, flags)| {
            let mut cells = vec![Cell::plain(entry.name.clone())];
            match (entry.outcome.row(), flags) {
                (Some(row), Some(flags)) => cells.extend(measured_cells(row, *flags, channels)),
                _ => cells.extend((1..headers.len()).map(|_| Cell::plain(FAILED_CELL))),
            }
            cells
        })
        .collect();

    let widths: Vec<usize> = (0..headers.len())
        .map(|col| {
            rows.iter()
                .filter_map(|cells| cells.get(col))
                .map(|cell| cell.text.chars().count())
                .chain(std::iter::once(headers[col].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();

    let header_line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            let padded = pad(header, widths[col], col == 0);
            if color && targeted(col) {
                format!("{}{}{}", GREEN, padded, RESET)
            } else {
                padded
            }
        })
        .collect();
    push_line(&mut out, &header_line);

    for cells in &rows {
        let line: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(col, cell)| {
                let padded = pad(&cell.text, widths[col], col == 0);
                match (color, cell.flag) {
                    (true, Flag::Over) => format!("{}{}{}", YELLOW, padded, RESET),
                    (true, Flag::Within) => format!("{}{}{}", WHITE, padded, RESET),
                    _ => padded,
                }
            })
            .collect();
        push_line(&mut out, &line);
    }

    let failures: Vec<_> = report
        .entries()
        .iter()
        .filter_map(|e| e.outcome.failure().map(|f| (e.name.as_str(), f)))
        .collect();
    if !failures.is_empty() {
        out.push('\n');
        for (name, failure) in failures {
            out.push_str(&format!(
                "{}: {}: {}\n",
                name,
                failure_label(failure.kind),
                failure.message
            ));
        }
    }

    out
}

fn pad(text: &str, width: usize, left: bool) -> String {
    if left {
        format!("{:<width$}", text, width = width)
    } else {
        format!("{:>width$}", text, width = width)
    }
}

fn push_line(out: &mut String, cells: &[String]) {
    out.push_str(cells.join("  ").trim_end());
    out.push('\n');
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a Report,
    flags: Vec<Option<RowFlags>>,
}

/// Render the report as pretty-printed JSON
///
/// Non-finite values (silence) serialize as `null`.
pub fn render_json(report: &Report) -> Result<String> {
    let json = JsonReport {
        report,
        flags: report.flags(),
    };
    Ok(serde_json::to_string_pretty(&json)?)
}
