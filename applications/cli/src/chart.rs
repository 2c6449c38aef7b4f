//! Text chart of short-term loudness over time
//!
//! One column per window (or per bucket of windows, keeping the loudest,
//! when a take has more windows than the chart is wide). Values outside
//! the -30..-5 LUFS range are drawn on the edge rows as `^` or `v`.

use takemeter_loudness::{LoudnessWindow, Report};

/// Loudness at the top row
pub const CHART_TOP_LUFS: f64 = -5.0;
/// Loudness at the bottom row
pub const CHART_BOTTOM_LUFS: f64 = -30.0;

const CHART_HEIGHT: usize = 11;
const CHART_WIDTH: usize = 60;
const AXIS_WIDTH: usize = 8;

fn row_for(lufs: f64) -> usize {
    let fraction = (CHART_TOP_LUFS - lufs) / (CHART_TOP_LUFS - CHART_BOTTOM_LUFS);
    (fraction * (CHART_HEIGHT - 1) as f64).round() as usize
}

fn in_range(lufs: f64) -> bool {
    (CHART_BOTTOM_LUFS..=CHART_TOP_LUFS).contains(&lufs)
}

/// Loudest value of each column's windows
fn columns(windows: &[LoudnessWindow]) -> Vec<f64> {
    let n = windows.len();
    if n <= CHART_WIDTH {
        return windows.iter().map(|w| w.loudness_lufs).collect();
    }

    (0..CHART_WIDTH)
        .map(|col| {
            let lo = col * n / CHART_WIDTH;
            let hi = ((col + 1) * n / CHART_WIDTH).max(lo + 1);
            windows[lo..hi]
                .iter()
                .map(|w| w.loudness_lufs)
                .fold(f64::NEG_INFINITY, f64::max)
        })
        .collect()
}

/// Chart of one take's windows, with an optional target line
pub fn render_chart(name: &str, windows: &[LoudnessWindow], target: Option<f64>) -> String {
    let mut out = format!("{}\n", name);
    if windows.is_empty() {
        out.push_str("  (no short-term windows)\n");
        return out;
    }

    let values = columns(windows);
    let mut grid = vec![vec![' '; values.len()]; CHART_HEIGHT];

    let target_row = target.filter(|t| in_range(*t)).map(row_for);
    if let Some(row) = target_row {
        grid[row].fill('-');
    }

    for (col, &lufs) in values.iter().enumerate() {
        if lufs.is_nan() {
            continue;
        }
        let (row, mark) = if lufs > CHART_TOP_LUFS {
            (0, '^')
        } else if lufs < CHART_BOTTOM_LUFS {
            (CHART_HEIGHT - 1, 'v')
        } else {
            (row_for(lufs), '*')
        };
        grid[row][col] = mark;
    }

    let step = (CHART_TOP_LUFS - CHART_BOTTOM_LUFS) / (CHART_HEIGHT - 1) as f64;
    for (row, cells) in grid.iter().enumerate() {
        let level = CHART_TOP_LUFS - row as f64 * step;
        let line: String = cells.iter().collect();
        let mut text = format!("{:>6.1} |{}", level, line);
        if target_row == Some(row) {
            if let Some(t) = target {
                text.push_str(&format!(" target {:.1}", t));
            }
        }
        out.push_str(text.trim_end());
        out.push('\n');
    }

    out.push_str(&format!("{:>w$}{}\n", "+", "-".repeat(values.len()), w = AXIS_WIDTH));

    let start = windows[0].label.split(" - ").next().unwrap_or_default();
    let end = windows
        .last()
        .and_then(|w| w.label.split(" - ").nth(1))
        .unwrap_or_default();
    let span = values.len().max(start.len() + end.len() + 1);
    out.push_str(&format!(
        "{:w$}{}{:>r$}\n",
        "",
        start,
        end,
        w = AXIS_WIDTH,
        r = span - start.len()
    ));

    out
}

/// Charts of every entry that carries a short-term series
pub fn render_charts(report: &Report) -> String {
    report
        .entries()
        .iter()
        .filter_map(|entry| {
            entry
                .series
                .as_deref()
                .map(|series| render_chart(&entry.name, series, report.targets.short_term))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
