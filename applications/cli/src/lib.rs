//! Takemeter command-line application
//!
//! Measures a set of takes (files or folders) and prints a loudness and
//! dynamics report: integrated and short-term loudness, sample peaks,
//! PLR and PSR, one row per take plus a concatenated "Total".
//!
//! This library exposes the run pipeline for the binary and for testing.

pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod render;

pub use cli::Cli;
pub use config::{OutputFormat, Settings};
pub use error::{CliError, Result};

use anyhow::Context;
use std::io::{IsTerminal, Write};
use std::process::ExitCode;
use takemeter_loudness::Report;
use tracing::warn;

/// Outcome of a run, mapped to the process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every take and the Total produced a row
    Complete,
    /// No row was produced
    NoRows,
    /// Some rows failed
    Partial,
}

impl RunStatus {
    pub fn from_report(report: &Report) -> Self {
        if report.measured_count() == 0 {
            Self::NoRows
        } else if report.failed_count() > 0 {
            Self::Partial
        } else {
            Self::Complete
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Complete => 0,
            Self::NoRows => 1,
            Self::Partial => 2,
        }
    }
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Load settings, discover and measure takes, print the report
pub async fn run(cli: Cli) -> anyhow::Result<RunStatus> {
    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    settings.apply_cli(&cli);
    settings.validate()?;

    let takes = settings.scanner().discover(&cli.inputs())?;
    if takes.is_empty() {
        warn!("No takes to measure");
        return Ok(RunStatus::NoRows);
    }

    let builder = settings.report_builder()?.with_series(cli.plot);
    let report = pipeline::measure_takes(takes, builder).await;

    let stdout = std::io::stdout();
    let color = stdout.is_terminal() && std::env::var_os("NO_COLOR").is_none();
    let mut out = stdout.lock();

    match settings.output.format {
        OutputFormat::Table => {
            write!(out, "{}", render::render_table(&report, color))?;
            if cli.plot {
                write!(out, "\n{}", chart::render_charts(&report))?;
            }
        }
        OutputFormat::Json => {
            writeln!(out, "{}", render::render_json(&report)?)?;
        }
    }
    out.flush()?;

    Ok(RunStatus::from_report(&report))
}
