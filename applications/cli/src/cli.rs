/// Command-line arguments
use crate::config::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "takemeter")]
#[command(version, about = "Loudness and dynamics report for recorded takes", long_about = None)]
pub struct Cli {
    /// File or folder to measure (repeatable)
    #[arg(short = 'f', long = "files", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Files or folders given without -f
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Ceiling for the maximum short-term loudness [settings default: -9]
    #[arg(
        short = 's',
        long = "short-target",
        value_name = "LUFS",
        allow_negative_numbers = true
    )]
    pub short_target: Option<f64>,

    /// Ceiling for the integrated loudness
    #[arg(
        short = 'i',
        long = "integrated-target",
        value_name = "LUFS",
        allow_negative_numbers = true
    )]
    pub integrated_target: Option<f64>,

    /// Draw a short-term loudness chart per take
    #[arg(short = 'p', long = "plot")]
    pub plot: bool,

    /// Short-term window length
    #[arg(long, value_name = "SECONDS")]
    pub window: Option<f64>,

    /// Hop between short-term windows
    #[arg(long, value_name = "SECONDS")]
    pub step: Option<f64>,

    /// Report format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Configuration file path (defaults to ./takemeter.toml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// All requested paths, `-f` paths first
    pub fn inputs(&self) -> Vec<PathBuf> {
        self.files.iter().chain(&self.paths).cloned().collect()
    }
}
