/// Run settings
use crate::cli::Cli;
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use takemeter_discovery::{TakeScanner, DEFAULT_EXTENSIONS};
use takemeter_loudness::{
    ReportBuilder, Targets, WindowConfig, DEFAULT_SHORT_TERM_TARGET,
    DEFAULT_SMOOTHED_PEAK_SECONDS, DEFAULT_WINDOW_SECONDS, MIN_WINDOW_SECONDS,
};

/// Settings file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "takemeter.toml";

/// Prefix of environment overrides, e.g. `TAKEMETER_ANALYSIS__STEP_SECONDS`
pub const ENV_PREFIX: &str = "TAKEMETER";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default = "default_analysis")]
    pub analysis: AnalysisSettings,

    #[serde(default = "default_targets")]
    pub targets: TargetSettings,

    #[serde(default = "default_discovery")]
    pub discovery: DiscoverySettings,

    #[serde(default = "default_output")]
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalysisSettings {
    #[serde(default = "default_window_seconds")]
    pub window_seconds: f64,

    #[serde(default = "default_step_seconds")]
    pub step_seconds: f64,

    #[serde(default = "default_smoothed_peak_seconds")]
    pub smoothed_peak_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TargetSettings {
    #[serde(default = "default_short_term_target")]
    pub short_term: Option<f64>,

    #[serde(default)]
    pub integrated: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DiscoverySettings {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    #[serde(default)]
    pub recursive: bool,

    #[serde(default)]
    pub follow_links: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned text table
    #[default]
    Table,
    /// Machine-readable report
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            analysis: default_analysis(),
            targets: default_targets(),
            discovery: default_discovery(),
            output: default_output(),
        }
    }
}

impl Settings {
    /// Load settings from the config file and environment
    ///
    /// An explicit `config_path` must exist; otherwise `takemeter.toml` in
    /// the working directory is read when present.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(config_path, Self::environment())
    }

    /// Environment source for `TAKEMETER_SECTION__KEY` variables
    pub fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("discovery.extensions")
    }

    pub(crate) fn load_with_env(
        config_path: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self> {
        let mut settings = config::Config::builder();

        match config_path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(environment);

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Command-line values take precedence over file and environment
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(window) = cli.window {
            self.analysis.window_seconds = window;
        }
        if let Some(step) = cli.step {
            self.analysis.step_seconds = step;
        }
        if let Some(target) = cli.short_target {
            self.targets.short_term = Some(target);
        }
        if let Some(target) = cli.integrated_target {
            self.targets.integrated = Some(target);
        }
        if let Some(format) = cli.format {
            self.output.format = format;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let analysis = &self.analysis;
        for (key, value) in [
            ("analysis.window_seconds", analysis.window_seconds),
            ("analysis.step_seconds", analysis.step_seconds),
            ("analysis.smoothed_peak_seconds", analysis.smoothed_peak_seconds),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CliError::Validation(format!(
                    "{} must be positive, got {}",
                    key, value
                )));
            }
        }

        if analysis.window_seconds < MIN_WINDOW_SECONDS {
            return Err(CliError::Validation(format!(
                "analysis.window_seconds must be at least {} s, got {}",
                MIN_WINDOW_SECONDS, analysis.window_seconds
            )));
        }

        if self.discovery.extensions.is_empty() {
            return Err(CliError::Validation(
                "discovery.extensions must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn targets(&self) -> Targets {
        Targets::new(self.targets.short_term, self.targets.integrated)
    }

    /// Report builder for the analysis settings
    pub fn report_builder(&self) -> Result<ReportBuilder> {
        let window = WindowConfig::new(
            self.analysis.window_seconds,
            Some(self.analysis.step_seconds),
        )
        .map_err(|e| CliError::Validation(e.to_string()))?;

        Ok(ReportBuilder::new(window, self.targets())
            .with_smoothed_peak(self.analysis.smoothed_peak_seconds))
    }

    pub fn scanner(&self) -> TakeScanner {
        TakeScanner::new()
            .extensions(&self.discovery.extensions)
            .recursive(self.discovery.recursive)
            .follow_links(self.discovery.follow_links)
    }
}

// Default values
fn default_analysis() -> AnalysisSettings {
    AnalysisSettings {
        window_seconds: default_window_seconds(),
        step_seconds: default_step_seconds(),
        smoothed_peak_seconds: default_smoothed_peak_seconds(),
    }
}

fn default_window_seconds() -> f64 {
    DEFAULT_WINDOW_SECONDS
}

fn default_step_seconds() -> f64 {
    0.5
}

fn default_smoothed_peak_seconds() -> f64 {
    DEFAULT_SMOOTHED_PEAK_SECONDS
}

fn default_targets() -> TargetSettings {
    TargetSettings {
        short_term: default_short_term_target(),
        integrated: None,
    }
}

#[allow(clippy::unnecessary_wraps)]
fn default_short_term_target() -> Option<f64> {
    Some(DEFAULT_SHORT_TERM_TARGET)
}

fn default_discovery() -> DiscoverySettings {
    DiscoverySettings {
        extensions: default_extensions(),
        recursive: false,
        follow_links: false,
    }
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect()
}

fn default_output() -> OutputSettings {
    OutputSettings {
        format: OutputFormat::default(),
    }
}
