/// Takemeter - loudness and dynamics report for recorded takes
use clap::Parser;
use std::process::ExitCode;
use takemeter_cli::Cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_DIRECTIVES: &str =
    "takemeter_cli=info,takemeter_loudness=info,takemeter_audio=info,takemeter_discovery=info";
const VERBOSE_DIRECTIVES: &str =
    "takemeter_cli=debug,takemeter_loudness=debug,takemeter_audio=debug,takemeter_discovery=debug";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing; the report owns stdout
    let default = if cli.verbose {
        VERBOSE_DIRECTIVES
    } else {
        DEFAULT_DIRECTIVES
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match takemeter_cli::run(cli).await {
        Ok(status) => status.into(),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
