//! Hookline CLI -- emit lifecycle commands and verify captured container timelines.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;

use hookline_core::config::{GeneralConfig, HooklineConfig};

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(err.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let source = commands::resolve_source(cli.config.as_deref());
    let writer = OutputWriter::new(cli.output);

    match cli.command {
        // `config validate` reports load failures itself instead of bailing out.
        Commands::Config(args) => {
            init_default_tracing(cli.log_level.as_deref());
            commands::config::execute(args, &source, &writer).await
        }
        Commands::Command(args) => {
            let config = load_and_init(&source, cli.log_level).await?;
            commands::command::execute(args, &config, &writer)
        }
        Commands::Verify(args) => {
            let config = load_and_init(&source, cli.log_level).await?;
            commands::verify::execute(args, &config, &writer).await
        }
    }
}

async fn load_and_init(
    source: &commands::ConfigSource,
    log_level: Option<String>,
) -> Result<HooklineConfig, CliError> {
    let mut config = commands::load_config(source).await?;
    if let Some(level) = log_level {
        config.general.log_level = level;
    }
    logging::init_tracing(&config.general)?;
    tracing::debug!(source = %source, "configuration loaded");
    Ok(config)
}

/// Tracing for commands that run before a configuration is known.
fn init_default_tracing(log_level: Option<&str>) {
    let mut general = GeneralConfig::default();
    if let Some(level) = log_level {
        general.log_level = level.to_owned();
    }
    if let Err(e) = logging::init_tracing(&general) {
        eprintln!("warning: {e}");
    }
}
