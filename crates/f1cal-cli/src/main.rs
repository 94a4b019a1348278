//! f1cal CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use f1cal_cli::cli::{Cli, Command, ConfigAction};
use f1cal_cli::commands;
use f1cal_cli::config::Config;
use f1cal_cli::error::{CliError, CliResult};
use f1cal_core::{TracingConfig, init_tracing};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing = if cli.debug {
        TracingConfig::cli_debug()
    } else if cli.json_logs {
        TracingConfig::scheduled()
    } else {
        TracingConfig::cli()
    };
    if let Err(e) = init_tracing(tracing) {
        eprintln!("warning: {}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = match cli.config {
        Some(ref path) => Config::load_from(path),
        None => Config::load(),
    }
    .map_err(CliError::Config)?;

    match cli.command {
        Command::Build {
            input,
            output,
            zoneinfo,
        } => commands::build::run(&config, &input, &output, zoneinfo),
        Command::Venues { json } => commands::venues::list(&config, json),
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(&config_path),
        },
    }
}
