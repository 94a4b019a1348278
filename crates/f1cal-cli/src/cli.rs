//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// f1cal - Formula 1 calendar in local track time
#[derive(Debug, Parser)]
#[command(name = "f1cal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "F1CAL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Log JSON records (for scheduled rebuilds)
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rebuild the calendar from a source feed
    Build {
        /// Source ICS feed, or `-` for stdin
        #[arg(long, short)]
        input: PathBuf,

        /// Destination calendar file, or `-` for stdout
        #[arg(long, short)]
        output: PathBuf,

        /// Directory of `<tzid>.ics` files to embed VTIMEZONE blocks from
        #[arg(long, env = "F1CAL_ZONEINFO")]
        zoneinfo: Option<PathBuf>,
    },

    /// List known venues
    Venues {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
