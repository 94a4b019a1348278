//! f1cal command-line interface
//!
//! Rebuilds the Formula 1 calendar feed with sessions in local track time.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::Cli;
pub use error::{CliError, CliResult};
