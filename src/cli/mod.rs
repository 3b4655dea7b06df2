//! Command-line interface
//!
//! Parsing, configuration merging and command dispatch for `serve`,
//! `migrate` and the `students` client commands.

pub mod config_merger;
pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use config_merger::ConfigurationMerger;
pub use executor::{execute_command, starts_server};
pub use parser::{Cli, Commands, Environment, LogLevel, StudentCommand, StudentFormArgs};

use anyhow::Context;

use crate::config::settings::Settings;
use crate::logger::init_logger;

/// Loads the layered configuration and applies CLI overrides on top.
///
/// # Errors
/// Returns error if configuration loading, merging, or validation fails
pub fn load_and_merge_config(cli: &Cli) -> anyhow::Result<Settings> {
    let merger = ConfigurationMerger::from_cli(cli).context("Configuration error")?;
    merger
        .merge_cli_args(cli)
        .context("Configuration merge error")
}

/// Installs the global tracing subscriber described by `settings.logger`.
///
/// # Errors
/// Returns error if the logger configuration is invalid or a subscriber is
/// already installed
pub fn init_logger_from_settings(settings: &Settings) -> anyhow::Result<()> {
    let logger_config = settings
        .logger
        .clone()
        .into_logger_config()
        .context("Logger configuration error")?;

    init_logger(logger_config).context("Logger initialization error")
}
