//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use super::handlers::{MigrateCommandHandler, ServeCommandHandler, StudentsCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::settings::{Settings, StorageBackend};
use crate::error::{AppError, AppResult};

/// Execute a CLI command with the given settings
///
/// A plain `serve` (or no command at all) returns `Ok(())` without doing
/// anything; starting the server is left to the caller.
///
/// # Errors
/// Returns errors from command handlers or validation failures
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    validate_command_args(cli, &settings)?;

    match &cli.command {
        Some(Commands::Serve { dry_run: true, .. }) => {
            ServeCommandHandler::new(settings).execute(true).await
        }
        Some(Commands::Serve { .. }) | None => Ok(()),
        Some(Commands::Migrate { dry_run, rollback }) => {
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await
        }
        Some(Commands::Students { command, .. }) => {
            let handler = StudentsCommandHandler::from_config(&settings.client)?;
            handler.execute(command).await.map_err(AppError::from)
        }
    }
}

/// Whether `cli` asks for the HTTP server to be started.
pub fn starts_server(cli: &Cli) -> bool {
    matches!(
        cli.command,
        None | Some(Commands::Serve { dry_run: false, .. })
    )
}

fn validate_command_args(cli: &Cli, settings: &Settings) -> AppResult<()> {
    cli.validate().map_err(|reason| AppError::Validation {
        field: "cli_arguments".to_string(),
        reason,
    })?;

    match &cli.command {
        Some(Commands::Serve { host, port, .. }) => {
            warn_on_serve_args(host.as_deref(), *port);
        }
        Some(Commands::Migrate { rollback, .. }) => {
            if settings.database.backend == StorageBackend::Memory {
                return Err(AppError::Validation {
                    field: "database.backend".to_string(),
                    reason: "The memory backend has no migrations to run".to_string(),
                });
            }
            warn_on_rollback(*rollback);
        }
        Some(Commands::Students { .. }) | None => {}
    }

    Ok(())
}

fn warn_on_serve_args(host: Option<&str>, port: Option<u16>) {
    if let (Some(host), Some(port)) = (host, port) {
        if port < 1024 && host == "0.0.0.0" {
            eprintln!(
                "Warning: Binding to 0.0.0.0 on port {} requires root privileges",
                port
            );
        }
    }
}

fn warn_on_rollback(rollback: Option<u32>) {
    if let Some(steps) = rollback {
        if steps > 50 {
            eprintln!(
                "Warning: Rolling back {} migrations is a large operation. Consider using smaller steps.",
                steps
            );
        }
    }
}
