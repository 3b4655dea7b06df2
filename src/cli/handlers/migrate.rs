//! Migrate command handler
//!
//! Handles database migration operations including dry-run and rollback.

use crate::config::settings::{Settings, StorageBackend};
use crate::db::{pending_migrations, revert_migrations, run_pending_migrations};
use crate::error::{AppError, AppResult};

/// Handler for the migrate command
pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Runs, previews (`dry_run`) or reverts (`rollback`) migrations.
    ///
    /// # Errors
    /// - The memory backend is configured, or no database URL is set
    /// - Database connection or migration failures
    pub async fn execute(&self, dry_run: bool, rollback: Option<u32>) -> AppResult<()> {
        let database_url = self.database_url()?;

        if dry_run {
            return self.show_pending_migrations(database_url).await;
        }

        match rollback {
            Some(steps) => self.rollback_migrations(database_url, steps).await,
            None => self.run_migrations(database_url).await,
        }
    }

    fn database_url(&self) -> AppResult<String> {
        let database = &self.config.database;
        if database.backend != StorageBackend::Postgres {
            return Err(AppError::Validation {
                field: "database.backend".to_string(),
                reason: format!(
                    "Migrations need the postgres backend, but '{}' is configured",
                    database.backend
                ),
            });
        }

        database
            .url()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation {
                field: "database.url".to_string(),
                reason: "Database URL is required to run migrations".to_string(),
            })
    }

    async fn show_pending_migrations(&self, database_url: String) -> AppResult<()> {
        println!("Checking for pending migrations...");

        let pending = pending_migrations(database_url).await?;
        if pending.is_empty() {
            println!("✓ No pending migrations found - database is up to date");
        } else {
            println!("Found {} pending migration(s):", pending.len());
            for name in &pending {
                println!("  - {}", name);
            }
            println!("\nRun without --dry-run to apply these migrations");
        }

        Ok(())
    }

    async fn run_migrations(&self, database_url: String) -> AppResult<()> {
        println!("Running database migrations...");

        let applied = run_pending_migrations(database_url).await?;
        if applied.is_empty() {
            println!("✓ No migrations to apply - database is already up to date");
        } else {
            println!("✓ Applied {} migration(s):", applied.len());
            for version in &applied {
                println!("  - {}", version);
            }
        }

        tracing::info!(applied = applied.len(), "Database migrations completed");
        Ok(())
    }

    async fn rollback_migrations(&self, database_url: String, steps: u32) -> AppResult<()> {
        println!("Rolling back {} migration(s)...", steps);

        let reverted = revert_migrations(database_url, steps).await?;
        println!("✓ Rolled back {} migration(s):", reverted.len());
        for version in &reverted {
            println!("  - {}", version);
        }

        tracing::info!(reverted = reverted.len(), "Database rollback completed");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
