//! Server module for managing HTTP server lifecycle
//!
//! This module handles server initialization, startup, and graceful shutdown.

use tokio::net::TcpListener;
use tokio::signal;

use crate::api::routes::create_router;
use crate::config::settings::{Settings, StorageBackend};
use crate::config::Environment;
use crate::db::run_pending_migrations;
use crate::repositories::Repositories;
use crate::state::AppState;

/// HTTP server manager
pub struct Server {
    settings: Settings,
}

impl Server {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Start the server and run until shutdown signal
    ///
    /// This method:
    /// 1. Logs startup information
    /// 2. Opens the configured student store, migrating it when asked to
    /// 3. Binds to the configured address
    /// 4. Serves requests until Ctrl+C or SIGTERM
    ///
    /// # Errors
    /// - Database connection pool or migration errors
    /// - Address binding errors
    /// - Server runtime errors
    pub async fn run(self) -> anyhow::Result<()> {
        let settings = &self.settings;

        tracing::info!(
            app_name = %settings.application.name,
            app_version = %settings.application.version,
            environment = %Environment::from_env().as_str(),
            "Application starting"
        );

        tracing::info!(
            host = %settings.server.host,
            port = %settings.server.port,
            max_body_size = %settings.server.max_body_size,
            cors_allowed_origins = ?settings.server.cors_allowed_origins,
            "Server configuration loaded"
        );

        // The URL may carry credentials, so only its presence is logged.
        tracing::info!(
            backend = %settings.database.backend,
            url_configured = %settings.database.url().is_some(),
            max_connections = %settings.database.max_connections,
            auto_migrate = %settings.database.auto_migrate,
            "Database configuration loaded"
        );

        tracing::info!(
            level = %settings.logger.level,
            console_enabled = %settings.logger.console.enabled,
            file_enabled = %settings.logger.file.enabled,
            "Logger configuration loaded"
        );

        if settings.database.backend == StorageBackend::Postgres && settings.database.auto_migrate {
            if let Some(url) = settings.database.url() {
                let applied = run_pending_migrations(url.to_string()).await?;
                tracing::info!(applied = applied.len(), "Startup migrations completed");
            }
        }

        tracing::info!("Initializing student store...");
        let repos = Repositories::from_config(&settings.database).await?;
        tracing::info!(backend = %settings.database.backend, "Student store ready");

        let state = AppState::new(repos);
        let router = create_router(state, &settings.server);
        tracing::info!("Router configured");

        let address = settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;

        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Waits for Ctrl+C or SIGTERM.
///
/// A handler that cannot be installed is logged and never fires; the other
/// one still stops the server.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
