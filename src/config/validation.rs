//! Configuration validation logic
//!
//! This module provides validation methods for all configuration structures
//! to ensure configuration values are within acceptable ranges and formats.

use crate::config::error::ConfigError;
use crate::config::settings::{
    ClientConfig, DatabaseConfig, FileSettings, LoggerSettings, ServerConfig, Settings,
    StorageBackend,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// Schemes accepted by the postgres backend
const VALID_DATABASE_SCHEMES: &[&str] = &["postgres://", "postgresql://"];

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Port must be between 1 and 65535
    /// - Host must not be empty
    /// - Max body size must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.host.trim().is_empty() {
            return Err(ConfigError::validation(
                "server.host",
                "Host is required. Use 127.0.0.1 for local access or 0.0.0.0 for all interfaces.",
            ));
        }

        if self.max_body_size == 0 {
            return Err(ConfigError::validation(
                "server.max_body_size",
                "Max body size must be greater than 0 bytes.",
            ));
        }

        if let Some(origin) = self
            .cors_allowed_origins
            .iter()
            .find(|o| o.trim().is_empty())
        {
            return Err(ConfigError::validation(
                "server.cors_allowed_origins",
                format!("CORS origin '{}' must not be blank.", origin),
            ));
        }

        Ok(())
    }
}

impl DatabaseConfig {
    /// Validate database configuration
    ///
    /// # Validation Rules
    /// - The postgres backend needs a `postgres://` or `postgresql://` URL
    /// - Max and min connections must be greater than 0
    /// - Min connections must not exceed max connections
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == StorageBackend::Postgres {
            let Some(url) = self.url() else {
                return Err(ConfigError::validation(
                    "database.url",
                    "Database URL is required for the postgres backend. \
                     Set database.url or choose backend = \"memory\".",
                ));
            };

            if !VALID_DATABASE_SCHEMES
                .iter()
                .any(|scheme| url.starts_with(scheme))
            {
                return Err(ConfigError::validation(
                    "database.url",
                    "Invalid database URL format. Expected format: postgres://[user:password@]host[:port]/database",
                ));
            }
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }

        if self.min_connections == 0 {
            return Err(ConfigError::validation(
                "database.min_connections",
                "Min connections must be greater than 0.",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::validation(
                "database.min_connections",
                format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            ));
        }

        if self.connection_timeout == 0 {
            return Err(ConfigError::validation(
                "database.connection_timeout",
                "Connection timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - If file logging is enabled, path must not be empty
    /// - Log format must be one of: full, compact, json
    /// - Console and file output cannot both be disabled
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        self.file.validate()?;

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        Ok(())
    }
}

impl ClientConfig {
    /// The base URL must be an absolute http(s) URL and the timeout non-zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::validation(
                "client.base_url",
                format!(
                    "Invalid API base URL '{}'. Expected http://host[:port] or https://host[:port]",
                    self.base_url
                ),
            ));
        }

        if self.timeout == 0 {
            return Err(ConfigError::validation(
                "client.timeout",
                "Client timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// Returns the first validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.logger.validate()?;
        self.client.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: ConfigError) -> String {
        match err {
            ConfigError::ValidationError { field, .. } => field,
            other => panic!("Expected ValidationError, got {other:?}"),
        }
    }

    fn memory_database() -> DatabaseConfig {
        DatabaseConfig {
            backend: StorageBackend::Memory,
            ..Default::default()
        }
    }

    #[test]
    fn test_server_config_valid() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_server_config_invalid_port_zero() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert_eq!(field_of(config.validate().unwrap_err()), "server.port");
    }

    #[test]
    fn test_server_config_valid_port_boundaries() {
        for port in [1, 65535] {
            let config = ServerConfig {
                port,
                ..Default::default()
            };
            assert!(config.validate().is_ok(), "port {port}");
        }
    }

    #[test]
    fn test_server_config_zero_body_limit() {
        let config = ServerConfig {
            max_body_size: 0,
            ..Default::default()
        };
        assert_eq!(field_of(config.validate().unwrap_err()), "server.max_body_size");
    }

    #[test]
    fn test_server_config_blank_cors_origin() {
        let config = ServerConfig {
            cors_allowed_origins: vec!["http://localhost:3000".to_string(), " ".to_string()],
            ..Default::default()
        };
        assert_eq!(
            field_of(config.validate().unwrap_err()),
            "server.cors_allowed_origins"
        );
    }

    #[test]
    fn test_postgres_requires_url() {
        let err = DatabaseConfig::default().validate().unwrap_err();
        assert_eq!(field_of(err), "database.url");
    }

    #[test]
    fn test_postgres_rejects_foreign_scheme() {
        let config = DatabaseConfig {
            url: Some("mysql://localhost/school".to_string()),
            ..Default::default()
        };
        assert_eq!(field_of(config.validate().unwrap_err()), "database.url");
    }

    #[test]
    fn test_postgres_with_url_is_valid() {
        for url in ["postgres://localhost/school", "postgresql://u:p@db:5432/school"] {
            let config = DatabaseConfig {
                url: Some(url.to_string()),
                ..Default::default()
            };
            assert!(config.validate().is_ok(), "url {url}");
        }
    }

    #[test]
    fn test_memory_backend_needs_no_url() {
        assert!(memory_database().validate().is_ok());
    }

    #[test]
    fn test_min_connections_cannot_exceed_max() {
        let config = DatabaseConfig {
            max_connections: 2,
            min_connections: 5,
            ..memory_database()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cannot exceed"));
        assert_eq!(field_of(err), "database.min_connections");
    }

    #[test]
    fn test_zero_connections_rejected() {
        let config = DatabaseConfig {
            max_connections: 0,
            ..memory_database()
        };
        assert_eq!(
            field_of(config.validate().unwrap_err()),
            "database.max_connections"
        );
    }

    #[test]
    fn test_logger_invalid_level() {
        let settings = LoggerSettings {
            level: "verbose".to_string(),
            ..Default::default()
        };
        assert_eq!(field_of(settings.validate().unwrap_err()), "logger.level");
    }

    #[test]
    fn test_logger_level_case_insensitive() {
        let settings = LoggerSettings {
            level: "DEBUG".to_string(),
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_logger_file_enabled_needs_path() {
        let mut settings = LoggerSettings::default();
        settings.file.enabled = true;
        settings.file.path = String::new();
        assert_eq!(field_of(settings.validate().unwrap_err()), "logger.file.path");
    }

    #[test]
    fn test_logger_needs_an_output() {
        let mut settings = LoggerSettings::default();
        settings.console.enabled = false;
        assert_eq!(field_of(settings.validate().unwrap_err()), "logger");
    }

    #[test]
    fn test_client_base_url_must_be_http() {
        let config = ClientConfig {
            base_url: "localhost:5000".to_string(),
            ..Default::default()
        };
        assert_eq!(field_of(config.validate().unwrap_err()), "client.base_url");
        assert!(ClientConfig::default().validate().is_ok());
    }

    #[test]
    fn test_settings_reports_first_failure() {
        let settings = Settings {
            database: memory_database(),
            ..Default::default()
        };
        assert!(settings.validate().is_ok());

        let broken = Settings {
            server: ServerConfig {
                port: 0,
                ..Default::default()
            },
            ..settings
        };
        assert_eq!(field_of(broken.validate().unwrap_err()), "server.port");
    }
}
