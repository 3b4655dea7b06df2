//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use jiff::civil::Date;

use super::validation::{
    validate_api_url, validate_config_file_path, validate_date, validate_host_address,
    validate_port, validate_rollback_steps, validate_student_id,
};

/// School administration server and client
#[derive(Parser, Debug)]
#[command(name = "school-rs")]
#[command(about = "Student records API server and command-line client")]
#[command(long_about = "
school-rs keeps student registration records behind a REST API and ships a
command-line client for the same API.

EXAMPLES:
    # Start the server with default configuration
    school-rs serve

    # Start the server on all interfaces, port 8080
    school-rs serve --host 0.0.0.0 --port 8080

    # Use a custom configuration file
    school-rs --config /etc/school-rs/production.toml serve

    # Check configuration without starting the server
    school-rs serve --dry-run

    # Apply, preview or roll back database migrations
    school-rs migrate
    school-rs migrate --dry-run
    school-rs migrate --rollback 1

    # Work with students through a running server
    school-rs students list
    school-rs students search asha
    school-rs students register --name \"Asha Rao\" --class \"Class 3\" \\
        --father-name \"Ravi Rao\" --father-contact1 9876543210
    school-rs students delete 4 --yes
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Loads this TOML file instead of the layered files under config/.
    /// SCHOOL_* environment variables still apply on top of it.
    #[arg(short, long, value_name = "FILE", value_parser = validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection (SCHOOL_APP_ENV)
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server (default)
    ///
    /// Examples:
    ///   school-rs serve                           # Start with defaults
    ///   school-rs serve --host 0.0.0.0 --port 80 # Bind to all interfaces on port 80
    ///   school-rs serve --dry-run                 # Validate config without starting
    Serve {
        /// Host address to bind to
        #[arg(long, value_name = "ADDRESS", value_parser = validate_host_address)]
        host: Option<String>,

        /// Port number to listen on
        #[arg(short, long, value_name = "PORT", value_parser = validate_port)]
        port: Option<u16>,

        /// Log level override
        ///
        /// Takes precedence over the configuration file and --verbose/--quiet.
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        #[arg(long)]
        dry_run: bool,
    },

    /// Database migration operations
    ///
    /// Examples:
    ///   school-rs migrate                    # Apply all pending migrations
    ///   school-rs migrate --dry-run          # Show pending migrations without applying
    ///   school-rs migrate --rollback 3       # Rollback the last 3 migrations
    Migrate {
        /// Show pending migrations without applying
        #[arg(long, conflicts_with = "rollback")]
        dry_run: bool,

        /// Number of migrations to rollback (1-100)
        #[arg(long, value_name = "STEPS", conflicts_with = "dry_run", value_parser = validate_rollback_steps)]
        rollback: Option<u32>,
    },

    /// Manage students through a running API server
    Students {
        /// API base URL, overriding client.base_url
        #[arg(long, value_name = "URL", env = "SCHOOL_API_URL", value_parser = validate_api_url)]
        url: Option<String>,

        #[command(subcommand)]
        command: StudentCommand,
    },
}

/// Operations of the `students` command group
#[derive(Subcommand, Debug, Clone)]
pub enum StudentCommand {
    /// List all students, newest first
    List,

    /// Show one student
    Get {
        #[arg(value_parser = validate_student_id)]
        id: i32,
    },

    /// Search by name, registration number, father's name or contact
    ///
    /// An empty query lists every student.
    Search { query: Option<String> },

    /// Register a new student
    Register {
        #[command(flatten)]
        form: StudentFormArgs,
    },

    /// Edit a student; only the given fields change
    Update {
        #[arg(value_parser = validate_student_id)]
        id: i32,

        #[command(flatten)]
        form: StudentFormArgs,
    },

    /// Delete a student after confirmation
    Delete {
        #[arg(value_parser = validate_student_id)]
        id: i32,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Registration form fields
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct StudentFormArgs {
    /// Registration number (default: REG-<unix millis>)
    #[arg(long, value_name = "NO")]
    pub registration_no: Option<String>,

    /// New or Old
    #[arg(long, value_name = "TYPE")]
    pub student_type: Option<String>,

    /// Nursery, KG, Class 1 ... Class 10
    #[arg(long = "class", value_name = "CLASS")]
    pub class_name: Option<String>,

    #[arg(long = "name", value_name = "NAME")]
    pub student_name: Option<String>,

    #[arg(long, value_name = "NAME")]
    pub father_name: Option<String>,

    #[arg(long, value_name = "NAME")]
    pub mother_name: Option<String>,

    #[arg(long, value_name = "PHONE")]
    pub father_contact1: Option<String>,

    #[arg(long, value_name = "PHONE")]
    pub father_contact2: Option<String>,

    #[arg(long, value_name = "PHONE")]
    pub sms_contact: Option<String>,

    /// Date of birth (YYYY-MM-DD); dobWords is filled in from it
    #[arg(long, value_name = "DATE", value_parser = validate_date)]
    pub dob: Option<Date>,

    /// Male, Female or Other
    #[arg(long)]
    pub gender: Option<String>,

    /// Date of admission (YYYY-MM-DD, default: today)
    #[arg(long, value_name = "DATE", value_parser = validate_date)]
    pub admission_date: Option<Date>,

    /// General, Subsidized, Free or Special
    #[arg(long, value_name = "CATEGORY")]
    pub fee_category: Option<String>,

    /// Yes or No
    #[arg(long, value_name = "YES_NO")]
    pub bus_van: Option<String>,

    /// Yes or No
    #[arg(long, value_name = "YES_NO")]
    pub hostel: Option<String>,

    /// Yes or No
    #[arg(long, value_name = "YES_NO")]
    pub library: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub village: Option<String>,

    #[arg(long)]
    pub district: Option<String>,

    #[arg(long)]
    pub state: Option<String>,

    /// Image file to attach as the student photo
    #[arg(long, value_name = "FILE")]
    pub student_photo: Option<PathBuf>,

    /// Image file to attach as the father's photo
    #[arg(long, value_name = "FILE")]
    pub father_photo: Option<PathBuf>,

    #[arg(long)]
    pub remarks: Option<String>,
}

impl StudentFormArgs {
    /// True when no field was given on the command line.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

/// Log level options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LogLevel {
    Error,
    #[value(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

impl Cli {
    /// Checks argument combinations clap cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use --verbose and --quiet together".to_string());
        }

        match &self.command {
            Some(Commands::Migrate {
                dry_run: true,
                rollback: Some(_),
            }) => Err("Cannot use --dry-run and --rollback together".to_string()),
            Some(Commands::Students {
                command: StudentCommand::Update { form, .. },
                ..
            }) if form.is_empty() => {
                Err("Nothing to update: pass at least one field, e.g. --class \"Class 4\"".to_string())
            }
            _ => Ok(()),
        }
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
        .to_string()
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_and_version_flags() {
        let err = Cli::try_parse_from(["school-rs", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);

        let err = Cli::try_parse_from(["school-rs", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_default_behavior() {
        let cli = Cli::try_parse_from(["school-rs"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
        assert!(cli.env.is_none());
    }

    #[test]
    fn test_serve_command() {
        let cli = Cli::try_parse_from(["school-rs", "serve", "--host", "0.0.0.0", "--port", "8080"])
            .unwrap();
        match cli.command {
            Some(Commands::Serve {
                host,
                port,
                dry_run,
                ..
            }) => {
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(8080));
                assert!(!dry_run);
            }
            other => panic!("Expected Serve command, got {other:?}"),
        }
    }

    #[test]
    fn test_migrate_flags_conflict() {
        let err = Cli::try_parse_from(["school-rs", "migrate", "--dry-run", "--rollback", "2"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_conflicting_verbose_quiet() {
        let err = Cli::try_parse_from(["school-rs", "--verbose", "--quiet"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_students_register_form_fields() {
        let cli = Cli::try_parse_from([
            "school-rs",
            "students",
            "--url",
            "http://localhost:5000",
            "register",
            "--name",
            "Asha Rao",
            "--class",
            "Class 3",
            "--father-name",
            "Ravi Rao",
            "--father-contact1",
            "9876543210",
            "--dob",
            "2015-03-21",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Students {
                url,
                command: StudentCommand::Register { form },
            }) => {
                assert_eq!(url.as_deref(), Some("http://localhost:5000"));
                assert_eq!(form.student_name.as_deref(), Some("Asha Rao"));
                assert_eq!(form.class_name.as_deref(), Some("Class 3"));
                assert_eq!(form.dob, Some(jiff::civil::date(2015, 3, 21)));
                assert!(form.registration_no.is_none());
            }
            other => panic!("Expected students register, got {other:?}"),
        }
    }

    #[test]
    fn test_students_delete_and_search() {
        let cli = Cli::try_parse_from(["school-rs", "students", "delete", "3", "--yes"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Students {
                command: StudentCommand::Delete { id: 3, yes: true },
                ..
            })
        ));

        let cli = Cli::try_parse_from(["school-rs", "students", "search"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Students {
                command: StudentCommand::Search { query: None },
                ..
            })
        ));

        assert!(Cli::try_parse_from(["school-rs", "students", "get", "0"]).is_err());
    }

    #[test]
    fn test_update_without_fields_fails_validation() {
        let cli = Cli::try_parse_from(["school-rs", "students", "update", "5"]).unwrap();
        assert!(cli.validate().unwrap_err().contains("Nothing to update"));

        let cli = Cli::try_parse_from(["school-rs", "students", "update", "5", "--hostel", "Yes"])
            .unwrap();
        assert!(cli.validate().is_ok());
    }
}
