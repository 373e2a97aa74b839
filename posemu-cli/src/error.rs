//! CLI error handling with user-friendly messages.
//!
//! Centralizes error formatting and exit codes for all subcommands.

use std::fmt;
use std::path::PathBuf;
use std::process;

use posemu::config::ConfigFileError;
use posemu::position::{Location, ServiceError, WaypointError};

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to build the async runtime
    Runtime(std::io::Error),
    /// Position service failed to start
    Service(ServiceError),
    /// Failed to read or parse a track file
    Track { path: PathBuf, error: WaypointError },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::Service(ServiceError::Load(WaypointError::ResourceNotFound(_))) = self {
            let names: Vec<&str> = Location::ALL.iter().map(|l| l.name()).collect();
            eprintln!();
            eprintln!("Common issues:");
            eprintln!("  1. Unknown location; bundled tracks are: {}", names.join(", "));
            eprintln!("  2. track_dir is set but has no <location>.gpx file");
            eprintln!("     Check with: posemu config show");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::Service(e) => write!(f, "Position service error: {}", e),
            CliError::Track { path, error } => {
                write!(f, "Failed to load track '{}': {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Runtime(e) => Some(e),
            CliError::Service(e) => Some(e),
            CliError::Track { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        CliError::Service(e)
    }
}
