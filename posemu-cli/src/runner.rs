//! CLI runner for common setup.
//!
//! Loads the config file, initializes logging and owns the tokio runtime
//! that hosts the position sampler.

use tokio::runtime::Runtime;
use tracing::info;

use posemu::config::ConfigFile;
use posemu::logging::{default_log_dir, default_log_file, init_logging, LoggingGuard};

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Keeps the log writer alive while the runner exists
    _logging_guard: LoggingGuard,
    config: ConfigFile,
    runtime: Runtime,
}

impl CliRunner {
    /// Load config, initialize logging and build the runtime.
    ///
    /// Logs go to the configured file. Stdout logging is only enabled in
    /// debug mode, since the command prints positions there.
    pub fn with_debug(debug_mode: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let log_path = &config.logging.file;
        let log_dir = log_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(default_log_dir);
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| default_log_file().to_string());

        let logging_guard = init_logging(&log_dir, &log_file, debug_mode, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("posemu-worker")
            .build()
            .map_err(CliError::Runtime)?;

        Ok(Self {
            _logging_guard: logging_guard,
            config,
            runtime,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// The runtime hosting background tasks.
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("posemu v{}", posemu::VERSION);
        info!("posemu CLI: {} command", command);
    }
}
