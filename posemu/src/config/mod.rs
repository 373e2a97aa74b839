//! Configuration file handling.
//!
//! User settings live in `~/.posemu/config.ini`. The layout mirrors the file:
//!
//! - `settings` - one struct per `[section]`
//! - `defaults` - `DEFAULT_*` constants and `Default` impls
//! - `parser` - `Ini` → [`ConfigFile`]
//! - `writer` - [`ConfigFile`] → commented INI text
//! - `file` - load/save and path helpers
//!
//! # Example
//!
//! ```
//! use posemu::config::ConfigFile;
//! use posemu::position::Location;
//!
//! let config = ConfigFile::default();
//! assert_eq!(config.position.location, Location::Boston);
//! assert_eq!(config.position.interval_secs, 5);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    default_log_file, DEFAULT_DISPATCH_LISTENERS, DEFAULT_INTERVAL_SECS, DEFAULT_USE_GPSD,
    MIN_INTERVAL_SECS,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, LoggingSettings, PositionSettings};
