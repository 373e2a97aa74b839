//! Default values for all configuration settings.

use std::path::PathBuf;

use super::file::config_directory;
use super::settings::*;
use crate::position::Location;

/// Default seconds between samples.
pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Smallest accepted sample interval in seconds.
pub const MIN_INTERVAL_SECS: u64 = 1;

/// gpsd mode is off unless requested.
pub const DEFAULT_USE_GPSD: bool = false;

/// Per-sample dispatch is off unless requested.
pub const DEFAULT_DISPATCH_LISTENERS: bool = false;

/// Default log file (~/.posemu/posemu.log).
pub fn default_log_file() -> PathBuf {
    config_directory().join("posemu.log")
}

impl Default for PositionSettings {
    fn default() -> Self {
        Self {
            location: Location::default(),
            track_dir: None,
            interval_secs: DEFAULT_INTERVAL_SECS,
            use_gpsd: DEFAULT_USE_GPSD,
            dispatch_listeners: DEFAULT_DISPATCH_LISTENERS,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: default_log_file(),
        }
    }
}
