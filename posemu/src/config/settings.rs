//! Settings structs for each configuration section.
//!
//! Pure data; parsing and serialization live in sibling modules.

use std::path::PathBuf;

use crate::position::Location;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    /// Position emulation settings
    pub position: PositionSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// `[position]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSettings {
    /// Bundled location whose track is replayed
    pub location: Location,
    /// Directory to read `<location>.gpx` from instead of the bundled tracks
    pub track_dir: Option<PathBuf>,
    /// Seconds between samples
    pub interval_secs: u64,
    /// Request gpsd mode (recorded only)
    pub use_gpsd: bool,
    /// Deliver every sample to listeners and the event publisher
    pub dispatch_listeners: bool,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
