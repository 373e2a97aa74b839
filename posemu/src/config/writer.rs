//! INI serialization: `ConfigFile` → commented INI string.

use std::path::Path;

use super::defaults::{DEFAULT_INTERVAL_SECS, MIN_INTERVAL_SECS};
use super::settings::ConfigFile;
use crate::position::Location;

/// Convert a `ConfigFile` to the commented INI text written to config.ini.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let locations = Location::ALL
        .iter()
        .map(|l| l.name())
        .collect::<Vec<_>>()
        .join(", ");
    let track_dir = config
        .position
        .track_dir
        .as_deref()
        .map(path_to_string)
        .unwrap_or_default();

    format!(
        r#"[position]
; Track to replay: {locations}
location = {location}
; Directory holding <location>.gpx files (default: bundled tracks)
track_dir = {track_dir}
; Seconds between position samples (default: {default_interval}, minimum: {min_interval})
interval_secs = {interval}
; Request gpsd receiver mode (recorded only; waypoints are always replayed)
use_gpsd = {use_gpsd}
; Deliver every sample to registered listeners and publish a change event
dispatch_listeners = {dispatch}

[logging]
; Log file path (cleared at the start of each session)
file = {log_file}
"#,
        locations = locations,
        location = config.position.location,
        track_dir = track_dir,
        default_interval = DEFAULT_INTERVAL_SECS,
        min_interval = MIN_INTERVAL_SECS,
        interval = config.position.interval_secs,
        use_gpsd = config.position.use_gpsd,
        dispatch = config.position.dispatch_listeners,
        log_file = path_to_string(&config.logging.file),
    )
}

/// Render a path, abbreviating the home directory to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_lists_every_key() {
        let text = to_config_string(&ConfigFile::default());

        for key in [
            "[position]",
            "location = boston",
            "track_dir = \n",
            "interval_secs = 5",
            "use_gpsd = false",
            "dispatch_listeners = false",
            "[logging]",
            "file = ",
        ] {
            assert!(text.contains(key), "missing {:?}", key);
        }
        assert!(text.contains("boston, denver, paris, test"));
    }

    #[test]
    fn test_path_to_string_absolute() {
        assert_eq!(
            path_to_string(Path::new("/opt/tracks")),
            "/opt/tracks".to_string()
        );
    }
}
