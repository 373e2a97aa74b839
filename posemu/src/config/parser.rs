//! INI parsing: `Ini` → `ConfigFile`.
//!
//! The single place where INI key names map to struct fields.

use std::path::PathBuf;

use ini::Ini;

use super::defaults::MIN_INTERVAL_SECS;
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::position::Location;

/// Parse an `Ini` into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays values found in the INI.
/// Unknown sections and keys are ignored.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [position] section
    if let Some(section) = ini.section(Some("position")) {
        if let Some(v) = section.get("location") {
            config.position.location =
                v.parse::<Location>()
                    .map_err(|reason| ConfigFileError::InvalidValue {
                        section: "position".to_string(),
                        key: "location".to_string(),
                        value: v.to_string(),
                        reason,
                    })?;
        }
        if let Some(v) = section.get("track_dir") {
            let v = v.trim();
            if !v.is_empty() {
                config.position.track_dir = Some(expand_tilde(v));
            }
        }
        if let Some(v) = section.get("interval_secs") {
            let secs: u64 = v.trim().parse().map_err(|_| invalid_interval(v))?;
            if secs < MIN_INTERVAL_SECS {
                return Err(invalid_interval(v));
            }
            config.position.interval_secs = secs;
        }
        if let Some(v) = section.get("use_gpsd") {
            config.position.use_gpsd = parse_bool(v);
        }
        if let Some(v) = section.get("dispatch_listeners") {
            config.position.dispatch_listeners = parse_bool(v);
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn invalid_interval(value: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: "position".to_string(),
        key: "interval_secs".to_string(),
        value: value.to_string(),
        reason: format!("must be an integer >= {}", MIN_INTERVAL_SECS),
    }
}

/// Parse a boolean value; anything other than a "true" spelling is false.
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_parse_position_section() {
        let config = load(
            r#"
[position]
location = Paris
track_dir = /srv/tracks
interval_secs = 2
use_gpsd = yes
dispatch_listeners = on
"#,
        )
        .unwrap();

        assert_eq!(config.position.location, Location::Paris);
        assert_eq!(config.position.track_dir, Some(PathBuf::from("/srv/tracks")));
        assert_eq!(config.position.interval_secs, 2);
        assert!(config.position.use_gpsd);
        assert!(config.position.dispatch_listeners);
    }

    #[test]
    fn test_missing_keys_keep_defaults() {
        let config = load("[position]\nlocation = test\n").unwrap();

        assert_eq!(config.position.location, Location::Test);
        assert_eq!(config.position.interval_secs, 5);
        assert!(config.position.track_dir.is_none());
    }

    #[test]
    fn test_empty_track_dir_is_none() {
        let config = load("[position]\ntrack_dir =\n").unwrap();
        assert!(config.position.track_dir.is_none());
    }

    #[test]
    fn test_invalid_location() {
        let err = load("[position]\nlocation = atlantis\n").unwrap_err();

        assert!(matches!(err, ConfigFileError::InvalidValue { ref key, .. } if key == "location"));
        assert!(err.to_string().contains("atlantis"));
    }

    #[test]
    fn test_invalid_interval() {
        for bad in ["0", "-3", "soon"] {
            let err = load(&format!("[position]\ninterval_secs = {}\n", bad)).unwrap_err();
            assert!(
                err.to_string().contains("position.interval_secs"),
                "value {}",
                bad
            );
        }
    }

    #[test]
    fn test_logging_file() {
        let config = load("[logging]\nfile = /var/log/posemu.log\n").unwrap();
        assert_eq!(config.logging.file, PathBuf::from("/var/log/posemu.log"));
    }

    #[test]
    fn test_unknown_sections_ignored() {
        let config = load("[cache]\nsize = 2GB\n").unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("1"));
        assert!(parse_bool(" yes "));
        assert!(parse_bool("on"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn test_expand_tilde() {
        let path = expand_tilde("~/tracks");
        assert!(!path.to_string_lossy().starts_with('~') || dirs::home_dir().is_none());

        let path = expand_tilde("/absolute/path");
        assert_eq!(path, PathBuf::from("/absolute/path"));
    }
}
