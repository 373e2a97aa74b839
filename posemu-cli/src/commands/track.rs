//! `posemu track` - parse a GPX file and list its waypoints.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use posemu::position::{DirectoryResourceProvider, WaypointSequence, WaypointStore};

use crate::error::CliError;

/// Load the track at `path` and print one line per waypoint.
pub fn run(path: PathBuf) -> Result<(), CliError> {
    let waypoints = load_track(&path)?;

    println!("{} ({} waypoints)", path.display(), waypoints.len());
    println!();
    for line in format_waypoints(&waypoints) {
        println!("{}", line);
    }
    Ok(())
}

/// Load a track file through the same store the service uses.
pub fn load_track(path: &Path) -> Result<WaypointSequence, CliError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| CliError::Config(format!("'{}' is not a file path", path.display())))?;

    WaypointStore::gpx(Arc::new(DirectoryResourceProvider::new(dir)))
        .load(&name)
        .map_err(|error| CliError::Track {
            path: path.to_path_buf(),
            error,
        })
}

fn format_waypoints(waypoints: &WaypointSequence) -> Vec<String> {
    waypoints
        .iter()
        .enumerate()
        .map(|(i, p)| {
            format!(
                "{:>4}  lat={:>10.5} lon={:>10.5} ele={:>7.1}m",
                i, p.latitude, p.longitude, p.altitude
            )
        })
        .collect()
}
