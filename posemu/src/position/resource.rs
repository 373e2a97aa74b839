//! Track resources.
//!
//! A [`ResourceProvider`] resolves a resource name (e.g. `boston.gpx`) to a
//! readable byte stream. Two providers are available:
//!
//! - [`BundledTracks`] - tracks compiled into the library
//! - [`DirectoryResourceProvider`] - files under a directory on disk

use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use super::error::WaypointError;

/// Resolves named track resources to byte streams.
pub trait ResourceProvider: Send + Sync {
    /// Open the resource called `name` for reading.
    fn open(&self, name: &str) -> Result<Box<dyn Read + Send>, WaypointError>;
}

/// Named tracks shipped with the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Location {
    /// Downtown Boston loop.
    #[default]
    Boston,
    /// Denver Civic Center.
    Denver,
    /// Champ de Mars, Paris.
    Paris,
    /// Three points on the equator/prime-meridian diagonal: (0,0,0), (1,1,1), (2,2,2).
    Test,
}

impl Location {
    /// All bundled locations.
    pub const ALL: [Location; 4] = [
        Location::Boston,
        Location::Denver,
        Location::Paris,
        Location::Test,
    ];

    /// Short lowercase name used in configuration.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Boston => "boston",
            Self::Denver => "denver",
            Self::Paris => "paris",
            Self::Test => "test",
        }
    }

    /// Resource name of the track for this location.
    pub fn resource_name(&self) -> &'static str {
        match self {
            Self::Boston => "boston.gpx",
            Self::Denver => "denver.gpx",
            Self::Paris => "paris.gpx",
            Self::Test => "test.gpx",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Location {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|l| l.name() == s)
            .ok_or_else(|| format!("unknown location '{}'", s))
    }
}

const BUNDLED: &[(&str, &[u8])] = &[
    ("boston.gpx", include_bytes!("../../resources/boston.gpx")),
    ("denver.gpx", include_bytes!("../../resources/denver.gpx")),
    ("paris.gpx", include_bytes!("../../resources/paris.gpx")),
    ("test.gpx", include_bytes!("../../resources/test.gpx")),
];

/// Tracks compiled into the library, one per [`Location`].
#[derive(Debug, Default, Clone, Copy)]
pub struct BundledTracks;

impl BundledTracks {
    /// Raw bytes of a bundled resource.
    pub fn get(name: &str) -> Option<&'static [u8]> {
        BUNDLED
            .iter()
            .find(|(resource, _)| *resource == name)
            .map(|(_, bytes)| *bytes)
    }
}

impl ResourceProvider for BundledTracks {
    fn open(&self, name: &str) -> Result<Box<dyn Read + Send>, WaypointError> {
        Self::get(name)
            .map(|bytes| Box::new(Cursor::new(bytes)) as Box<dyn Read + Send>)
            .ok_or_else(|| WaypointError::ResourceNotFound(name.to_string()))
    }
}

/// Serves track files from a directory.
///
/// Names must be relative paths that stay inside the directory.
#[derive(Debug, Clone)]
pub struct DirectoryResourceProvider {
    root: PathBuf,
}

impl DirectoryResourceProvider {
    /// Create a provider rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory resources are read from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        (contained && !name.is_empty()).then(|| self.root.join(relative))
    }
}

impl ResourceProvider for DirectoryResourceProvider {
    fn open(&self, name: &str) -> Result<Box<dyn Read + Send>, WaypointError> {
        let path = self
            .resolve(name)
            .ok_or_else(|| WaypointError::ResourceNotFound(name.to_string()))?;

        match File::open(&path) {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(WaypointError::ResourceNotFound(name.to_string()))
            }
            Err(source) => Err(WaypointError::Io {
                resource: name.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn read_all(mut reader: Box<dyn Read + Send>) -> String {
        let mut s = String::new();
        reader.read_to_string(&mut s).unwrap();
        s
    }

    #[test]
    fn test_location_round_trip_names() {
        for location in Location::ALL {
            assert_eq!(location.name().parse::<Location>(), Ok(location));
            assert!(location.resource_name().starts_with(location.name()));
        }
        assert_eq!(" Paris ".parse::<Location>(), Ok(Location::Paris));
        assert!("atlantis".parse::<Location>().is_err());
    }

    #[test]
    fn test_default_location_is_boston() {
        assert_eq!(Location::default(), Location::Boston);
        assert_eq!(Location::default().to_string(), "boston");
    }

    #[test]
    fn test_every_location_is_bundled() {
        for location in Location::ALL {
            let reader = BundledTracks.open(location.resource_name()).unwrap();
            assert!(read_all(reader).contains("<trkpt"));
        }
    }

    #[test]
    fn test_bundled_unknown_resource() {
        let result = BundledTracks.open("atlantis.gpx");
        assert!(matches!(result, Err(WaypointError::ResourceNotFound(name)) if name == "atlantis.gpx"));
    }

    #[test]
    fn test_directory_provider_reads_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("route.gpx"), "<gpx/>").unwrap();

        let provider = DirectoryResourceProvider::new(dir.path());
        let reader = provider.open("route.gpx").unwrap();

        assert_eq!(read_all(reader), "<gpx/>");
    }

    #[test]
    fn test_directory_provider_missing_file() {
        let dir = TempDir::new().unwrap();
        let provider = DirectoryResourceProvider::new(dir.path());

        assert!(matches!(
            provider.open("missing.gpx"),
            Err(WaypointError::ResourceNotFound(_))
        ));
    }

    #[test]
    fn test_directory_provider_rejects_escaping_names() {
        let dir = TempDir::new().unwrap();
        let provider = DirectoryResourceProvider::new(dir.path().join("tracks"));

        for name in ["../secret.gpx", "/etc/passwd", ""] {
            assert!(
                matches!(provider.open(name), Err(WaypointError::ResourceNotFound(_))),
                "{} should be rejected",
                name
            );
        }
    }
}
