//! Waypoint store.
//!
//! Holds the recorded points the sampler replays. A [`WaypointSequence`] is
//! never empty: the only way to build one is through a constructor that
//! rejects an empty list, so the sampler can index it without a zero-length
//! special case.

use std::io::Read;
use std::sync::Arc;

use super::error::WaypointError;
use super::resource::ResourceProvider;
use super::track::{GpxTrackParser, TrackParser};

/// A single recorded geographic point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,

    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,

    /// Altitude in meters.
    pub altitude: f64,
}

impl GeoPoint {
    /// Create a new point from degrees and meters.
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    /// Latitude converted to radians.
    #[inline]
    pub fn latitude_radians(&self) -> f64 {
        self.latitude.to_radians()
    }

    /// Longitude converted to radians.
    #[inline]
    pub fn longitude_radians(&self) -> f64 {
        self.longitude.to_radians()
    }
}

/// Ordered, non-empty, read-only list of waypoints.
///
/// Cloning is cheap; clones share the same points.
#[derive(Debug, Clone)]
pub struct WaypointSequence {
    points: Arc<[GeoPoint]>,
}

impl WaypointSequence {
    /// Build a sequence, returning `None` if `points` is empty.
    pub fn new(points: Vec<GeoPoint>) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        Some(Self {
            points: points.into(),
        })
    }

    /// Number of waypoints (always at least 1).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; present for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Waypoint at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&GeoPoint> {
        self.points.get(index)
    }

    /// First waypoint of the track.
    pub fn first(&self) -> &GeoPoint {
        &self.points[0]
    }

    /// Iterate over the waypoints in order.
    pub fn iter(&self) -> impl Iterator<Item = &GeoPoint> {
        self.points.iter()
    }
}

/// Loads waypoint sequences from named resources.
#[derive(Clone)]
pub struct WaypointStore {
    provider: Arc<dyn ResourceProvider>,
    parser: Arc<dyn TrackParser>,
}

impl WaypointStore {
    /// Create a store from a resource provider and a track parser.
    pub fn new(provider: Arc<dyn ResourceProvider>, parser: Arc<dyn TrackParser>) -> Self {
        Self { provider, parser }
    }

    /// Create a store that parses GPX tracks.
    pub fn gpx(provider: Arc<dyn ResourceProvider>) -> Self {
        Self::new(provider, Arc::new(GpxTrackParser::new()))
    }

    /// Load and parse the named resource.
    ///
    /// Blocks on the provider's I/O. Fails if the resource is missing,
    /// unreadable, malformed, or holds no points.
    pub fn load(&self, resource: &str) -> Result<WaypointSequence, WaypointError> {
        tracing::debug!(resource, "Loading waypoints");

        let mut reader = self.provider.open(resource)?;
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .map_err(|source| WaypointError::Io {
                resource: resource.to_string(),
                source,
            })?;

        let points = self
            .parser
            .parse(&data)
            .map_err(|source| WaypointError::Parse {
                resource: resource.to_string(),
                source,
            })?;

        let sequence = WaypointSequence::new(points)
            .ok_or_else(|| WaypointError::EmptySequence(resource.to_string()))?;

        tracing::info!(resource, waypoints = sequence.len(), "Waypoints loaded");
        Ok(sequence)
    }
}

impl std::fmt::Debug for WaypointStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaypointStore").finish_non_exhaustive()
    }
}
