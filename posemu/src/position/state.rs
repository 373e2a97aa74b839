//! Snapshot value types.
//!
//! - [`Position`] - latitude/longitude in radians, altitude in meters
//! - [`NmeaPosition`] - the same fix in degrees, receiver-style
//! - [`PositionSnapshot`] - one tick's worth of derived state
//! - [`ServiceState`] - lifecycle state of the position service

use chrono::{DateTime, SecondsFormat, Utc};

use super::waypoint::GeoPoint;

/// Position measurement in SI units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Latitude in radians.
    pub latitude: f64,

    /// Longitude in radians.
    pub longitude: f64,

    /// Altitude in meters.
    pub altitude: f64,
}

/// Receiver-style position in degrees.
///
/// `speed` and `track` are reserved; a replayed track has no motion data so
/// both are always zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NmeaPosition {
    /// Latitude in degrees.
    pub latitude: f64,

    /// Longitude in degrees.
    pub longitude: f64,

    /// Altitude in meters.
    pub altitude: f64,

    /// Speed over ground (reserved, always 0).
    pub speed: f64,

    /// Track made good in degrees (reserved, always 0).
    pub track: f64,
}

/// The latched state produced by one sampler tick.
///
/// Snapshots are immutable and replaced whole; nothing ever merges a new tick
/// into an old snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSnapshot {
    /// Position in radians/meters.
    pub position: Position,

    /// Position in degrees/meters.
    pub nmea: NmeaPosition,

    /// Wall-clock time the snapshot was taken.
    pub captured_at: DateTime<Utc>,

    /// Index of the waypoint this snapshot was derived from.
    pub waypoint_index: usize,
}

impl PositionSnapshot {
    /// Derive a snapshot from a waypoint.
    pub fn from_waypoint(waypoint_index: usize, point: &GeoPoint, captured_at: DateTime<Utc>) -> Self {
        Self {
            position: Position {
                latitude: point.latitude_radians(),
                longitude: point.longitude_radians(),
                altitude: point.altitude,
            },
            nmea: NmeaPosition {
                latitude: point.latitude,
                longitude: point.longitude,
                altitude: point.altitude,
                speed: 0.0,
                track: 0.0,
            },
            captured_at,
            waypoint_index,
        }
    }

    /// Capture time as an RFC 3339 string with millisecond precision.
    pub fn timestamp(&self) -> String {
        self.captured_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Lifecycle state of the position service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceState {
    /// Not running; no sampler scheduled.
    #[default]
    Stopped,
    /// Loading waypoints and scheduling the sampler.
    Starting,
    /// Sampler scheduled and lock announced.
    Running,
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stopped => write!(f, "Stopped"),
            Self::Starting => write!(f, "Starting"),
            Self::Running => write!(f, "Running"),
        }
    }
}
