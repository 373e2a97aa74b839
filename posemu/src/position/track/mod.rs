//! Track parsing.
//!
//! A [`TrackParser`] turns the raw bytes of a recorded track into an ordered
//! list of [`GeoPoint`]s. The waypoint store does not care about the file
//! syntax; it only requires the points to come back in recording order.

mod gpx;

pub use gpx::GpxTrackParser;

use thiserror::Error;

use super::waypoint::GeoPoint;

/// Errors produced while parsing a track.
#[derive(Debug, Error)]
pub enum TrackParseError {
    /// The document is not well-formed.
    #[error("Malformed track document: {0}")]
    Malformed(String),

    /// A point element lacks a required attribute.
    #[error("Point #{index} is missing the '{attribute}' attribute")]
    MissingAttribute {
        index: usize,
        attribute: &'static str,
    },

    /// A numeric field could not be parsed.
    #[error("Point #{index} has an invalid {field} value '{value}'")]
    InvalidNumber {
        index: usize,
        field: &'static str,
        value: String,
    },

    /// A coordinate lies outside the valid range.
    #[error("Point #{index} has {field} {value} outside [{min}, {max}]")]
    OutOfRange {
        index: usize,
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Parses a recorded track into waypoints.
pub trait TrackParser: Send + Sync {
    /// Parse `data` into points, preserving document order.
    ///
    /// An empty result is not an error here; the store rejects it.
    fn parse(&self, data: &[u8]) -> Result<Vec<GeoPoint>, TrackParseError>;
}
