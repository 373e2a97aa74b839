//! Error types for the position module.

use thiserror::Error;

use super::track::TrackParseError;

/// Errors raised while loading a waypoint sequence.
///
/// Every variant is fatal to [`PositionService::start`]; the service never
/// runs without a loaded sequence.
///
/// [`PositionService::start`]: super::PositionService::start
#[derive(Debug, Error)]
pub enum WaypointError {
    /// The resource provider has no resource under this name.
    #[error("Track resource '{0}' not found")]
    ResourceNotFound(String),

    /// The resource exists but could not be read.
    #[error("Failed to read track resource '{resource}': {source}")]
    Io {
        resource: String,
        #[source]
        source: std::io::Error,
    },

    /// The resource could not be parsed as a track.
    #[error("Failed to parse track resource '{resource}': {source}")]
    Parse {
        resource: String,
        #[source]
        source: TrackParseError,
    },

    /// The track parsed successfully but holds no points.
    #[error("Track resource '{0}' contains no waypoints")]
    EmptySequence(String),
}

/// Errors returned by the position service lifecycle.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The waypoint sequence could not be loaded.
    #[error("Failed to load waypoints: {0}")]
    Load(#[from] WaypointError),

    /// `start()` was called outside a tokio runtime, so the sampler has
    /// nowhere to run.
    #[error("No tokio runtime available to host the position sampler")]
    RuntimeUnavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_resource_not_found() {
        let err = WaypointError::ResourceNotFound("boston.gpx".to_string());
        assert_eq!(err.to_string(), "Track resource 'boston.gpx' not found");
    }

    #[test]
    fn test_display_empty_sequence() {
        let err = WaypointError::EmptySequence("empty.gpx".to_string());
        assert!(err.to_string().contains("empty.gpx"));
        assert!(err.to_string().contains("no waypoints"));
    }

    #[test]
    fn test_io_error_source() {
        let err = WaypointError::Io {
            resource: "boston.gpx".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let source = std::error::Error::source(&err).expect("should carry source");
        assert!(source.to_string().contains("denied"));
    }

    #[test]
    fn test_service_error_from_waypoint_error() {
        let err: ServiceError = WaypointError::ResourceNotFound("x.gpx".to_string()).into();
        assert!(matches!(
            err,
            ServiceError::Load(WaypointError::ResourceNotFound(_))
        ));
        assert!(err.to_string().contains("x.gpx"));
    }
}
