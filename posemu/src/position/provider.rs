//! Query interface for position consumers.

use std::sync::Arc;

use super::state::{NmeaPosition, Position};

/// Trait for querying the current position (pull API).
///
/// All methods are synchronous and valid in any service state; when no
/// snapshot has been taken yet they return `None`.
pub trait PositionProvider: Send + Sync {
    /// Latest position in radians/meters.
    fn position(&self) -> Option<Position>;

    /// Latest position in degrees/meters.
    fn nmea_position(&self) -> Option<NmeaPosition>;

    /// Capture time of the latest snapshot.
    fn nmea_time(&self) -> Option<String>;

    /// Capture date of the latest snapshot.
    fn nmea_date(&self) -> Option<String>;

    /// Check whether the source currently has a fix.
    fn is_locked(&self) -> bool;

    /// Last raw receiver sentence, if the source produces any.
    fn last_sentence(&self) -> Option<String>;
}

impl<T: PositionProvider + ?Sized> PositionProvider for Arc<T> {
    fn position(&self) -> Option<Position> {
        (**self).position()
    }

    fn nmea_position(&self) -> Option<NmeaPosition> {
        (**self).nmea_position()
    }

    fn nmea_time(&self) -> Option<String> {
        (**self).nmea_time()
    }

    fn nmea_date(&self) -> Option<String> {
        (**self).nmea_date()
    }

    fn is_locked(&self) -> bool {
        (**self).is_locked()
    }

    fn last_sentence(&self) -> Option<String> {
        (**self).last_sentence()
    }
}
