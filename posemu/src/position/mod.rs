//! Position emulation module.
//!
//! Replays a recorded track as if it were a live receiver. A fixed, ordered
//! list of waypoints is loaded once per start, and a single background task
//! walks through it on a timer, latching one position snapshot per tick.
//!
//! # Architecture
//!
//! ```text
//! ResourceProvider ──► TrackParser ──► WaypointStore
//!                                          │ load()
//!                                          ▼
//!                                   PositionSampler (tokio interval)
//!                                          │ tick()
//!                                          ▼
//!                                    SnapshotState ──► PositionService ──► callers
//!                                                             │
//!                                             EventNotifier ──┴── ListenerRegistry
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use posemu::position::{PositionEvent, PositionProvider};
//!
//! service.start()?;
//!
//! // Query the latest snapshot
//! if let Some(nmea) = service.nmea_position() {
//!     println!("{:.5}, {:.5} @ {:.1}m", nmea.latitude, nmea.longitude, nmea.altitude);
//! }
//!
//! // Wait for the lock announcement
//! let mut rx = publisher.subscribe();
//! while let Ok(event) = rx.recv().await {
//!     if matches!(event, PositionEvent::Locked) {
//!         break;
//!     }
//! }
//! ```
//!
//! # Components
//!
//! - `waypoint` - `GeoPoint`, `WaypointSequence` and the loading `WaypointStore`
//! - `resource` - `ResourceProvider` implementations and bundled `Location`s
//! - `track` - `TrackParser` trait and the GPX parser
//! - `state` - Snapshot value types: `Position`, `NmeaPosition`, `PositionSnapshot`
//! - `snapshot` - `SnapshotState`, the single-writer/multi-reader slot
//! - `sampler` - `PositionSampler`, the periodic replay task
//! - `notifier` - `PositionEvent`, `EventPublisher` and `EventNotifier`
//! - `listener` - `PositionListener` and the keyed `ListenerRegistry`
//! - `provider` - `PositionProvider` query trait
//! - `service` - `PositionService` facade and lifecycle state machine

mod error;
mod listener;
mod notifier;
mod provider;
mod resource;
mod sampler;
mod service;
mod snapshot;
mod state;
mod track;
mod waypoint;

pub use error::{ServiceError, WaypointError};
pub use listener::{ListenerRegistry, PositionListener};
pub use notifier::{
    BroadcastEventPublisher, EventNotifier, EventPublisher, NoOpEventPublisher, PositionEvent,
    TOPIC_CHANGED, TOPIC_LOCKED,
};
pub use provider::PositionProvider;
pub use resource::{BundledTracks, DirectoryResourceProvider, Location, ResourceProvider};
pub use sampler::{PositionSampler, DEFAULT_SAMPLE_INTERVAL};
pub use service::{
    PositionService, PositionServiceConfig, PositionServiceOptions, PositionServiceStatus,
};
pub use snapshot::SnapshotState;
pub use state::{NmeaPosition, Position, PositionSnapshot, ServiceState};
pub use track::{GpxTrackParser, TrackParseError, TrackParser};
pub use waypoint::{GeoPoint, WaypointSequence, WaypointStore};
