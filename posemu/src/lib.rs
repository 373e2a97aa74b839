//! posemu - waypoint-replay position source
//!
//! This library stands in for a satellite-navigation receiver while developing
//! and testing location-aware gateway code. It replays a recorded GPX track on
//! a fixed timer and exposes the "current position" through a stable query
//! interface.
//!
//! # High-Level API
//!
//! The [`position`] module provides the service facade:
//!
//! ```ignore
//! use std::sync::Arc;
//! use posemu::position::{
//!     BroadcastEventPublisher, BundledTracks, PositionProvider, PositionService,
//!     PositionServiceConfig, WaypointStore,
//! };
//!
//! let publisher = Arc::new(BroadcastEventPublisher::new(16));
//! let store = WaypointStore::gpx(Arc::new(BundledTracks));
//! let service = PositionService::new(PositionServiceConfig::default(), store, publisher);
//!
//! service.start()?;
//! if let Some(position) = service.position() {
//!     println!("lat={} rad, lon={} rad", position.latitude, position.longitude);
//! }
//! ```

pub mod config;
pub mod logging;
pub mod position;

/// Version of the posemu library and CLI.
///
/// The version is defined in the workspace `Cargo.toml` and injected at
/// compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
