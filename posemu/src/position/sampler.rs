//! Position sampler - the periodic replay task.
//!
//! Each tick reads the waypoint at the cycle index, derives a snapshot,
//! publishes it and advances the index modulo the sequence length. The first
//! tick fires as soon as the task starts; later ticks follow at a fixed
//! period.
//!
//! # Cancellation
//!
//! The sampler owns a [`CancellationToken`]. The run loop checks it at every
//! tick boundary, and [`SnapshotState::publish`] checks it again under the
//! write lock, so a cancelled sampler never publishes. Listener dispatch
//! checks the token again before each delivery step.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::listener::ListenerRegistry;
use super::notifier::EventNotifier;
use super::snapshot::SnapshotState;
use super::state::PositionSnapshot;
use super::waypoint::WaypointSequence;

/// Default time between ticks (5 seconds).
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_secs(5);

/// Per-tick delivery targets for position changes.
struct Dispatch {
    listeners: Arc<ListenerRegistry>,
    notifier: EventNotifier,
}

/// Replays a waypoint sequence into a snapshot slot.
pub struct PositionSampler {
    waypoints: WaypointSequence,
    index: usize,
    snapshots: Arc<SnapshotState>,
    cancellation: CancellationToken,
    dispatch: Option<Dispatch>,
}

impl PositionSampler {
    /// Create a sampler starting at the first waypoint.
    pub fn new(
        waypoints: WaypointSequence,
        snapshots: Arc<SnapshotState>,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            waypoints,
            index: 0,
            snapshots,
            cancellation,
            dispatch: None,
        }
    }

    /// Deliver every published snapshot to `listeners` and post it as a
    /// [`PositionEvent::Changed`](super::PositionEvent::Changed).
    pub fn with_dispatch(mut self, listeners: Arc<ListenerRegistry>, notifier: EventNotifier) -> Self {
        self.dispatch = Some(Dispatch {
            listeners,
            notifier,
        });
        self
    }

    /// Index of the waypoint the next tick will read.
    pub fn cycle_index(&self) -> usize {
        self.index
    }

    /// Number of waypoints being replayed.
    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    /// Run one tick.
    ///
    /// Returns the published snapshot, or `None` if the sampler has been
    /// cancelled. The index only advances when a snapshot is published.
    pub fn tick(&mut self) -> Option<Arc<PositionSnapshot>> {
        if self.cancellation.is_cancelled() {
            return None;
        }

        // The index is kept in range by the modulo below
        let point = self.waypoints.get(self.index)?;
        let snapshot = Arc::new(PositionSnapshot::from_waypoint(self.index, point, Utc::now()));

        if !self.snapshots.publish(Arc::clone(&snapshot), &self.cancellation) {
            return None;
        }

        tracing::debug!(
            index = self.index,
            lat_rad = snapshot.position.latitude,
            lon_rad = snapshot.position.longitude,
            alt_m = snapshot.position.altitude,
            "Position sample published"
        );

        self.index = (self.index + 1) % self.waypoints.len();
        if self.index == 0 {
            tracing::debug!(waypoints = self.waypoints.len(), "Waypoint cycle wrapped");
        }

        // Dispatch runs outside the snapshot lock; skip whatever a stop has
        // already overtaken
        if let Some(dispatch) = &self.dispatch {
            if !self.cancellation.is_cancelled() {
                dispatch.listeners.notify_position_changed(&snapshot);
            }
            if !self.cancellation.is_cancelled() {
                dispatch.notifier.notify_changed(Arc::clone(&snapshot));
            }
        }

        Some(snapshot)
    }

    /// Spawn the tick loop on `runtime`.
    ///
    /// The task exits once the sampler's cancellation token fires.
    pub fn spawn(self, period: Duration, runtime: &Handle) -> JoinHandle<()> {
        runtime.spawn(self.run(period))
    }

    async fn run(mut self, period: Duration) {
        let cancellation = self.cancellation.clone();
        let mut ticker = tokio::time::interval(period.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::debug!(
            period_ms = period.as_millis() as u64,
            waypoints = self.waypoints.len(),
            "Position sampler started"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancellation.cancelled() => break,
                _ = ticker.tick() => {
                    if self.tick().is_none() {
                        break;
                    }
                }
            }
        }

        tracing::debug!("Position sampler stopped");
    }
}
