//! Position service facade.
//!
//! [`PositionService`] owns everything one emulated receiver needs: the
//! waypoint store, the snapshot slot, the listener registry and the handle on
//! the running sampler. There are no globals; two services never share state.
//!
//! # Lifecycle
//!
//! ```text
//!            start()              load ok + scheduled
//! Stopped ──────────► Starting ─────────────────────► Running
//!    ▲                   │ load failed                  │
//!    └───────────────────┘                              │
//!    ▲                          stop()                  │
//!    └──────────────────────────────────────────────────┘
//! ```
//!
//! Calling `start()` while running reloads the track and restarts the cycle
//! at the first waypoint.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use super::error::ServiceError;
use super::listener::{ListenerRegistry, PositionListener};
use super::notifier::{EventNotifier, EventPublisher};
use super::provider::PositionProvider;
use super::resource::{BundledTracks, DirectoryResourceProvider, Location, ResourceProvider};
use super::sampler::{PositionSampler, DEFAULT_SAMPLE_INTERVAL};
use super::snapshot::SnapshotState;
use super::state::{NmeaPosition, Position, PositionSnapshot, ServiceState};
use super::waypoint::WaypointStore;
use crate::config::PositionSettings;

/// Static configuration of a position service.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionServiceConfig {
    /// Name of the track resource to replay.
    pub resource: String,

    /// Time between sampler ticks.
    pub sample_interval: Duration,

    /// Deliver every tick to registered listeners and post a
    /// `PositionEvent::Changed`.
    pub dispatch_listeners: bool,
}

impl Default for PositionServiceConfig {
    fn default() -> Self {
        Self::for_location(Location::default())
    }
}

impl PositionServiceConfig {
    /// Configuration replaying a bundled location at the default cadence.
    pub fn for_location(location: Location) -> Self {
        Self::for_resource(location.resource_name())
    }

    /// Configuration replaying a named resource at the default cadence.
    pub fn for_resource(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            dispatch_listeners: false,
        }
    }

    /// Set the time between ticks.
    pub fn with_sample_interval(mut self, interval: Duration) -> Self {
        self.sample_interval = interval;
        self
    }

    /// Enable or disable per-tick listener dispatch.
    pub fn with_dispatch_listeners(mut self, enabled: bool) -> Self {
        self.dispatch_listeners = enabled;
        self
    }

    /// Build from the `[position]` section of the config file.
    pub fn from_settings(settings: &PositionSettings) -> Self {
        Self::for_location(settings.location)
            .with_sample_interval(Duration::from_secs(settings.interval_secs))
            .with_dispatch_listeners(settings.dispatch_listeners)
    }
}

/// Options pushed by the hosting component on configuration changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionServiceOptions {
    /// Request the gpsd-backed receiver mode.
    ///
    /// Recorded and reported only; this service always replays waypoints.
    pub use_gpsd: bool,
}

/// Point-in-time view of the service.
#[derive(Debug, Clone)]
pub struct PositionServiceStatus {
    /// Lifecycle state.
    pub state: ServiceState,

    /// Lock status (true only while running).
    pub locked: bool,

    /// Waypoints in the replayed track, while running.
    pub waypoint_count: Option<usize>,

    /// Latest snapshot, retained across stops.
    pub snapshot: Option<Arc<PositionSnapshot>>,

    /// Current options.
    pub options: PositionServiceOptions,
}

/// Handle on a scheduled sampler.
struct RunningSampler {
    cancellation: CancellationToken,
}

/// State readers see without touching the start/stop lock.
#[derive(Debug, Clone, Copy, Default)]
struct Lifecycle {
    state: ServiceState,
    waypoint_count: Option<usize>,
}

/// Emulated position receiver.
pub struct PositionService {
    config: PositionServiceConfig,
    store: WaypointStore,
    notifier: EventNotifier,
    snapshots: Arc<SnapshotState>,
    listeners: Arc<ListenerRegistry>,
    lifecycle: RwLock<Lifecycle>,
    /// Serializes start/stop and holds the active sampler.
    running: Mutex<Option<RunningSampler>>,
    options: RwLock<PositionServiceOptions>,
}

impl PositionService {
    /// Create a stopped service.
    pub fn new(
        config: PositionServiceConfig,
        store: WaypointStore,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            config,
            store,
            notifier: EventNotifier::new(publisher),
            snapshots: Arc::new(SnapshotState::new()),
            listeners: Arc::new(ListenerRegistry::new()),
            lifecycle: RwLock::new(Lifecycle::default()),
            running: Mutex::new(None),
            options: RwLock::new(PositionServiceOptions::default()),
        }
    }

    /// Create a stopped service from the `[position]` config section.
    ///
    /// Tracks come from `track_dir` when set, otherwise from the bundled
    /// tracks.
    pub fn from_settings(settings: &PositionSettings, publisher: Arc<dyn EventPublisher>) -> Self {
        let provider: Arc<dyn ResourceProvider> = match settings.track_dir.as_deref() {
            Some(dir) => {
                let directory = DirectoryResourceProvider::new(dir);
                tracing::debug!(track_dir = %directory.root().display(), "Using track directory");
                Arc::new(directory)
            }
            None => Arc::new(BundledTracks),
        };
        let service = Self::new(
            PositionServiceConfig::from_settings(settings),
            WaypointStore::gpx(provider),
            publisher,
        );
        *service.options.write() = PositionServiceOptions {
            use_gpsd: settings.use_gpsd,
        };
        service
    }

    /// The service configuration.
    pub fn config(&self) -> &PositionServiceConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ServiceState {
        self.lifecycle.read().state
    }

    /// Current options.
    pub fn options(&self) -> PositionServiceOptions {
        *self.options.read()
    }

    /// Latest snapshot, if any tick has run.
    pub fn snapshot(&self) -> Option<Arc<PositionSnapshot>> {
        self.snapshots.latest()
    }

    /// Full status for display.
    pub fn status(&self) -> PositionServiceStatus {
        let Lifecycle {
            state,
            waypoint_count,
        } = *self.lifecycle.read();
        PositionServiceStatus {
            state,
            locked: state == ServiceState::Running,
            waypoint_count,
            snapshot: self.snapshots.latest(),
            options: self.options(),
        }
    }

    /// Load the track, schedule the sampler and announce the lock.
    ///
    /// Must be called from within a tokio runtime. Blocks while the track is
    /// read. On failure the service is left as it was: a stopped service
    /// stays stopped, a running one keeps replaying its current track.
    ///
    /// The lock event is posted after the start/stop lock is released, so an
    /// [`EventPublisher`] may call back into the service.
    pub fn start(&self) -> Result<(), ServiceError> {
        let mut running = self.running.lock();
        let runtime = Handle::try_current().map_err(|_| ServiceError::RuntimeUnavailable)?;
        let restarting = running.is_some();

        if !restarting {
            self.set_lifecycle(ServiceState::Starting, None);
        }
        tracing::info!(
            resource = %self.config.resource,
            interval_ms = self.config.sample_interval.as_millis() as u64,
            restarting,
            "Starting position service"
        );

        let waypoints = match self.store.load(&self.config.resource) {
            Ok(waypoints) => waypoints,
            Err(e) => {
                tracing::warn!(resource = %self.config.resource, error = %e, "Failed to load waypoints");
                if !restarting {
                    self.set_lifecycle(ServiceState::Stopped, None);
                }
                return Err(e.into());
            }
        };

        if let Some(previous) = running.take() {
            self.cancel(previous);
        }

        let cancellation = CancellationToken::new();
        let waypoint_count = waypoints.len();
        let mut sampler =
            PositionSampler::new(waypoints, Arc::clone(&self.snapshots), cancellation.clone());
        if self.config.dispatch_listeners {
            sampler = sampler.with_dispatch(Arc::clone(&self.listeners), self.notifier.clone());
        }
        *running = Some(RunningSampler { cancellation });
        self.set_lifecycle(ServiceState::Running, Some(waypoint_count));
        drop(running);

        // Lock goes out before the first tick can post a change
        self.notifier.notify_locked();

        // The task is detached; the token is the only handle needed to stop
        // it. A stop that lands before this spawn leaves it already cancelled.
        drop(sampler.spawn(self.config.sample_interval, &runtime));
        tracing::info!(waypoints = waypoint_count, "Position service running");
        Ok(())
    }

    /// Cancel the sampler.
    ///
    /// When this returns no further snapshot will be published. With listener
    /// dispatch on, a tick that published just before the cancel may still
    /// be delivering that snapshot to listeners. Stopping a stopped service
    /// does nothing.
    pub fn stop(&self) {
        let mut running = self.running.lock();
        match running.take() {
            Some(sampler) => {
                self.cancel(sampler);
                self.set_lifecycle(ServiceState::Stopped, None);
                tracing::info!("Position service stopped");
            }
            None => tracing::debug!("Stop requested while position service already stopped"),
        }
    }

    /// Host hook: apply options and start.
    pub fn activate(&self, options: PositionServiceOptions) -> Result<(), ServiceError> {
        self.update_configuration(options);
        self.start()
    }

    /// Host hook: stop.
    pub fn deactivate(&self) {
        self.stop();
    }

    /// Host hook: apply new options without restarting.
    pub fn update_configuration(&self, options: PositionServiceOptions) {
        *self.options.write() = options;
        if options.use_gpsd {
            tracing::info!("gpsd mode requested; continuing to replay waypoints");
        } else {
            tracing::debug!("Position service options updated");
        }
    }

    /// Register a listener under `id`, replacing any previous one.
    pub fn register_listener(&self, id: impl Into<String>, listener: Arc<dyn PositionListener>) {
        self.listeners.register(id, listener);
    }

    /// Remove the listener under `id`. Unknown ids are ignored.
    pub fn unregister_listener(&self, id: &str) {
        self.listeners.unregister(id);
    }

    /// The listener registry.
    pub fn listeners(&self) -> &Arc<ListenerRegistry> {
        &self.listeners
    }

    fn set_lifecycle(&self, state: ServiceState, waypoint_count: Option<usize>) {
        *self.lifecycle.write() = Lifecycle {
            state,
            waypoint_count,
        };
    }

    fn cancel(&self, sampler: RunningSampler) {
        sampler.cancellation.cancel();
        self.snapshots.fence();
    }
}

impl PositionProvider for PositionService {
    fn position(&self) -> Option<Position> {
        self.snapshots.latest().map(|s| s.position)
    }

    fn nmea_position(&self) -> Option<NmeaPosition> {
        self.snapshots.latest().map(|s| s.nmea)
    }

    fn nmea_time(&self) -> Option<String> {
        self.snapshots.latest().map(|s| s.timestamp())
    }

    fn nmea_date(&self) -> Option<String> {
        self.snapshots.latest().map(|s| s.timestamp())
    }

    fn is_locked(&self) -> bool {
        self.state() == ServiceState::Running
    }

    fn last_sentence(&self) -> Option<String> {
        // Replayed waypoints have no raw sentences
        None
    }
}

impl Drop for PositionService {
    fn drop(&mut self) {
        if let Some(sampler) = self.running.get_mut().take() {
            sampler.cancellation.cancel();
        }
    }
}

impl std::fmt::Debug for PositionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionService")
            .field("config", &self.config)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
