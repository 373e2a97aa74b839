//! Position events and their publication.
//!
//! The service announces a lock once per successful start. Publishers decide
//! where events go; [`BroadcastEventPublisher`] fans them out over a tokio
//! broadcast channel and [`NoOpEventPublisher`] drops them.

use std::sync::Arc;

use tokio::sync::broadcast;

use super::state::PositionSnapshot;

/// Event topic for the lock announcement.
pub const TOPIC_LOCKED: &str = "posemu/position/LOCKED";

/// Event topic for per-tick position changes.
pub const TOPIC_CHANGED: &str = "posemu/position/CHANGED";

/// Notification emitted by the position service.
#[derive(Debug, Clone)]
pub enum PositionEvent {
    /// The service has a position fix. Carries no payload.
    Locked,
    /// A new snapshot was published.
    Changed(Arc<PositionSnapshot>),
}

impl PositionEvent {
    /// Topic string identifying the event kind.
    pub fn topic(&self) -> &'static str {
        match self {
            Self::Locked => TOPIC_LOCKED,
            Self::Changed(_) => TOPIC_CHANGED,
        }
    }
}

/// Accepts events for delivery to external subscribers.
///
/// Posting must not block; the service posts from its lifecycle calls.
pub trait EventPublisher: Send + Sync {
    /// Post a single event.
    fn post_event(&self, event: PositionEvent);
}

/// Publisher backed by a tokio broadcast channel.
#[derive(Debug, Clone)]
pub struct BroadcastEventPublisher {
    tx: broadcast::Sender<PositionEvent>,
}

impl BroadcastEventPublisher {
    /// Create a publisher with its own channel of the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Create a publisher that sends on an existing channel.
    pub fn from_sender(tx: broadcast::Sender<PositionEvent>) -> Self {
        Self { tx }
    }

    /// Subscribe to events posted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<PositionEvent> {
        self.tx.subscribe()
    }
}

impl EventPublisher for BroadcastEventPublisher {
    fn post_event(&self, event: PositionEvent) {
        let topic = event.topic();
        // No receivers is not an error; nobody is listening yet
        let receivers = self.tx.send(event).unwrap_or(0);
        tracing::trace!(topic, receivers, "Posted position event");
    }
}

/// Publisher that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpEventPublisher;

impl EventPublisher for NoOpEventPublisher {
    fn post_event(&self, _event: PositionEvent) {}
}

/// Posts lock and position-change events through an [`EventPublisher`].
#[derive(Clone)]
pub struct EventNotifier {
    publisher: Arc<dyn EventPublisher>,
}

impl EventNotifier {
    /// Create a notifier posting to `publisher`.
    pub fn new(publisher: Arc<dyn EventPublisher>) -> Self {
        Self { publisher }
    }

    /// Post the lock event.
    pub fn notify_locked(&self) {
        tracing::debug!(topic = TOPIC_LOCKED, "Posting position locked event");
        self.publisher.post_event(PositionEvent::Locked);
    }

    /// Post a position change.
    pub fn notify_changed(&self, snapshot: Arc<PositionSnapshot>) {
        self.publisher.post_event(PositionEvent::Changed(snapshot));
    }
}

impl std::fmt::Debug for EventNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventNotifier").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::waypoint::GeoPoint;
    use chrono::Utc;

    #[test]
    fn test_event_topics() {
        assert_eq!(PositionEvent::Locked.topic(), TOPIC_LOCKED);
        let snapshot = Arc::new(PositionSnapshot::from_waypoint(
            0,
            &GeoPoint::new(0.0, 0.0, 0.0),
            Utc::now(),
        ));
        assert_eq!(PositionEvent::Changed(snapshot).topic(), TOPIC_CHANGED);
    }

    #[test]
    fn test_broadcast_delivers_lock() {
        let publisher = Arc::new(BroadcastEventPublisher::new(4));
        let mut rx = publisher.subscribe();
        let notifier = EventNotifier::new(publisher);

        notifier.notify_locked();

        let event = rx.try_recv().expect("Should receive lock event");
        assert!(matches!(event, PositionEvent::Locked));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_broadcast_without_subscribers_does_not_fail() {
        let publisher = BroadcastEventPublisher::new(4);
        publisher.post_event(PositionEvent::Locked);
    }

    #[test]
    fn test_from_sender_shares_channel() {
        let (tx, mut rx) = broadcast::channel(4);
        let publisher = BroadcastEventPublisher::from_sender(tx);

        publisher.post_event(PositionEvent::Locked);

        assert!(matches!(rx.try_recv(), Ok(PositionEvent::Locked)));
    }

    #[test]
    fn test_noop_publisher() {
        let notifier = EventNotifier::new(Arc::new(NoOpEventPublisher));
        notifier.notify_locked();
    }
}
