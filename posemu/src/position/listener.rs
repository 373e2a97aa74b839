//! Listener registry.
//!
//! Observers register under a string id; registering again under the same id
//! replaces the previous listener. Dispatch copies the current listener set
//! out of the map before calling anyone, so listeners may register or
//! unregister (even themselves) from inside a callback. A listener that
//! panics is logged and skipped; the rest still run.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use dashmap::DashMap;

use super::state::PositionSnapshot;

/// Observer of position changes.
pub trait PositionListener: Send + Sync {
    /// Called with each newly published snapshot.
    fn on_position_changed(&self, snapshot: &PositionSnapshot);
}

impl<F> PositionListener for F
where
    F: Fn(&PositionSnapshot) + Send + Sync,
{
    fn on_position_changed(&self, snapshot: &PositionSnapshot) {
        self(snapshot)
    }
}

/// Keyed set of position listeners.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: DashMap<String, Arc<dyn PositionListener>>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` under `id`, returning the listener it replaced.
    pub fn register(
        &self,
        id: impl Into<String>,
        listener: Arc<dyn PositionListener>,
    ) -> Option<Arc<dyn PositionListener>> {
        let id = id.into();
        tracing::debug!(listener_id = %id, "Registering position listener");
        self.listeners.insert(id, listener)
    }

    /// Remove the listener under `id`.
    ///
    /// Unknown ids are ignored. Returns true if a listener was removed.
    pub fn unregister(&self, id: &str) -> bool {
        let removed = self.listeners.remove(id).is_some();
        if removed {
            tracing::debug!(listener_id = %id, "Unregistered position listener");
        }
        removed
    }

    /// Check whether a listener is registered under `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.listeners.contains_key(id)
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Check whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver `snapshot` to every registered listener.
    ///
    /// Returns the number of listeners that returned normally.
    pub fn notify_position_changed(&self, snapshot: &PositionSnapshot) -> usize {
        let targets: Vec<(String, Arc<dyn PositionListener>)> = self
            .listeners
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();

        let mut delivered = 0;
        for (id, listener) in &targets {
            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| listener.on_position_changed(snapshot)));
            match outcome {
                Ok(()) => delivered += 1,
                Err(payload) => tracing::error!(
                    listener_id = %id,
                    message = panic_message(payload.as_ref()),
                    "Position listener panicked"
                ),
            }
        }
        delivered
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::waypoint::GeoPoint;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn snapshot() -> PositionSnapshot {
        PositionSnapshot::from_waypoint(0, &GeoPoint::new(42.0, -71.0, 10.0), Utc::now())
    }

    fn counting_listener(counter: &Arc<AtomicUsize>) -> Arc<dyn PositionListener> {
        let counter = Arc::clone(counter);
        Arc::new(move |_: &PositionSnapshot| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_register_and_notify() {
        let registry = ListenerRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));

        assert!(registry.register("a", counting_listener(&calls)).is_none());
        assert!(registry.register("b", counting_listener(&calls)).is_none());

        assert_eq!(registry.notify_position_changed(&snapshot()), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_last_registration_wins() {
        let registry = ListenerRegistry::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        registry.register("gps", counting_listener(&first));
        assert!(registry.register("gps", counting_listener(&second)).is_some());
        assert_eq!(registry.len(), 1);

        registry.notify_position_changed(&snapshot());

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unregister() {
        let registry = ListenerRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        registry.register("gps", counting_listener(&calls));

        assert!(registry.unregister("gps"));
        assert!(!registry.contains("gps"));
        assert!(registry.is_empty());
        assert_eq!(registry.notify_position_changed(&snapshot()), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unregister_unknown_id_is_noop() {
        let registry = ListenerRegistry::new();
        assert!(!registry.unregister("never-registered"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_listener_can_unregister_itself_during_dispatch() {
        let registry = Arc::new(ListenerRegistry::new());
        let weak = Arc::downgrade(&registry);

        registry.register(
            "once",
            Arc::new(move |_: &PositionSnapshot| {
                if let Some(registry) = weak.upgrade() {
                    registry.unregister("once");
                }
            }),
        );

        assert_eq!(registry.notify_position_changed(&snapshot()), 1);
        assert!(!registry.contains("once"));
    }

    #[test]
    fn test_panicking_listener_does_not_stop_others() {
        let registry = ListenerRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        registry.register("broken", Arc::new(|_: &PositionSnapshot| panic!("listener failure")));
        registry.register("counter", counting_listener(&calls));

        assert_eq!(registry.notify_position_changed(&snapshot()), 1);
        assert_eq!(registry.notify_position_changed(&snapshot()), 1);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(registry.contains("broken"));
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("static text");
        assert_eq!(panic_message(payload.as_ref()), "static text");

        let payload: Box<dyn Any + Send> = Box::new(format!("index {}", 3));
        assert_eq!(panic_message(payload.as_ref()), "index 3");

        let payload: Box<dyn Any + Send> = Box::new(42_u32);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }

    #[test]
    fn test_listener_receives_snapshot() {
        let registry = ListenerRegistry::new();
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        registry.register(
            "recorder",
            Arc::new(move |s: &PositionSnapshot| sink.lock().push(s.nmea.latitude)),
        );
        registry.notify_position_changed(&snapshot());

        assert_eq!(*seen.lock(), vec![42.0]);
    }
}
