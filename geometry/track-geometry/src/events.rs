//! Change notifications for track geometry.
//!
//! Consumers that cache data derived from a track (minimaps, AI racing
//! lines, camera rails) subscribe to be told when the track's shape changes
//! or the track goes away. A subscription is released when its
//! [`TrackSubscription`] handle is dropped.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Something that happened to a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackEvent {
    /// The authored curve changed. Derived data is stale until
    /// [`TrackGeometry::rederive`](crate::TrackGeometry::rederive) runs.
    Dirty,
    /// The track is being dropped.
    Destroyed,
}

type Listener = Rc<RefCell<dyn FnMut(TrackEvent)>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Listener list owned by a track.
#[derive(Default)]
pub struct TrackEvents {
    registry: Rc<RefCell<Registry>>,
}

impl TrackEvents {
    /// Create an empty listener list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`. It stays registered until the returned handle
    /// is dropped or released.
    #[must_use = "dropping the subscription immediately unsubscribes"]
    pub fn subscribe<F>(&self, listener: F) -> TrackSubscription
    where
        F: FnMut(TrackEvent) + 'static,
    {
        let listener: Listener = Rc::new(RefCell::new(listener));
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, listener));

        TrackSubscription {
            registry: Rc::downgrade(&self.registry),
            id,
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }

    /// Deliver `event` to every current listener.
    ///
    /// Listeners may subscribe or unsubscribe while being notified; such
    /// changes take effect from the next event. A listener that re-enters
    /// `emit` is not called recursively.
    pub fn emit(&self, event: TrackEvent) {
        let listeners: Vec<Listener> = match self.registry.try_borrow() {
            Ok(registry) => registry.listeners.iter().map(|(_, l)| Rc::clone(l)).collect(),
            Err(_) => return,
        };

        for listener in listeners {
            if let Ok(mut callback) = listener.try_borrow_mut() {
                (*callback)(event);
            }
        }
    }
}

impl fmt::Debug for TrackEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackEvents")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Handle for a registered listener.
///
/// Dropping the handle unsubscribes. Handles outliving their track are
/// inert.
#[derive(Debug)]
pub struct TrackSubscription {
    registry: Weak<RefCell<Registry>>,
    id: u64,
}

impl TrackSubscription {
    /// Whether the listener is still registered with a live track.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.registry.upgrade().is_some_and(|registry| {
            registry
                .try_borrow()
                .map(|r| r.listeners.iter().any(|(id, _)| *id == self.id))
                .unwrap_or(true)
        })
    }

    /// Unsubscribe now.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for TrackSubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if let Ok(mut registry) = registry.try_borrow_mut() {
                registry.listeners.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_reaches_subscribers() {
        let events = TrackEvents::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let _sub = events.subscribe(move |e| sink.borrow_mut().push(e));

        events.emit(TrackEvent::Dirty);
        events.emit(TrackEvent::Destroyed);
        assert_eq!(*seen.borrow(), vec![TrackEvent::Dirty, TrackEvent::Destroyed]);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let events = TrackEvents::new();
        let count = Rc::new(RefCell::new(0));

        let sink = Rc::clone(&count);
        let sub = events.subscribe(move |_| *sink.borrow_mut() += 1);
        assert!(sub.is_active());
        assert_eq!(events.listener_count(), 1);

        events.emit(TrackEvent::Dirty);
        sub.release();
        events.emit(TrackEvent::Dirty);

        assert_eq!(*count.borrow(), 1);
        assert_eq!(events.listener_count(), 0);
    }

    #[test]
    fn test_subscription_outliving_events() {
        let events = TrackEvents::new();
        let sub = events.subscribe(|_| {});
        drop(events);
        assert!(!sub.is_active());
        drop(sub);
    }

    #[test]
    fn test_independent_subscribers() {
        let events = TrackEvents::new();
        let a = Rc::new(RefCell::new(0));
        let b = Rc::new(RefCell::new(0));

        let sink_a = Rc::clone(&a);
        let sub_a = events.subscribe(move |_| *sink_a.borrow_mut() += 1);
        let sink_b = Rc::clone(&b);
        let _sub_b = events.subscribe(move |_| *sink_b.borrow_mut() += 1);

        events.emit(TrackEvent::Dirty);
        drop(sub_a);
        events.emit(TrackEvent::Dirty);

        assert_eq!(*a.borrow(), 1);
        assert_eq!(*b.borrow(), 2);
    }
}
