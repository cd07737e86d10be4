// Publish/subscribe event bus
//
// Single-threaded fan-out keyed by topic. The bus is a cheap handle around a
// shared registry: clone it into whatever needs to emit or subscribe.
// Listeners stay registered for as long as their `Subscription` lives.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::rc::{Rc, Weak};

/// An event that can be routed through an [`EventBus`]
pub trait Event: 'static {
    type Topic: Copy + Eq + Hash + fmt::Debug;

    fn topic(&self) -> Self::Topic;
}

/// Identifies one registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<E> = Rc<dyn Fn(&E)>;

struct Listener<E> {
    id: SubscriptionId,
    handler: Handler<E>,
}

struct Registry<E: Event> {
    next_id: u64,
    topics: HashMap<E::Topic, Vec<Listener<E>>>,
}

impl<E: Event> Registry<E> {
    fn remove(&mut self, topic: E::Topic, id: SubscriptionId) -> bool {
        let Some(listeners) = self.topics.get_mut(&topic) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|listener| listener.id != id);
        let removed = listeners.len() != before;
        if listeners.is_empty() {
            self.topics.remove(&topic);
        }
        removed
    }
}

/// Shared handle to a topic-keyed listener registry
pub struct EventBus<E: Event> {
    registry: Rc<RefCell<Registry<E>>>,
}

impl<E: Event> EventBus<E> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                topics: HashMap::new(),
            })),
        }
    }

    /// Register `handler` for `topic`
    ///
    /// The handler is removed when the returned [`Subscription`] is dropped
    /// or cancelled.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, topic: E::Topic, handler: F) -> Subscription<E>
    where
        F: Fn(&E) + 'static,
    {
        let mut registry = self.registry.borrow_mut();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.topics.entry(topic).or_default().push(Listener {
            id,
            handler: Rc::new(handler),
        });
        log::trace!("subscribed {:?} to {:?}", id, topic);

        Subscription {
            id,
            topic,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Deliver `event` to every listener of its topic, in subscription order
    ///
    /// Listeners are snapshotted before delivery: subscriptions added or
    /// removed by a handler take effect from the next emit. Returns the
    /// number of listeners notified.
    pub fn emit(&self, event: E) -> usize {
        let topic = event.topic();
        let handlers: Vec<Handler<E>> = self
            .registry
            .borrow()
            .topics
            .get(&topic)
            .map(|listeners| {
                listeners
                    .iter()
                    .map(|listener| Rc::clone(&listener.handler))
                    .collect()
            })
            .unwrap_or_default();

        log::trace!("emit {:?} to {} listener(s)", topic, handlers.len());
        for handler in &handlers {
            handler(&event);
        }
        handlers.len()
    }

    /// Number of listeners currently registered for `topic`
    pub fn listener_count(&self, topic: E::Topic) -> usize {
        self.registry
            .borrow()
            .topics
            .get(&topic)
            .map_or(0, Vec::len)
    }
}

impl<E: Event> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<E: Event> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.borrow();
        f.debug_struct("EventBus")
            .field("topics", &registry.topics.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Keeps one listener registered; unsubscribes on drop
pub struct Subscription<E: Event> {
    id: SubscriptionId,
    topic: E::Topic,
    registry: Weak<RefCell<Registry<E>>>,
}

impl<E: Event> Subscription<E> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn topic(&self) -> E::Topic {
        self.topic
    }

    /// Unsubscribe now. Equivalent to dropping the handle.
    pub fn cancel(self) {}
}

impl<E: Event> Drop for Subscription<E> {
    fn drop(&mut self) {
        // The bus may already be gone
        if let Some(registry) = self.registry.upgrade() {
            if registry.borrow_mut().remove(self.topic, self.id) {
                log::trace!("unsubscribed {:?} from {:?}", self.id, self.topic);
            }
        }
    }
}

impl<E: Event> fmt::Debug for Subscription<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("topic", &self.topic)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug, Clone, PartialEq)]
    enum Ping {
        Score(u32),
        Reset,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum PingTopic {
        Score,
        Reset,
    }

    impl Event for Ping {
        type Topic = PingTopic;

        fn topic(&self) -> PingTopic {
            match self {
                Ping::Score(_) => PingTopic::Score,
                Ping::Reset => PingTopic::Reset,
            }
        }
    }

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&str) -> Box<dyn Fn(&Ping)>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let make = move |name: &str| -> Box<dyn Fn(&Ping)> {
            let sink = Rc::clone(&sink);
            let name = name.to_string();
            Box::new(move |event: &Ping| sink.borrow_mut().push(format!("{name}:{event:?}")))
        };
        (log, make)
    }

    #[test]
    fn test_emit_without_listeners() {
        let bus: EventBus<Ping> = EventBus::new();
        assert_eq!(bus.emit(Ping::Reset), 0);
    }

    #[test]
    fn test_listeners_called_in_subscription_order() {
        let bus: EventBus<Ping> = EventBus::new();
        let (log, make) = recorder();
        let _a = bus.subscribe(PingTopic::Score, make("a"));
        let _b = bus.subscribe(PingTopic::Score, make("b"));
        let _c = bus.subscribe(PingTopic::Reset, make("c"));

        assert_eq!(bus.emit(Ping::Score(3)), 2);
        assert_eq!(*log.borrow(), vec!["a:Score(3)", "b:Score(3)"]);
    }

    #[test]
    fn test_each_listener_notified_once_per_emit() {
        let bus: EventBus<Ping> = EventBus::new();
        let hits = Rc::new(Cell::new(0));
        let first = Rc::clone(&hits);
        let second = Rc::clone(&hits);
        let _a = bus.subscribe(PingTopic::Reset, move |_| first.set(first.get() + 1));
        let _b = bus.subscribe(PingTopic::Reset, move |_| second.set(second.get() + 10));

        bus.emit(Ping::Reset);
        bus.emit(Ping::Reset);
        assert_eq!(hits.get(), 22);
    }

    #[test]
    fn test_drop_unsubscribes_only_that_listener() {
        let bus: EventBus<Ping> = EventBus::new();
        let (log, make) = recorder();
        let a = bus.subscribe(PingTopic::Score, make("a"));
        let _b = bus.subscribe(PingTopic::Score, make("b"));

        drop(a);
        assert_eq!(bus.listener_count(PingTopic::Score), 1);

        bus.emit(Ping::Score(1));
        assert_eq!(*log.borrow(), vec!["b:Score(1)"]);
    }

    #[test]
    fn test_cancel_stops_delivery() {
        let bus: EventBus<Ping> = EventBus::new();
        let (log, make) = recorder();
        let sub = bus.subscribe(PingTopic::Reset, make("a"));
        bus.emit(Ping::Reset);
        sub.cancel();
        bus.emit(Ping::Reset);

        assert_eq!(log.borrow().len(), 1);
        assert_eq!(bus.listener_count(PingTopic::Reset), 0);
    }

    #[test]
    fn test_subscription_ids_are_unique() {
        let bus: EventBus<Ping> = EventBus::new();
        let a = bus.subscribe(PingTopic::Reset, |_| {});
        let b = bus.subscribe(PingTopic::Reset, |_| {});
        assert_ne!(a.id(), b.id());
        assert_eq!(a.topic(), PingTopic::Reset);
    }

    #[test]
    fn test_emit_uses_snapshot_of_listeners() {
        let bus: EventBus<Ping> = EventBus::new();
        let late_hits = Rc::new(Cell::new(0));
        let held: Rc<RefCell<Vec<Subscription<Ping>>>> = Rc::new(RefCell::new(Vec::new()));

        let inner_bus = bus.clone();
        let inner_hits = Rc::clone(&late_hits);
        let inner_held = Rc::clone(&held);
        let _adder = bus.subscribe(PingTopic::Score, move |_| {
            let hits = Rc::clone(&inner_hits);
            let sub = inner_bus.subscribe(PingTopic::Score, move |_| hits.set(hits.get() + 1));
            inner_held.borrow_mut().push(sub);
        });

        // The listener added mid-emit is not part of this delivery
        assert_eq!(bus.emit(Ping::Score(1)), 1);
        assert_eq!(late_hits.get(), 0);

        assert_eq!(bus.emit(Ping::Score(2)), 2);
        assert_eq!(late_hits.get(), 1);
    }

    #[test]
    fn test_subscription_outliving_bus() {
        let bus: EventBus<Ping> = EventBus::new();
        let sub = bus.subscribe(PingTopic::Reset, |_| {});
        drop(bus);
        drop(sub);
    }

    #[test]
    fn test_clones_share_listeners() {
        let bus: EventBus<Ping> = EventBus::new();
        let other = bus.clone();
        let (log, make) = recorder();
        let _a = bus.subscribe(PingTopic::Reset, make("a"));

        assert_eq!(other.emit(Ping::Reset), 1);
        assert_eq!(log.borrow().len(), 1);
    }
}
