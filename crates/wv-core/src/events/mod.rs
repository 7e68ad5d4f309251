use std::sync::Arc;
use parking_lot::Mutex;
use ahash::AHashMap;

/// Dashboard-wide event bus
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<std::any::TypeId, Vec<Box<dyn EventHandler>>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Dashboard events
pub mod events {
    use super::Event;
    use crate::model::Mode;
    use crate::navigation::Range;

    /// Dataset arrived and was stored
    #[derive(Debug, Clone)]
    pub struct DatasetLoaded {
        pub source_name: String,
        pub solar_points: usize,
        pub wind_points: usize,
    }

    /// Dataset could not be loaded; the dashboard stays empty
    #[derive(Debug, Clone)]
    pub struct DatasetLoadFailed {
        pub source_name: String,
        pub error: String,
    }

    /// Display mode switched
    #[derive(Debug, Clone)]
    pub struct ModeChanged {
        pub from: Mode,
        pub to: Mode,
    }

    /// Either handle moved, or the range was reset
    #[derive(Debug, Clone)]
    pub struct RangeChanged {
        pub range: Range,
    }

    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(
        DatasetLoaded,
        DatasetLoadFailed,
        ModeChanged,
        RangeChanged
    );
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();
        handlers.entry(type_id).or_insert_with(Vec::new).push(handler);
    }

    /// Publish an event to every handler subscribed to its type.
    ///
    /// Handlers run with the registry unlocked, so they may publish or
    /// subscribe themselves. An event of the same type published from
    /// inside one of its own handlers is not delivered to that handler set.
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = std::any::TypeId::of::<E>();
        let Some(mut running) = self.handlers.lock().remove(&type_id) else {
            return;
        };

        for handler in running.iter_mut() {
            handler.handle(&event);
        }

        let mut handlers = self.handlers.lock();
        if let Some(added) = handlers.remove(&type_id) {
            running.extend(added);
        }
        handlers.insert(type_id, running);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Adapter turning a closure into an event handler
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::events::{ModeChanged, RangeChanged};
    use crate::model::Mode;
    use crate::navigation::Range;

    #[test]
    fn test_publish_reaches_matching_handlers_only() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        bus.subscribe::<ModeChanged>(handler_from_fn(move |event| {
            if let Some(changed) = event.as_any().downcast_ref::<ModeChanged>() {
                sink.lock().push(changed.to);
            }
        }));

        bus.publish(ModeChanged { from: Mode::Combined, to: Mode::Wind });
        bus.publish(RangeChanged { range: Range::new(0, 1) });

        assert_eq!(*seen.lock(), vec![Mode::Wind]);
    }

    #[test]
    fn test_handler_may_publish_and_subscribe() {
        let bus = Arc::new(EventBus::new());
        let ranges = Arc::new(Mutex::new(Vec::new()));

        let sink = ranges.clone();
        bus.subscribe::<RangeChanged>(handler_from_fn(move |event| {
            if let Some(changed) = event.as_any().downcast_ref::<RangeChanged>() {
                sink.lock().push(changed.range);
            }
        }));

        let inner = Arc::downgrade(&bus);
        bus.subscribe::<ModeChanged>(handler_from_fn(move |_| {
            if let Some(bus) = inner.upgrade() {
                bus.publish(RangeChanged { range: Range::new(0, 24) });
                bus.subscribe::<ModeChanged>(handler_from_fn(|_| {}));
            }
        }));

        bus.publish(ModeChanged { from: Mode::Solar, to: Mode::Wind });

        assert_eq!(*ranges.lock(), vec![Range::new(0, 24)]);
        assert_eq!(bus.handlers.lock()[&std::any::TypeId::of::<ModeChanged>()].len(), 2);
    }
}
