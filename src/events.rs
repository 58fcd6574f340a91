//! Synchronous observer registry
//!
//! The game and each player own an `EventBus`. Handlers are registered per
//! event kind together with a bound argument, and run in registration order
//! every time an event of that kind is triggered. Dispatch is a direct call
//! chain: a handler may bind, unbind or trigger on the very bus that is
//! calling it, and nested triggers run to completion before the outer one
//! continues.

use crate::Result;
use rustc_hash::FxHashMap;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

/// An event that can be dispatched through an `EventBus`
pub trait Event {
    /// Closed set of event kinds handlers subscribe to
    type Kind: Copy + Eq + Hash + fmt::Debug;

    fn kind(&self) -> Self::Kind;
}

/// Shared handler callable. Receives its bound argument first, then the event.
///
/// Handlers are compared by pointer identity, so keep a clone of the `Rc`
/// around if you intend to `unbind` it later.
pub type Handler<E, B> = Rc<dyn Fn(&B, &E) -> Result<()>>;

/// Wrap a closure into a `Handler`
pub fn handler<E, B, F>(f: F) -> Handler<E, B>
where
    F: Fn(&B, &E) -> Result<()> + 'static,
{
    Rc::new(f)
}

struct Binding<E, B> {
    serial: u64,
    handler: Handler<E, B>,
    bound: B,
    once: bool,
}

impl<E, B: Clone> Clone for Binding<E, B> {
    fn clone(&self) -> Self {
        Binding {
            serial: self.serial,
            handler: Rc::clone(&self.handler),
            bound: self.bound.clone(),
            once: self.once,
        }
    }
}

/// Ordered, re-entrant publish/subscribe registry
pub struct EventBus<E: Event, B = ()> {
    bindings: RefCell<FxHashMap<E::Kind, Vec<Binding<E, B>>>>,
    next_serial: Cell<u64>,
}

impl<E: Event, B: Clone> EventBus<E, B> {
    pub fn new() -> Self {
        EventBus {
            bindings: RefCell::new(FxHashMap::default()),
            next_serial: Cell::new(0),
        }
    }

    /// Register a persistent handler
    pub fn bind(&self, kind: E::Kind, handler: Handler<E, B>, bound: B) {
        self.push(kind, handler, bound, false);
    }

    /// Register a handler that is removed after it fires once
    pub fn bind_once(&self, kind: E::Kind, handler: Handler<E, B>, bound: B) {
        self.push(kind, handler, bound, true);
    }

    fn push(&self, kind: E::Kind, handler: Handler<E, B>, bound: B, once: bool) {
        let serial = self.next_serial.get();
        self.next_serial.set(serial + 1);
        self.bindings
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push(Binding {
                serial,
                handler,
                bound,
                once,
            });
    }

    /// Remove the first registration of `handler` for `kind`
    ///
    /// Returns whether a registration was removed.
    pub fn unbind(&self, kind: E::Kind, handler: &Handler<E, B>) -> bool {
        let mut bindings = self.bindings.borrow_mut();
        let Some(list) = bindings.get_mut(&kind) else {
            return false;
        };
        match list.iter().position(|b| Rc::ptr_eq(&b.handler, handler)) {
            Some(pos) => {
                list.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Dispatch `event` to every handler currently bound to its kind
    ///
    /// The handler list is snapshotted before dispatch, so handlers bound
    /// during this trigger only see later ones. A one-shot entry leaves the
    /// registry right before it runs; if a nested trigger or an `unbind`
    /// already removed it, it is skipped. The first handler error stops
    /// dispatch and is returned, and one-shot entries that did not run stay
    /// bound.
    pub fn trigger(&self, event: &E) -> Result<()> {
        let kind = event.kind();
        let snapshot = match self.bindings.borrow().get(&kind) {
            Some(list) => list.clone(),
            None => return Ok(()),
        };

        for binding in &snapshot {
            if binding.once && !self.take_once(kind, binding.serial) {
                continue;
            }
            (binding.handler)(&binding.bound, event)?;
        }
        Ok(())
    }

    /// Remove the one-shot entry with `serial`; false if it is already gone
    fn take_once(&self, kind: E::Kind, serial: u64) -> bool {
        let mut bindings = self.bindings.borrow_mut();
        let Some(list) = bindings.get_mut(&kind) else {
            return false;
        };
        match list.iter().position(|b| b.serial == serial) {
            Some(pos) => {
                list.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Number of handlers currently bound to `kind`
    pub fn handler_count(&self, kind: E::Kind) -> usize {
        self.bindings
            .borrow()
            .get(&kind)
            .map(|list| list.len())
            .unwrap_or(0)
    }

    /// Drop every registration
    pub fn clear(&self) {
        self.bindings.borrow_mut().clear();
    }
}

impl<E: Event, B: Clone> Default for EventBus<E, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event, B> fmt::Debug for EventBus<E, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bindings = self.bindings.borrow();
        let mut map = f.debug_map();
        for (kind, list) in bindings.iter() {
            let serials: Vec<u64> = list.iter().map(|b| b.serial).collect();
            map.entry(kind, &serials);
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameError;

    #[derive(Debug, Clone, PartialEq)]
    enum TestEvent {
        X(i32),
        Y,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestKind {
        X,
        Y,
    }

    impl Event for TestEvent {
        type Kind = TestKind;

        fn kind(&self) -> TestKind {
            match self {
                TestEvent::X(_) => TestKind::X,
                TestEvent::Y => TestKind::Y,
            }
        }
    }

    type Calls = Rc<RefCell<Vec<String>>>;

    fn recording(calls: &Calls, name: &'static str) -> Handler<TestEvent, i32> {
        let calls = Rc::clone(calls);
        handler(move |bound: &i32, event: &TestEvent| {
            calls.borrow_mut().push(format!("{}:{}:{:?}", name, bound, event));
            Ok(())
        })
    }

    #[test]
    fn test_persistent_and_once_ordering() {
        let calls: Calls = Rc::default();
        let bus: EventBus<TestEvent, i32> = EventBus::new();
        bus.bind(TestKind::X, recording(&calls, "h1"), 0);
        bus.bind_once(TestKind::X, recording(&calls, "h2"), 0);
        bus.bind(TestKind::X, recording(&calls, "h3"), 0);

        bus.trigger(&TestEvent::X(1)).unwrap();
        bus.trigger(&TestEvent::X(2)).unwrap();

        assert_eq!(
            *calls.borrow(),
            vec![
                "h1:0:X(1)",
                "h2:0:X(1)",
                "h3:0:X(1)",
                "h1:0:X(2)",
                "h3:0:X(2)",
            ]
        );
        assert_eq!(bus.handler_count(TestKind::X), 2);
    }

    #[test]
    fn test_bound_argument_comes_first() {
        let calls: Calls = Rc::default();
        let bus: EventBus<TestEvent, i32> = EventBus::new();
        bus.bind(TestKind::X, recording(&calls, "a"), 5);
        bus.bind(TestKind::X, recording(&calls, "b"), 0);

        bus.trigger(&TestEvent::X(7)).unwrap();
        assert_eq!(*calls.borrow(), vec!["a:5:X(7)", "b:0:X(7)"]);
    }

    #[test]
    fn test_unbind_removes_one_registration() {
        let calls: Calls = Rc::default();
        let bus: EventBus<TestEvent, i32> = EventBus::new();
        let h = recording(&calls, "h");
        bus.bind(TestKind::X, Rc::clone(&h), 1);
        bus.bind(TestKind::X, Rc::clone(&h), 2);

        bus.trigger(&TestEvent::X(0)).unwrap();
        assert_eq!(calls.borrow().len(), 2);

        assert!(bus.unbind(TestKind::X, &h));
        bus.trigger(&TestEvent::X(0)).unwrap();
        assert_eq!(calls.borrow().len(), 3);
        assert_eq!(calls.borrow()[2], "h:2:X(0)");

        assert!(bus.unbind(TestKind::X, &h));
        assert!(!bus.unbind(TestKind::X, &h));
        bus.trigger(&TestEvent::X(0)).unwrap();
        assert_eq!(calls.borrow().len(), 3);
    }

    #[test]
    fn test_unbind_ignores_other_handlers() {
        let calls: Calls = Rc::default();
        let bus: EventBus<TestEvent, i32> = EventBus::new();
        let bound = recording(&calls, "bound");
        let stranger = recording(&calls, "stranger");
        bus.bind(TestKind::X, Rc::clone(&bound), 0);

        assert!(!bus.unbind(TestKind::X, &stranger));
        assert!(!bus.unbind(TestKind::Y, &bound));
        assert_eq!(bus.handler_count(TestKind::X), 1);
    }

    #[test]
    fn test_trigger_without_handlers_is_noop() {
        let bus: EventBus<TestEvent> = EventBus::new();
        assert!(bus.trigger(&TestEvent::Y).is_ok());
    }

    #[test]
    fn test_reentrant_trigger_does_not_refire_once_handler() {
        let bus: Rc<EventBus<TestEvent>> = Rc::new(EventBus::new());
        let count = Rc::new(Cell::new(0));

        let inner_bus = Rc::clone(&bus);
        let inner_count = Rc::clone(&count);
        bus.bind_once(
            TestKind::X,
            handler(move |_: &(), event: &TestEvent| {
                inner_count.set(inner_count.get() + 1);
                if let TestEvent::X(n) = event {
                    if *n < 3 {
                        inner_bus.trigger(&TestEvent::X(n + 1))?;
                    }
                }
                Ok(())
            }),
            (),
        );

        bus.trigger(&TestEvent::X(0)).unwrap();
        assert_eq!(count.get(), 1);
        assert_eq!(bus.handler_count(TestKind::X), 0);
    }

    #[test]
    fn test_handler_error_stops_dispatch() {
        let calls: Calls = Rc::default();
        let bus: EventBus<TestEvent, i32> = EventBus::new();
        bus.bind(
            TestKind::Y,
            handler(|_: &i32, _: &TestEvent| Err(GameError::InvalidAction("boom".into()))),
            0,
        );
        bus.bind(TestKind::Y, recording(&calls, "after"), 0);

        assert!(bus.trigger(&TestEvent::Y).is_err());
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_once_handler_survives_earlier_error() {
        let calls: Calls = Rc::default();
        let bus: EventBus<TestEvent, i32> = EventBus::new();
        let failed = Rc::new(Cell::new(false));
        let fail_once = Rc::clone(&failed);
        bus.bind(
            TestKind::Y,
            handler(move |_: &i32, _: &TestEvent| {
                if fail_once.replace(true) {
                    Ok(())
                } else {
                    Err(GameError::InvalidAction("first call fails".into()))
                }
            }),
            0,
        );
        bus.bind_once(TestKind::Y, recording(&calls, "once"), 0);

        assert!(bus.trigger(&TestEvent::Y).is_err());
        assert!(calls.borrow().is_empty());
        assert_eq!(bus.handler_count(TestKind::Y), 2);

        bus.trigger(&TestEvent::Y).unwrap();
        assert_eq!(*calls.borrow(), vec!["once:0:Y"]);
        assert_eq!(bus.handler_count(TestKind::Y), 1);
    }

    #[test]
    fn test_unbound_once_handler_is_skipped() {
        let calls: Calls = Rc::default();
        let bus: Rc<EventBus<TestEvent, i32>> = Rc::new(EventBus::new());
        let late = recording(&calls, "late");

        let inner_bus = Rc::clone(&bus);
        let inner_late = Rc::clone(&late);
        bus.bind(
            TestKind::X,
            handler(move |_: &i32, _: &TestEvent| {
                inner_bus.unbind(TestKind::X, &inner_late);
                Ok(())
            }),
            0,
        );
        bus.bind_once(TestKind::X, Rc::clone(&late), 0);

        bus.trigger(&TestEvent::X(0)).unwrap();
        assert!(calls.borrow().is_empty());
        assert_eq!(bus.handler_count(TestKind::X), 1);
    }
}
