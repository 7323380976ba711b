//! Typed event registry for synchronous publish/subscribe.
//!
//! Each emitting entity owns one or more [`Emitter`]s, and every
//! [`Emitter::subscribe`] call returns a disposable [`Subscription`]
//! handle so teardown can deterministically unsubscribe. Nothing is ever
//! left listening to a destroyed record.
//!
//! # Delivery Semantics
//!
//! - **Synchronous**: [`Emitter::emit`] invokes every handler before it
//!   returns. There is no queue and no cancellation of an emit in flight.
//! - **Ordered**: handlers run in registration order, always.
//! - **Run to completion**: each handler finishes before the next starts;
//!   a handler that itself emits (a save inside a close handler triggering
//!   a re-render) recurses synchronously within the same turn.
//! - **Snapshot isolation**: an emit operates on the set of handlers
//!   registered when it started. A handler disposed mid-emit still sees
//!   the in-flight event; a handler subscribed mid-emit does not.
//!
//! # Threading
//!
//! The engine is single-threaded and cooperative, so the registry is
//! `Rc`-based and none of these types are `Send`. Implementations that
//! introduce real concurrency must serialize all emits through one queue
//! to preserve the ordering guarantees above.
//!
//! # Example
//!
//! ```
//! use taskwire_core::emitter::Emitter;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! #[derive(Debug)]
//! enum Intent {
//!     ToggleDone,
//!     Close,
//! }
//!
//! let intents: Emitter<Intent> = Emitter::new();
//! let log = Rc::new(RefCell::new(Vec::new()));
//!
//! let sub = intents.subscribe({
//!     let log = Rc::clone(&log);
//!     move |intent| log.borrow_mut().push(format!("{intent:?}"))
//! });
//!
//! intents.emit(&Intent::ToggleDone);
//! intents.emit(&Intent::Close);
//! assert_eq!(*log.borrow(), ["ToggleDone", "Close"]);
//!
//! sub.dispose();
//! intents.emit(&Intent::ToggleDone);
//! assert_eq!(log.borrow().len(), 2);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

/// A registered handler. Handlers are shared so an emit can run against a
/// snapshot of the registry while handlers mutate it.
type Handler<E> = Rc<dyn Fn(&E)>;

/// The registry backing one emitter: insertion-ordered handlers tagged
/// with the id their [`Subscription`] uses to remove them.
struct Registry<E> {
    next_id: u64,
    entries: Vec<(u64, Handler<E>)>,
}

impl<E> Registry<E> {
    const fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

/// An ordered, typed event registry.
///
/// One `Emitter<E>` carries one event type. Entities that emit several
/// kinds of notification model them as variants of a single enum, so one
/// subscription observes everything the entity does (the catch-all hook)
/// and specific events are pattern matches on the same stream.
///
/// Cloning an emitter is cheap and yields a second handle onto the same
/// registry; components hand out clones so collaborators can subscribe
/// without owning the emitting entity.
pub struct Emitter<E> {
    registry: Rc<RefCell<Registry<E>>>,
}

impl<E: 'static> Emitter<E> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry::new())),
        }
    }

    /// Register a handler and return its disposable handle.
    ///
    /// Handlers run in registration order on every subsequent
    /// [`emit`](Self::emit). Dropping (or [`Subscription::dispose`]-ing)
    /// the returned handle removes the handler deterministically.
    pub fn subscribe(&self, handler: impl Fn(&E) + 'static) -> Subscription {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.entries.push((id, Rc::new(handler)));
            id
        };

        let registry = Rc::downgrade(&self.registry);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(registry) = registry.upgrade() {
                    registry.borrow_mut().entries.retain(|(entry_id, _)| *entry_id != id);
                }
            })),
        }
    }

    /// Deliver an event to every handler registered when the call started.
    ///
    /// Handlers run synchronously, in registration order, each to
    /// completion. Handlers may emit on this same emitter (the nested emit
    /// completes before the outer one resumes), subscribe, or dispose
    /// subscriptions; see the module docs for the snapshot semantics.
    pub fn emit(&self, event: &E) {
        // Snapshot under a short borrow so handlers are free to mutate the
        // registry while the event is delivered.
        let snapshot: Vec<Handler<E>> = self
            .registry
            .borrow()
            .entries
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        tracing::trace!(handlers = snapshot.len(), "dispatching event");

        for handler in snapshot {
            handler(event);
        }
    }

    /// Number of live handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    /// Whether no handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.borrow().entries.is_empty()
    }
}

impl<E> Clone for Emitter<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<E: 'static> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> std::fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter").field("handlers", &self.len()).finish()
    }
}

/// Disposable handle to one registered handler.
///
/// Dropping the handle unsubscribes; [`dispose`](Self::dispose) does the
/// same explicitly at a named point. The handle is intentionally
/// non-generic so heterogeneous subscriptions can live in one
/// `Vec<Subscription>` during component teardown.
///
/// If the emitter itself has already been dropped, disposal is a no-op.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Remove the handler from its registry now.
    pub fn dispose(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("live", &self.cancel.is_some())
            .finish()
    }
}
