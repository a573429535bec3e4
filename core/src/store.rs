//! The application state store.
//!
//! [`Store`] owns the single [`State`] value of an application. Updates are
//! shallow merges: only the top-level keys present in the update are
//! replaced. Listeners run synchronously, in registration order, and only
//! when a merge actually changed the state.
//!
//! # Re-entrant updates
//!
//! A listener may call [`Store::set_state`] while a notification pass is
//! running. Such updates are validated immediately but queued: the current
//! pass finishes delivering the same `(next, prev)` pair to every remaining
//! listener, then queued updates are applied one by one, each with its own
//! merge, equality check and notification pass.

use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, VecDeque},
    fmt,
    rc::{Rc, Weak},
};

use serde_json::{Map, Value};

use crate::{
    State,
    error::{StoreError, kind_of},
};

type Listener = Rc<dyn Fn(&State, &State)>;

/// Identifies a registered listener. Ids grow with registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

struct StoreInner {
    state: RefCell<State>,
    listeners: RefCell<BTreeMap<ListenerId, Listener>>,
    next_id: Cell<u64>,
    notifying: Cell<bool>,
    pending: RefCell<VecDeque<Map<String, Value>>>,
}

/// Shared handle to the application state.
///
/// Cloning a `Store` yields another handle to the same state.
#[derive(Clone)]
pub struct Store {
    inner: Rc<StoreInner>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(Map::new())
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.inner.state.borrow())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}

impl Store {
    /// Creates a store holding `initial`.
    #[must_use]
    pub fn new(initial: Map<String, Value>) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(State::new(initial)),
                listeners: RefCell::new(BTreeMap::new()),
                next_id: Cell::new(0),
                notifying: Cell::new(false),
                pending: RefCell::new(VecDeque::new()),
            }),
        }
    }

    /// Returns the current state snapshot.
    #[must_use]
    pub fn state(&self) -> State {
        self.inner.state.borrow().clone()
    }

    /// Shallow-merges `partial` into the state and notifies listeners if the
    /// result differs from the previous state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidStateUpdate`] if `partial` is not a JSON
    /// object. The state is left untouched in that case.
    pub fn set_state(&self, partial: impl Into<Value>) -> Result<(), StoreError> {
        let partial = match partial.into() {
            Value::Object(map) => map,
            other => {
                return Err(StoreError::InvalidStateUpdate {
                    found: kind_of(&other),
                });
            }
        };

        if self.inner.notifying.get() {
            tracing::debug!(keys = partial.len(), "queueing re-entrant state update");
            self.inner.pending.borrow_mut().push_back(partial);
            return Ok(());
        }

        self.apply(partial);
        while let Some(queued) = self.next_pending() {
            self.apply(queued);
        }
        Ok(())
    }

    /// Registers a listener called with `(next, prev)` after every effective update.
    pub fn subscribe(&self, listener: impl Fn(&State, &State) + 'static) -> Subscription {
        let id = ListenerId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner
            .listeners
            .borrow_mut()
            .insert(id, Rc::new(listener));
        Subscription {
            store: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Number of currently registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    fn next_pending(&self) -> Option<Map<String, Value>> {
        self.inner.pending.borrow_mut().pop_front()
    }

    fn apply(&self, partial: Map<String, Value>) {
        let prev = self.state();
        let next = prev.merged(partial);
        if next == prev {
            tracing::debug!("state unchanged, skipping notification");
            return;
        }
        *self.inner.state.borrow_mut() = next.clone();
        self.notify(&next, &prev);
    }

    fn notify(&self, next: &State, prev: &State) {
        let ids: Vec<ListenerId> = self.inner.listeners.borrow().keys().copied().collect();
        tracing::debug!(listeners = ids.len(), "notifying state listeners");

        self.inner.notifying.set(true);
        let _reset = NotifyingReset(&self.inner.notifying);
        for id in ids {
            // Looked up per call so listeners removed mid-pass are skipped.
            let listener = self.inner.listeners.borrow().get(&id).cloned();
            if let Some(listener) = listener {
                listener(next, prev);
            }
        }
    }
}

struct NotifyingReset<'a>(&'a Cell<bool>);

impl Drop for NotifyingReset<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Handle returned by [`Store::subscribe`].
///
/// Dropping the handle leaves the listener registered; call
/// [`Subscription::unsubscribe`] to remove it.
#[derive(Debug)]
pub struct Subscription {
    store: Weak<StoreInner>,
    id: ListenerId,
}

impl Subscription {
    /// Identifier of the listener this handle controls.
    #[must_use]
    pub const fn id(&self) -> ListenerId {
        self.id
    }

    /// Removes the listener. It will not be called again, even by a
    /// notification pass that is currently in progress.
    pub fn unsubscribe(self) {
        if let Some(store) = self.store.upgrade() {
            store.listeners.borrow_mut().remove(&self.id);
        }
    }
}
