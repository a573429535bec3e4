//! Session history integration.
//!
//! The router does not own the navigation stack; the host does. A browser
//! bridge implements [`History`] on top of `history.pushState` and
//! `popstate`. [`MemoryHistory`] keeps the stack in memory for tests and
//! hosts without a native history.

use std::{cell::RefCell, fmt, rc::Rc};

use rill_core::{Map, Value};

/// An entry restored by back/forward navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopState {
    /// Path of the restored entry.
    pub path: String,
    /// State that was pushed with the entry.
    pub state: Value,
}

/// Callback invoked when the host moves through its history.
pub type PopStateListener = Box<dyn Fn(&PopState)>;

/// Identifies a listener registered with [`History::listen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HistoryListenerId(u64);

impl HistoryListenerId {
    /// Wraps a host-assigned listener number.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw listener number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A host-provided session history.
pub trait History {
    /// The current location path.
    fn location(&self) -> String;

    /// Pushes a new entry for `path` carrying `state` and makes it current.
    fn push_state(&self, path: &str, state: &Value);

    /// Registers a listener for back/forward navigation. The host has
    /// already moved to the restored entry when the listener runs.
    fn listen(&self, listener: PopStateListener) -> HistoryListenerId;

    /// Removes a listener. Unknown ids are ignored.
    fn unlisten(&self, id: HistoryListenerId);
}

impl<H: History + ?Sized> History for Rc<H> {
    fn location(&self) -> String {
        (**self).location()
    }

    fn push_state(&self, path: &str, state: &Value) {
        (**self).push_state(path, state);
    }

    fn listen(&self, listener: PopStateListener) -> HistoryListenerId {
        (**self).listen(listener)
    }

    fn unlisten(&self, id: HistoryListenerId) {
        (**self).unlisten(id);
    }
}

struct MemoryHistoryInner {
    entries: Vec<PopState>,
    index: usize,
    listeners: Vec<(HistoryListenerId, Rc<dyn Fn(&PopState)>)>,
    next_id: u64,
}

/// An in-memory history stack.
///
/// Clones share the same stack, so a test can hand one clone to the router
/// and drive back/forward navigation through another.
#[derive(Clone)]
pub struct MemoryHistory {
    inner: Rc<RefCell<MemoryHistoryInner>>,
}

impl fmt::Debug for MemoryHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("MemoryHistory")
            .field("entries", &inner.entries)
            .field("index", &inner.index)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl MemoryHistory {
    /// Creates a history whose only entry is `initial_path`.
    #[must_use]
    pub fn new(initial_path: &str) -> Self {
        Self {
            inner: Rc::new(RefCell::new(MemoryHistoryInner {
                entries: vec![PopState {
                    path: initial_path.to_owned(),
                    state: Value::Object(Map::new()),
                }],
                index: 0,
                listeners: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Number of entries in the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Always `false`: a history holds at least its initial entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    /// Number of registered back/forward listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Paths of all entries, oldest first.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.inner
            .borrow()
            .entries
            .iter()
            .map(|entry| entry.path.clone())
            .collect()
    }

    /// The current entry.
    #[must_use]
    pub fn current(&self) -> PopState {
        let inner = self.inner.borrow();
        inner.entries[inner.index].clone()
    }

    /// Moves one entry back. Returns `false` at the start of the stack.
    pub fn back(&self) -> bool {
        self.go(-1)
    }

    /// Moves one entry forward. Returns `false` at the end of the stack.
    pub fn forward(&self) -> bool {
        self.go(1)
    }

    /// Moves `delta` entries and notifies listeners. Out-of-range moves do
    /// nothing and return `false`.
    pub fn go(&self, delta: isize) -> bool {
        let (entry, listeners) = {
            let mut inner = self.inner.borrow_mut();
            let Some(index) = inner
                .index
                .checked_add_signed(delta)
                .filter(|index| *index < inner.entries.len())
            else {
                return false;
            };
            if index == inner.index {
                return false;
            }
            inner.index = index;
            let listeners: Vec<_> = inner
                .listeners
                .iter()
                .map(|(_, listener)| Rc::clone(listener))
                .collect();
            (inner.entries[index].clone(), listeners)
        };
        for listener in listeners {
            listener(&entry);
        }
        true
    }
}

impl History for MemoryHistory {
    fn location(&self) -> String {
        self.current().path
    }

    fn push_state(&self, path: &str, state: &Value) {
        let mut inner = self.inner.borrow_mut();
        let next = inner.index + 1;
        inner.entries.truncate(next);
        inner.entries.push(PopState {
            path: path.to_owned(),
            state: state.clone(),
        });
        inner.index = next;
    }

    fn listen(&self, listener: PopStateListener) -> HistoryListenerId {
        let mut inner = self.inner.borrow_mut();
        let id = HistoryListenerId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, Rc::from(listener)));
        id
    }

    fn unlisten(&self, id: HistoryListenerId) {
        self.inner
            .borrow_mut()
            .listeners
            .retain(|(registered, _)| *registered != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rill_core::json;
    use std::cell::Cell;

    #[test]
    fn push_truncates_forward_entries() {
        let history = MemoryHistory::new("/");
        history.push_state("/a", &json!({}));
        history.push_state("/b", &json!({}));
        assert!(history.back());

        history.push_state("/c", &json!({}));

        assert_eq!(history.paths(), ["/", "/a", "/c"]);
        assert_eq!(history.location(), "/c");
        assert!(!history.forward());
    }

    #[test]
    fn back_and_forward_notify_with_the_restored_entry() {
        let history = MemoryHistory::new("/");
        history.push_state("/a", &json!({ "from": "test" }));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        history.listen(Box::new(move |entry| sink.borrow_mut().push(entry.clone())));

        assert!(history.back());
        assert!(!history.back());
        assert!(history.forward());

        assert_eq!(
            *seen.borrow(),
            vec![
                PopState { path: "/".into(), state: json!({}) },
                PopState { path: "/a".into(), state: json!({ "from": "test" }) },
            ]
        );
    }

    #[test]
    fn listeners_may_push_while_being_notified() {
        let history = MemoryHistory::new("/");
        history.push_state("/a", &json!({}));
        let handle = history.clone();
        history.listen(Box::new(move |_| handle.push_state("/redirect", &json!({}))));

        assert!(history.back());

        assert_eq!(history.paths(), ["/", "/redirect"]);
    }

    #[test]
    fn unlisten_stops_notifications() {
        let history = MemoryHistory::new("/");
        history.push_state("/a", &json!({}));
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let id = history.listen(Box::new(move |_| counter.set(counter.get() + 1)));
        let other = history.listen(Box::new(|_| {}));

        history.unlisten(id);
        assert!(history.back());

        assert_eq!(calls.get(), 0);
        assert_eq!(history.listener_count(), 1);
        history.unlisten(other);
        history.unlisten(other);
        assert_eq!(history.listener_count(), 0);
    }
}
