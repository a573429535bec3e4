//! Events delivered to handlers bound through `on*` attributes.

use std::rc::Rc;

/// An event-like value passed to every [`EventHandler`].
///
/// Hosts fill in whatever they know about the interaction (the live value of
/// an input, the pressed key); handlers can veto the default action or stop
/// the event from bubbling further.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    kind: String,
    value: Option<String>,
    key: Option<String>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    /// Creates an event of the given kind, e.g. `"click"`.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: None,
            key: None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Attaches the live value of the event target.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Attaches the key associated with a keyboard event.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// The event name, lower-case.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Live value of the target, when the host supplied one.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Key of a keyboard event, when the host supplied one.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Cancels the host's default action for this event.
    pub const fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Returns `true` once a handler called [`Event::prevent_default`].
    #[must_use]
    pub const fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Stops the event from reaching ancestors of the current target.
    pub const fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Returns `true` once a handler called [`Event::stop_propagation`].
    #[must_use]
    pub const fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// A shared, clonable event callback.
#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn(&mut Event)>);

crate::impl_debug!(EventHandler);

impl EventHandler {
    /// Wraps a closure into a handler.
    pub fn new(handler: impl Fn(&mut Event) + 'static) -> Self {
        Self(Rc::new(handler))
    }

    /// Invokes the handler.
    pub fn call(&self, event: &mut Event) {
        (self.0)(event);
    }

    /// Returns `true` if both handles point at the same closure.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}
