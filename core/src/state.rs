//! Immutable application state snapshots.
//!
//! A [`State`] is a shared, read-only view of the application's key/value
//! mapping. Writes never touch an existing snapshot: the [`Store`](crate::Store)
//! builds a new one and swaps it in, so anybody holding an older `State` keeps
//! seeing exactly what they saw before.

use std::{collections::BTreeMap, ops::Index, rc::Rc};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved top-level key under which the router publishes [`RouterState`].
pub const ROUTER_KEY: &str = "router";

/// Named route parameters, keyed by the `:name` identifiers of a pattern.
pub type Params = BTreeMap<String, String>;

static NULL: Value = Value::Null;

/// A snapshot of the application state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State(Rc<Map<String, Value>>);

impl State {
    /// Wraps a mapping into a state snapshot.
    #[must_use]
    pub fn new(map: Map<String, Value>) -> Self {
        Self(Rc::new(map))
    }

    /// Returns the value stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns `true` if a value is stored under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Borrows the underlying mapping.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Copies the snapshot into an owned JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object((*self.0).clone())
    }

    /// Number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the state holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decodes the router sub-object, if the router has published one.
    #[must_use]
    pub fn router(&self) -> Option<RouterState> {
        let value = self.0.get(ROUTER_KEY)?;
        match RouterState::deserialize(value) {
            Ok(router) => Some(router),
            Err(error) => {
                tracing::warn!(%error, "`router` state key does not hold router state");
                None
            }
        }
    }

    /// Returns `true` if both snapshots share the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Shallow-merges `partial` over this snapshot, producing a new one.
    pub(crate) fn merged(&self, partial: Map<String, Value>) -> Self {
        let mut next = (*self.0).clone();
        for (key, value) in partial {
            next.insert(key, value);
        }
        Self::new(next)
    }
}

impl From<Map<String, Value>> for State {
    fn from(value: Map<String, Value>) -> Self {
        Self::new(value)
    }
}

impl Index<&str> for State {
    type Output = Value;

    /// Missing keys index to `Value::Null`, mirroring `serde_json::Value`.
    fn index(&self, key: &str) -> &Value {
        self.0.get(key).unwrap_or(&NULL)
    }
}

/// The `router` sub-object written into the state on every route change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterState {
    /// Path the router last resolved.
    pub current_path: String,
    /// Parameters extracted from the matching route, empty when nothing matched.
    #[serde(default)]
    pub params: Params,
    /// `true` when no route matched `current_path`.
    #[serde(default)]
    pub not_found: bool,
}

impl RouterState {
    /// Encodes the router state as the JSON value stored under [`ROUTER_KEY`].
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "currentPath": self.current_path,
            "params": self.params,
            "notFound": self.not_found,
        })
    }
}
