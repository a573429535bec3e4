//! Core building blocks of the `rill` UI runtime.
//!
//! This crate holds everything that does not depend on a rendering target:
//!
//! - [`Store`] keeps the application [`State`] and notifies listeners when a
//!   shallow-merge update changes it.
//! - [`create_element`] normalizes `(tag, attributes, children)` into an
//!   immutable declarative [`Node`].
//! - [`Component`] maps a state snapshot to a tree.
//!
//! Backends such as `rill-dom` materialize the trees; `rill-router` writes
//! navigation into the store.

#[macro_use]
mod macros;

pub mod attr;
mod component;
mod error;
pub mod event;
pub mod node;
pub mod state;
pub mod store;

pub use attr::{AttrValue, Attributes, StyleMap, attrs};
pub use component::Component;
pub use error::StoreError;
pub use event::{Event, EventHandler};
pub use node::{Element, IntoChildren, Node, create_element, text};
pub use serde_json::{Map, Value, json};
pub use state::{Params, ROUTER_KEY, RouterState, State};
pub use store::{ListenerId, Store, Subscription};
