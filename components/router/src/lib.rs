//! Client-side routing for the `rill` UI runtime.
//!
//! A [`Router`] maps the host's location onto a component and publishes the
//! result into the application [`Store`](rill_core::Store) under the
//! `router` key:
//!
//! ```json
//! { "router": { "currentPath": "/users/42", "params": { "id": "42" }, "notFound": false } }
//! ```
//!
//! Routes are matched in declaration order; the first match wins. Patterns
//! support `:name` segments and a trailing `*` (see [`RoutePattern`]).
//!
//! ```
//! use rill_core::{Store, text};
//! use rill_router::{MemoryHistory, Route, Router, RouterOptions};
//!
//! let store = Store::default();
//! let router = Router::new(
//!     &store,
//!     MemoryHistory::new("/"),
//!     vec![
//!         Route::new("/", |_| text("home")),
//!         Route::new("/users/:id", |state| {
//!             let id = state.router().map(|r| r.params["id"].clone()).unwrap_or_default();
//!             text(format!("user {id}"))
//!         }),
//!     ],
//!     RouterOptions::new(),
//! )?;
//!
//! router.navigate("/users/42");
//! assert_eq!(router.current_component().render(&store.state()), text("user 42"));
//! # Ok::<(), rill_router::RouteConfigError>(())
//! ```

mod error;
pub mod history;
mod link;
mod pattern;
mod router;

pub use error::RouteConfigError;
pub use history::{History, HistoryListenerId, MemoryHistory, PopState, PopStateListener};
pub use pattern::RoutePattern;
pub use router::{Route, RouteMatch, Router, RouterOptions};
