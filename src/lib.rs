#![doc = include_str!("../README.md")]

mod app;
mod error;
pub mod logging;

pub use app::{App, AppBuilder, DEFAULT_ROOT_ID, create_app};
pub use error::AppError;

#[doc(inline)]
pub use rill_core as reactive;
#[doc(inline)]
pub use rill_dom as dom;
#[doc(inline)]
pub use rill_router as router;

pub use tracing as log;

pub mod prelude {
    //! Everything an application needs in one import.
    //!
    //! ```rust
    //! use rill::prelude::*;
    //!
    //! fn greeting(state: &State) -> Node {
    //!     let name = state["name"].as_str().unwrap_or("world");
    //!     create_element("h1", attrs().class("title"), format!("Hello, {name}!"))
    //! }
    //! # let _ = greeting;
    //! ```
    pub use crate::{App, AppBuilder, AppError, create_app};
    pub use rill_core::{
        AttrValue, Attributes, Component, Element, Event, EventHandler, IntoChildren, Map, Node,
        Params, RouterState, State, Store, StoreError, StyleMap, Subscription, Value, attrs,
        create_element, json, text,
    };
    pub use rill_dom::{Document, DomError, NodeId, mount, render};
    pub use rill_router::{
        History, MemoryHistory, PopState, Route, RouteConfigError, Router, RouterOptions,
    };
}
