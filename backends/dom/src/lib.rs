//! Document backend for the `rill` UI runtime.
//!
//! This crate hosts the materialized side of rendering: a [`Document`] of
//! live nodes and the [`render`]/[`mount`] pair that turns declarative
//! [`rill_core::Node`] trees into them. Hosts embed the document (a browser
//! bridge, a test harness, a snapshot tool) and deliver input through
//! [`Document::dispatch_event`].

mod document;
mod error;
mod renderer;

pub use document::{Document, NodeId, NodeType, Property};
pub use error::DomError;
pub use renderer::{mount, render};
