//! Application bootstrap.
//!
//! An [`App`] binds a root component to a mount point: every store update
//! re-renders the component from the new state and replaces the whole
//! subtree under the mount point.

use rill_core::{Component, Node, State, Store, StoreError, Subscription, Value};
use rill_dom::{Document, DomError, NodeId, mount, render};

use crate::AppError;

/// Mount point used when none is configured.
pub const DEFAULT_ROOT_ID: &str = "root";

/// Configures and starts an [`App`].
///
/// ```
/// use rill::prelude::*;
///
/// let document = Document::new();
/// let root = document.create_element("div");
/// document.set_attribute(root, "id", "app")?;
/// document.append_child(document.body(), root)?;
///
/// let store = Store::new(Map::from_iter([("count".to_owned(), json!(1))]));
/// let app = AppBuilder::new()
///     .with_root_id("app")
///     .build(&document, &store, |state: &State| {
///         create_element("p", attrs(), format!("count: {}", state["count"]))
///     })?;
///
/// app.set_state(json!({ "count": 2 }))?;
/// assert_eq!(document.inner_html(root)?, "<p>count: 2</p>");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct AppBuilder {
    root_id: String,
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self {
            root_id: DEFAULT_ROOT_ID.to_owned(),
        }
    }
}

impl AppBuilder {
    /// A builder mounting into `#root`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts into the element whose `id` is `root_id`.
    #[must_use]
    pub fn with_root_id(mut self, root_id: impl Into<String>) -> Self {
        self.root_id = root_id.into();
        self
    }

    /// The configured mount point id.
    #[must_use]
    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    /// Locates the mount point, subscribes the re-render listener and
    /// performs the initial render.
    ///
    /// # Errors
    ///
    /// [`AppError::RootNotFound`] if no connected element has the configured
    /// id; nothing is subscribed or rendered in that case.
    /// [`AppError::Dom`] if the initial render fails; the listener is
    /// removed again.
    pub fn build(
        self,
        document: &Document,
        store: &Store,
        component: impl Fn(&State) -> Node + 'static,
    ) -> Result<App, AppError> {
        let root = document
            .get_element_by_id(&self.root_id)
            .ok_or_else(|| AppError::RootNotFound(self.root_id.clone()))?;
        let component = Component::new(component);

        let subscription = {
            let document = document.clone();
            let component = component.clone();
            store.subscribe(move |state, _| {
                if let Err(error) = render_into(&document, &component, state, root) {
                    tracing::error!(%error, "re-render failed");
                }
            })
        };

        if let Err(error) = render_into(document, &component, &store.state(), root) {
            subscription.unsubscribe();
            return Err(error.into());
        }
        tracing::debug!(root_id = %self.root_id, "app mounted");

        Ok(App {
            document: document.clone(),
            store: store.clone(),
            root,
            subscription,
        })
    }
}

fn render_into(
    document: &Document,
    component: &Component,
    state: &State,
    root: NodeId,
) -> Result<(), DomError> {
    let _span = tracing::debug_span!("render", %root).entered();
    let node = render(document, &component.render(state))?;
    if let Err(error) = mount(document, node, root) {
        document.discard(node)?;
        return Err(error);
    }
    Ok(())
}

/// Starts an app mounted at the element with id `root_id`.
///
/// Returns `None` after logging an error if the mount point is missing or
/// the initial render fails. Use [`AppBuilder`] to handle the error instead.
pub fn create_app(
    document: &Document,
    store: &Store,
    component: impl Fn(&State) -> Node + 'static,
    root_id: &str,
) -> Option<App> {
    match AppBuilder::new()
        .with_root_id(root_id)
        .build(document, store, component)
    {
        Ok(app) => Some(app),
        Err(error) => {
            tracing::error!(%error, root_id, "failed to start app");
            None
        }
    }
}

/// A running application.
///
/// Dropping an `App` leaves it running: the re-render listener stays
/// subscribed for as long as the store lives. Call [`App::unmount`] to stop
/// it.
#[derive(Debug)]
pub struct App {
    document: Document,
    store: Store,
    root: NodeId,
    subscription: Subscription,
}

impl App {
    /// The current state.
    #[must_use]
    pub fn state(&self) -> State {
        self.store.state()
    }

    /// Shorthand for [`Store::set_state`].
    ///
    /// # Errors
    ///
    /// See [`Store::set_state`].
    pub fn set_state(&self, partial: impl Into<Value>) -> Result<(), StoreError> {
        self.store.set_state(partial)
    }

    /// The store driving this app.
    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    /// The document the app renders into.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// The mount point.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Stops re-rendering and clears the mount point.
    ///
    /// # Errors
    ///
    /// [`AppError::Dom`] if the mount point was removed from the document.
    pub fn unmount(self) -> Result<(), AppError> {
        self.subscription.unsubscribe();
        self.document.clear_children(self.root)?;
        tracing::debug!(root = %self.root, "app unmounted");
        Ok(())
    }
}
