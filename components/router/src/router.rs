//! The router state machine.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::{Rc, Weak},
};

use rill_core::{
    Component, Map, Node, Params, ROUTER_KEY, RouterState, State, Store, Value, attrs,
    create_element,
};

use crate::{History, HistoryListenerId, PopState, RouteConfigError, RoutePattern};

/// A route definition: a pattern and the component it resolves to.
///
/// Patterns are compiled, and rejected, when the [`Router`] is built.
#[derive(Debug, Clone)]
pub struct Route {
    pattern: String,
    component: Component,
}

impl Route {
    /// Declares a route.
    pub fn new(pattern: impl Into<String>, component: impl Fn(&State) -> Node + 'static) -> Self {
        Self::with_component(pattern, Component::new(component))
    }

    /// Declares a route for an existing component.
    pub fn with_component(pattern: impl Into<String>, component: Component) -> Self {
        Self {
            pattern: pattern.into(),
            component,
        }
    }

    /// The pattern as written.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Router configuration.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    not_found: Component,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            not_found: Component::new(|_| {
                create_element("div", attrs().class("not-found"), "404 - Page not found")
            }),
        }
    }
}

impl RouterOptions {
    /// Default options: a plain "404 - Page not found" component.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Component shown when no route matches.
    #[must_use]
    pub fn with_not_found(mut self, component: impl Fn(&State) -> Node + 'static) -> Self {
        self.not_found = Component::new(component);
        self
    }
}

#[derive(Debug)]
struct CompiledRoute {
    pattern: RoutePattern,
    component: Component,
}

/// A successful route lookup.
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    /// The first pattern that matched.
    pub pattern: &'a RoutePattern,
    /// Component of the matched route.
    pub component: &'a Component,
    /// Parameters captured by the pattern.
    pub params: Params,
}

pub(crate) struct RouterInner {
    store: Store,
    history: Box<dyn History>,
    routes: Vec<CompiledRoute>,
    not_found: Component,
    current_path: RefCell<String>,
    listener: Cell<Option<HistoryListenerId>>,
}

impl Drop for RouterInner {
    fn drop(&mut self) {
        if let Some(id) = self.listener.take() {
            self.history.unlisten(id);
        }
    }
}

/// Client-side router.
///
/// The router keeps the `router` key of the [`Store`] in sync with the
/// host's location: on construction, on [`Router::navigate`], and whenever
/// the host reports back/forward navigation. Routes are tried in
/// declaration order and the first match wins.
///
/// Cloning a `Router` yields another handle to the same router.
#[derive(Clone)]
pub struct Router {
    inner: Rc<RouterInner>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("current_path", &*self.inner.current_path.borrow())
            .field(
                "routes",
                &self
                    .inner
                    .routes
                    .iter()
                    .map(|route| route.pattern.as_str())
                    .collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl Router {
    /// Compiles `routes`, subscribes to back/forward navigation and resolves
    /// the host's current location.
    ///
    /// # Errors
    ///
    /// Returns [`RouteConfigError`] for the first malformed pattern; nothing
    /// is written to the store in that case.
    pub fn new(
        store: &Store,
        history: impl History + 'static,
        routes: Vec<Route>,
        options: RouterOptions,
    ) -> Result<Self, RouteConfigError> {
        let routes = routes
            .into_iter()
            .map(|route| {
                Ok(CompiledRoute {
                    pattern: RoutePattern::parse(&route.pattern)?,
                    component: route.component,
                })
            })
            .collect::<Result<Vec<_>, RouteConfigError>>()?;

        let initial = history.location();
        let router = Self {
            inner: Rc::new(RouterInner {
                store: store.clone(),
                history: Box::new(history),
                routes,
                not_found: options.not_found,
                current_path: RefCell::new(initial.clone()),
                listener: Cell::new(None),
            }),
        };

        let weak = Rc::downgrade(&router.inner);
        let listener = router.inner.history.listen(Box::new(move |entry| {
            if let Some(router) = Self::upgrade(&weak) {
                router.handle_pop_state(entry);
            }
        }));
        router.inner.listener.set(Some(listener));

        router.handle_route_change(&initial, Map::new());
        Ok(router)
    }

    pub(crate) fn upgrade(weak: &Weak<RouterInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    pub(crate) fn downgrade(&self) -> Weak<RouterInner> {
        Rc::downgrade(&self.inner)
    }

    /// The path the router last resolved.
    #[must_use]
    pub fn current_path(&self) -> String {
        self.inner.current_path.borrow().clone()
    }

    /// Returns `true` if `path` is the current path.
    #[must_use]
    pub fn is_active(&self, path: &str) -> bool {
        *self.inner.current_path.borrow() == path
    }

    /// Compiled patterns, in declaration order.
    pub fn routes(&self) -> impl Iterator<Item = &RoutePattern> {
        self.inner.routes.iter().map(|route| &route.pattern)
    }

    /// Finds the first route whose pattern matches `path`.
    #[must_use]
    pub fn find_route(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.inner.routes.iter().find_map(|route| {
            route.pattern.match_path(path).map(|params| RouteMatch {
                pattern: &route.pattern,
                component: &route.component,
                params,
            })
        })
    }

    /// Parameters of the current path; empty when nothing matches.
    #[must_use]
    pub fn params(&self) -> Params {
        self.find_route(&self.current_path())
            .map(|matched| matched.params)
            .unwrap_or_default()
    }

    /// Component for the current path, or the not-found component.
    #[must_use]
    pub fn current_component(&self) -> Component {
        self.find_route(&self.current_path()).map_or_else(
            || self.inner.not_found.clone(),
            |matched| matched.component.clone(),
        )
    }

    /// Resolves `path` and publishes `{router, ..extra}` to the store in a
    /// single merge.
    ///
    /// A `router` key inside `extra` is ignored so the published router
    /// state always describes `path`.
    pub fn handle_route_change(&self, path: &str, extra: Map<String, Value>) {
        let (params, not_found) = match self.find_route(path) {
            Some(matched) => (matched.params, false),
            None => (Params::new(), true),
        };
        *self.inner.current_path.borrow_mut() = path.to_owned();

        let router_state = RouterState {
            current_path: path.to_owned(),
            params,
            not_found,
        };
        tracing::debug!(path, not_found, params = ?router_state.params, "route resolved");

        let mut update = Map::new();
        update.insert(ROUTER_KEY.to_owned(), router_state.to_value());
        for (key, value) in extra {
            if key == ROUTER_KEY {
                tracing::warn!(path, "ignoring `router` key in navigation state");
                continue;
            }
            update.insert(key, value);
        }

        if let Err(error) = self.inner.store.set_state(update) {
            tracing::error!(%error, path, "failed to publish route change");
        }
    }

    /// Navigates to `path` with an empty history state.
    pub fn navigate(&self, path: &str) {
        self.navigate_with_state(path, Map::new());
    }

    /// Navigates to `path`, pushing a history entry that carries `state`.
    ///
    /// Navigating to the current path does nothing at all: no history entry
    /// and no store update.
    pub fn navigate_with_state(&self, path: &str, state: Map<String, Value>) {
        if self.is_active(path) {
            tracing::debug!(path, "already at path, ignoring navigation");
            return;
        }
        tracing::info!(path, "navigating");
        self.inner
            .history
            .push_state(path, &Value::Object(state.clone()));
        self.handle_route_change(path, state);
    }

    fn handle_pop_state(&self, entry: &PopState) {
        tracing::info!(path = %entry.path, "history navigation");
        let state = match &entry.state {
            Value::Object(state) => state.clone(),
            _ => Map::new(),
        };
        self.handle_route_change(&entry.path, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryHistory;
    use rill_core::{json, text};

    fn counting(store: &Store) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let _ = store.subscribe(move |_, _| counter.set(counter.get() + 1));
        count
    }

    fn page(name: &'static str) -> impl Fn(&State) -> Node {
        move |_| text(name)
    }

    fn router_state(store: &Store) -> RouterState {
        store.state().router().unwrap()
    }

    #[test]
    fn construction_publishes_the_initial_route() {
        let store = Store::default();
        let router = Router::new(
            &store,
            MemoryHistory::new("/users/42"),
            vec![Route::new("/users/:id", page("user"))],
            RouterOptions::new(),
        )
        .unwrap();

        assert_eq!(router.current_path(), "/users/42");
        assert_eq!(
            router_state(&store),
            RouterState {
                current_path: "/users/42".into(),
                params: Params::from([("id".to_owned(), "42".to_owned())]),
                not_found: false,
            }
        );
        assert_eq!(router.params().get("id").map(String::as_str), Some("42"));
    }

    #[test]
    fn unmatched_path_resolves_to_not_found() {
        let store = Store::default();
        let router = Router::new(
            &store,
            MemoryHistory::new("/users"),
            vec![Route::new("/users/:id", page("user"))],
            RouterOptions::new().with_not_found(page("missing")),
        )
        .unwrap();

        let state = router_state(&store);
        assert!(state.not_found);
        assert!(state.params.is_empty());
        assert_eq!(router.current_component().render(&store.state()), text("missing"));
    }

    #[test]
    fn default_not_found_component_renders_a_message() {
        let store = Store::default();
        let router =
            Router::new(&store, MemoryHistory::new("/nowhere"), Vec::new(), RouterOptions::new())
                .unwrap();

        let node = router.current_component().render(&store.state());
        let element = node.as_element().unwrap();
        assert_eq!(element.children(), [text("404 - Page not found")]);
    }

    #[test]
    fn first_declared_route_wins() {
        let store = Store::default();
        let router = Router::new(
            &store,
            MemoryHistory::new("/a"),
            vec![Route::new("/a", page("a")), Route::new("/*", page("catch-all"))],
            RouterOptions::new(),
        )
        .unwrap();

        assert_eq!(router.find_route("/a").unwrap().pattern.as_str(), "/a");
        assert_eq!(router.current_component().render(&store.state()), text("a"));
        assert_eq!(router.find_route("/b").unwrap().pattern.as_str(), "/*");
    }

    #[test]
    fn malformed_pattern_fails_construction_without_writing_state() {
        let store = Store::default();
        let error = Router::new(
            &store,
            MemoryHistory::new("/"),
            vec![Route::new("/", page("home")), Route::new("/users/:", page("user"))],
            RouterOptions::new(),
        )
        .unwrap_err();

        assert_eq!(error.pattern(), "/users/:");
        assert!(store.state().is_empty());
    }

    #[test]
    fn navigate_pushes_history_and_updates_the_store() {
        let store = Store::default();
        let history = MemoryHistory::new("/");
        let router = Router::new(
            &store,
            history.clone(),
            vec![Route::new("/", page("home")), Route::new("/todos/:id", page("todo"))],
            RouterOptions::new(),
        )
        .unwrap();

        let mut state = Map::new();
        state.insert("from".into(), json!("list"));
        router.navigate_with_state("/todos/3", state);

        assert_eq!(history.paths(), ["/", "/todos/3"]);
        assert_eq!(history.current().state, json!({ "from": "list" }));
        assert_eq!(store.state()["from"], json!("list"));
        assert_eq!(router_state(&store).params["id"], "3");
        assert_eq!(router.current_component().render(&store.state()), text("todo"));
    }

    #[test]
    fn navigating_to_the_current_path_is_a_no_op() {
        let store = Store::default();
        let history = MemoryHistory::new("/");
        let router = Router::new(
            &store,
            history.clone(),
            vec![Route::new("/", page("home"))],
            RouterOptions::new(),
        )
        .unwrap();
        let updates = counting(&store);

        router.navigate("/");

        assert_eq!(history.len(), 1);
        assert_eq!(updates.get(), 0);
    }

    #[test]
    fn back_and_forward_resolve_without_pushing() {
        let store = Store::default();
        let history = MemoryHistory::new("/");
        let router = Router::new(
            &store,
            history.clone(),
            vec![Route::new("/", page("home")), Route::new("/about", page("about"))],
            RouterOptions::new(),
        )
        .unwrap();
        let mut state = Map::new();
        state.insert("scroll".into(), json!(120));
        router.navigate_with_state("/about", state);
        router.navigate("/");
        assert_eq!(history.len(), 3);

        assert!(history.back());

        assert_eq!(history.len(), 3);
        assert_eq!(router.current_path(), "/about");
        assert_eq!(router_state(&store).current_path, "/about");
        assert_eq!(store.state()["scroll"], json!(120));
    }

    #[test]
    fn non_object_history_state_is_treated_as_empty() {
        let store = Store::default();
        let history = MemoryHistory::new("/");
        let _router = Router::new(
            &store,
            history.clone(),
            vec![Route::new("/*", page("any"))],
            RouterOptions::new(),
        )
        .unwrap();
        history.push_state("/elsewhere", &json!("not a map"));
        history.push_state("/last", &json!({}));

        assert!(history.back());

        assert_eq!(router_state(&store).current_path, "/elsewhere");
        assert_eq!(store.state().len(), 1);
    }

    #[test]
    fn extra_state_cannot_overwrite_router_key() {
        let store = Store::default();
        let router = Router::new(
            &store,
            MemoryHistory::new("/"),
            vec![Route::new("/*", page("any"))],
            RouterOptions::new(),
        )
        .unwrap();
        let mut extra = Map::new();
        extra.insert("router".into(), json!("hijack"));
        extra.insert("flag".into(), json!(true));

        router.handle_route_change("/next", extra);

        assert_eq!(router_state(&store).current_path, "/next");
        assert_eq!(store.state()["flag"], json!(true));
    }

    #[test]
    fn dropped_router_stops_listening() {
        let store = Store::default();
        let history = MemoryHistory::new("/");
        let router = Router::new(
            &store,
            history.clone(),
            vec![Route::new("/*", page("any"))],
            RouterOptions::new(),
        )
        .unwrap();
        router.navigate("/a");
        assert_eq!(history.listener_count(), 1);
        drop(router);
        let updates = counting(&store);

        assert!(history.back());

        assert_eq!(updates.get(), 0);
        assert_eq!(history.listener_count(), 0);
    }
}
