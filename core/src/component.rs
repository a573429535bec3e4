use std::rc::Rc;

use crate::{Node, State};

/// A function from the application state to a declarative tree.
#[derive(Clone)]
pub struct Component(Rc<dyn Fn(&State) -> Node>);

crate::impl_debug!(Component);

impl Component {
    /// Wraps a closure into a component.
    pub fn new(render: impl Fn(&State) -> Node + 'static) -> Self {
        Self(Rc::new(render))
    }

    /// Builds the tree for `state`.
    #[must_use]
    pub fn render(&self, state: &State) -> Node {
        (self.0)(state)
    }

    /// Returns `true` if both handles point at the same closure.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
