//! Declarative nodes and the tree builder.
//!
//! A [`Node`] describes what should be on screen without being attached to
//! anything. Components build a fresh tree on every render pass; the
//! renderer turns it into live nodes and the tree is dropped afterwards.

use crate::attr::{AttrValue, Attributes, format_number};

/// A declarative node.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Node {
    /// Nothing. Rendered as an inert placeholder and dropped from child lists.
    #[default]
    Empty,
    /// A text primitive.
    Text(String),
    /// A structured element.
    Element(Element),
}

/// A structured declarative element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    attributes: Attributes,
    children: Vec<Node>,
    key: Option<String>,
}

impl Element {
    /// Tag name, e.g. `"div"`.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attributes in insertion order.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Children; never contains [`Node::Empty`].
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Identity hint taken from the `key` attribute. Carried, not used for diffing.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}

impl Node {
    /// Returns `true` for [`Node::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the element, if this node is one.
    #[must_use]
    pub const fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the text, if this node is a text primitive.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Creates a text node.
#[must_use]
pub fn text(content: impl Into<String>) -> Node {
    Node::Text(content.into())
}

/// Builds a declarative element.
///
/// `children` accepts a single node, a string, an `Option`, a vector, an
/// array or a tuple. Empty entries are dropped. The `key` attribute, when
/// truthy, becomes the element's identity hint.
///
/// ```
/// use rill_core::{attrs, create_element, Node};
///
/// let node = create_element("ul", attrs!{ "class" => "todos" }, vec![
///     create_element("li", attrs!{ "key" => 1 }, "one"),
///     Node::Empty,
/// ]);
/// assert_eq!(node.as_element().unwrap().children().len(), 1);
/// ```
pub fn create_element(
    tag: impl Into<String>,
    attributes: Attributes,
    children: impl IntoChildren,
) -> Node {
    let key = attributes
        .get("key")
        .filter(|value| value.is_truthy())
        .and_then(AttrValue::as_string);
    let mut children = children.into_children();
    children.retain(|child| !child.is_empty());
    Node::Element(Element {
        tag: tag.into(),
        attributes,
        children,
        key,
    })
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<&String> for Node {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Element> for Node {
    fn from(value: Element) -> Self {
        Self::Element(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

macro_rules! impl_node_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Node {
                fn from(value: $ty) -> Self {
                    Self::Text(format_number(f64::from(value)))
                }
            }
        )*
    };
}

impl_node_from_number!(i8, i16, i32, u8, u16, u32, f32, f64);

macro_rules! impl_node_from_wide_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Node {
                fn from(value: $ty) -> Self {
                    Self::Text(value.to_string())
                }
            }
        )*
    };
}

impl_node_from_wide_integer!(i64, u64, usize, isize);

/// Conversion into an element's child list.
pub trait IntoChildren {
    /// Converts `self` into children. Empty entries may be included; the
    /// builder drops them.
    fn into_children(self) -> Vec<Node>;
}

impl IntoChildren for () {
    fn into_children(self) -> Vec<Node> {
        Vec::new()
    }
}

impl<T: Into<Node>> IntoChildren for Vec<T> {
    fn into_children(self) -> Vec<Node> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<Node>, const N: usize> IntoChildren for [T; N] {
    fn into_children(self) -> Vec<Node> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<Node>> IntoChildren for Option<T> {
    fn into_children(self) -> Vec<Node> {
        vec![Node::from(self)]
    }
}

macro_rules! impl_into_children_single {
    ($($ty:ty),*) => {
        $(
            impl IntoChildren for $ty {
                fn into_children(self) -> Vec<Node> {
                    vec![Node::from(self)]
                }
            }
        )*
    };
}

impl_into_children_single!(
    Node, Element, &str, &String, String, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize,
    f32, f64
);

macro_rules! impl_into_children_tuple {
    ($($ty:ident),*) => {
        #[allow(non_snake_case)]
        impl<$($ty: Into<Node>),*> IntoChildren for ($($ty,)*) {
            fn into_children(self) -> Vec<Node> {
                let ($($ty,)*) = self;
                vec![$($ty.into()),*]
            }
        }
    };
}

tuples!(impl_into_children_tuple);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs;

    fn children_of(node: &Node) -> &[Node] {
        node.as_element().map_or(&[][..], Element::children)
    }

    #[test]
    fn absent_children_are_dropped() {
        let node = create_element(
            "div",
            attrs!(),
            vec![Node::Empty, text("a"), None::<Node>.into(), text("b")],
        );
        assert_eq!(children_of(&node), [text("a"), text("b")]);
    }

    #[test]
    fn optional_children_are_dropped() {
        let node = create_element("div", attrs!(), vec![None, Some("a"), None, Some("b")]);
        assert_eq!(children_of(&node), [text("a"), text("b")]);
    }

    #[test]
    fn bare_child_is_wrapped() {
        let node = create_element("span", attrs!(), "hello");
        assert_eq!(children_of(&node), [text("hello")]);

        let node = create_element("span", attrs!(), 7);
        assert_eq!(children_of(&node), [text("7")]);
    }

    #[test]
    fn tuples_mix_child_types() {
        let node = create_element(
            "p",
            attrs!(),
            ("count: ", 3, create_element("b", attrs!(), "!")),
        );
        let children = children_of(&node);
        assert_eq!(children.len(), 3);
        assert_eq!(children[1], text("3"));
        assert_eq!(children[2].as_element().map(Element::tag), Some("b"));
    }

    #[test]
    fn key_is_taken_from_attributes() {
        let node = create_element("li", attrs! { "key" => "todo-1" }, ());
        assert_eq!(node.as_element().and_then(Element::key), Some("todo-1"));

        let node = create_element("li", attrs! { "key" => 12 }, ());
        assert_eq!(node.as_element().and_then(Element::key), Some("12"));

        let node = create_element("li", attrs! { "key" => "" }, ());
        assert_eq!(node.as_element().and_then(Element::key), None);
    }

    #[test]
    fn attributes_are_kept_verbatim() {
        let node = create_element("input", attrs! { "key" => "k", "checked" => false }, ());
        let element = node.as_element().unwrap();
        assert_eq!(element.attributes().len(), 2);
        assert_eq!(element.attributes().get("checked"), Some(&AttrValue::Bool(false)));
    }
}
