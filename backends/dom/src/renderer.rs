//! Materializes declarative trees into a [`Document`].
//!
//! Rendering always builds a brand new subtree, and [`mount`] always replaces
//! everything under the container. There is no reconciliation step: a render
//! pass costs time proportional to the size of the new tree.

use rill_core::{AttrValue, Element, Node};

use crate::{Document, DomError, NodeId, Property};

/// Attributes that are switched on by presence and mirrored to a live property.
const BOOLEAN_ATTRIBUTES: &[&str] = &["checked", "disabled", "selected", "autofocus"];

/// Elements whose `value` is a live property rather than a markup attribute.
const VALUE_ELEMENTS: &[&str] = &[
    "input", "textarea", "select", "option", "button", "output", "li", "meter", "progress",
    "data", "param",
];

/// Materializes `node` (and its subtree) as a detached node of `document`.
///
/// [`Node::Empty`] becomes an inert placeholder, text becomes a text node and
/// elements get their attributes applied and children rendered in order.
///
/// # Errors
///
/// Returns a [`DomError`] if the document rejects one of the operations.
pub fn render(document: &Document, node: &Node) -> Result<NodeId, DomError> {
    match node {
        Node::Empty => Ok(document.create_placeholder()),
        Node::Text(text) => Ok(document.create_text_node(text)),
        Node::Element(element) => render_element(document, element),
    }
}

/// Replaces all content of `container` with `node`.
///
/// The previous content is discarded; ids pointing into it become stale.
///
/// # Errors
///
/// Fails if `container` is not a live element, or if `node` is stale or an
/// inclusive ancestor of `container`. On failure `container` keeps its
/// content and `node` is left alive for the caller to reuse or discard.
pub fn mount(document: &Document, node: NodeId, container: NodeId) -> Result<(), DomError> {
    document.tag_name(container)?;
    document.node_type(node)?;
    if document.is_inclusive_ancestor(node, container) {
        return Err(DomError::HierarchyRequest);
    }
    // A node being re-mounted into its own container must survive the clear.
    if let Some(parent) = document.parent(node)? {
        document.remove_child(parent, node)?;
    }
    document.clear_children(container)?;
    document.append_child(container, node)
}

fn render_element(document: &Document, element: &Element) -> Result<NodeId, DomError> {
    let id = document.create_element(element.tag());
    if let Err(error) = populate(document, id, element) {
        document.discard(id)?;
        return Err(error);
    }
    Ok(id)
}

fn populate(document: &Document, id: NodeId, element: &Element) -> Result<(), DomError> {
    for (name, value) in element.attributes().iter() {
        apply_attribute(document, id, element.tag(), name, value)?;
    }
    for child in element.children() {
        if child.is_empty() {
            continue;
        }
        let child = render(document, child)?;
        if let Err(error) = document.append_child(id, child) {
            document.discard(child)?;
            return Err(error);
        }
    }
    Ok(())
}

fn apply_attribute(
    document: &Document,
    id: NodeId,
    tag: &str,
    name: &str,
    value: &AttrValue,
) -> Result<(), DomError> {
    if name == "key" || value.is_null() {
        return Ok(());
    }

    if let ("style", AttrValue::Style(style)) = (name, value) {
        for (property, value) in style.iter() {
            if let Some(value) = value {
                document.set_style_property(id, property, value)?;
            }
        }
        return Ok(());
    }

    if let (Some(event), AttrValue::Handler(handler)) = (event_name(name), value) {
        return document.add_event_listener(id, &event, handler.clone());
    }

    if BOOLEAN_ATTRIBUTES.contains(&name) {
        if value.is_truthy() {
            document.set_attribute(id, name, name)?;
            document.set_property(id, name, Property::Bool(true))?;
        }
        return Ok(());
    }

    let Some(text) = value.as_string() else {
        tracing::warn!(tag, attribute = name, "attribute value has no string form, skipping");
        return Ok(());
    };

    match name {
        "value" if VALUE_ELEMENTS.contains(&tag) => {
            document.set_property(id, "value", Property::Text(text))
        }
        "class" | "className" => document.set_class_list(id, text.split_whitespace()),
        "for" => {
            document.set_property(id, "htmlFor", Property::Text(text.clone()))?;
            document.set_attribute(id, "for", &text)
        }
        _ => document.set_attribute(id, name, &text),
    }
}

fn event_name(attribute: &str) -> Option<String> {
    attribute
        .strip_prefix("on")
        .filter(|event| !event.is_empty())
        .map(str::to_lowercase)
}
