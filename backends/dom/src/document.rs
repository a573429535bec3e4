//! The materialized document.
//!
//! [`Document`] is an arena of live nodes addressed by [`NodeId`]. It plays
//! the part a browser document plays for a web renderer: the renderer
//! creates elements, text and placeholders in it, sets attributes and
//! properties, binds listeners, and hosts deliver events through
//! [`Document::dispatch_event`].
//!
//! A `Document` is a cheap handle; clones share the same nodes. Borrows of
//! the underlying arena never outlive a method call, so event handlers may
//! call back into the document (or trigger a whole re-render) while an event
//! is being dispatched.

use std::{cell::RefCell, collections::BTreeMap, fmt, rc::Rc};

use rill_core::{Event, EventHandler, StyleMap, attr::css_property_name};

use crate::DomError;

/// Identifier for a node stored inside a [`Document`].
///
/// Slots of discarded nodes are recycled; the generation makes ids of
/// discarded nodes stale instead of letting them alias the new occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    const fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns the raw slot index backing this identifier.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// A live property of an element, as opposed to a markup attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Property {
    /// A boolean property such as `checked`.
    Bool(bool),
    /// A string property such as `value` or `htmlFor`.
    Text(String),
}

/// The kind of a materialized node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// An element with a tag, attributes and children.
    Element,
    /// A text node.
    Text,
    /// An inert, empty placeholder standing in for an absent node.
    Placeholder,
}

#[derive(Debug)]
enum NodeKind {
    Element(ElementData),
    Text(String),
    Placeholder,
}

#[derive(Debug)]
struct ElementData {
    tag: String,
    attributes: BTreeMap<String, String>,
    properties: BTreeMap<String, Property>,
    class_list: Vec<String>,
    style: BTreeMap<String, String>,
    listeners: Vec<(String, EventHandler)>,
}

impl ElementData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            attributes: BTreeMap::new(),
            properties: BTreeMap::new(),
            class_list: Vec::new(),
            style: BTreeMap::new(),
            listeners: Vec::new(),
        }
    }

    fn css_text(&self) -> String {
        self.style
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect::<StyleMap>()
            .css_text()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "class" if !self.class_list.is_empty() => Some(self.class_list.join(" ")),
            "style" if !self.style.is_empty() => Some(self.css_text()),
            "class" | "style" => None,
            _ => self.attributes.get(name).cloned(),
        }
    }

    fn attribute_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.attributes.keys().cloned().collect();
        if !self.class_list.is_empty() {
            names.push("class".to_owned());
        }
        if !self.style.is_empty() {
            names.push("style".to_owned());
        }
        names.sort();
        names
    }
}

#[derive(Debug)]
struct NodeEntry {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    entry: Option<NodeEntry>,
}

#[derive(Debug)]
struct DocumentInner {
    slots: Vec<Slot>,
    free: Vec<usize>,
    body: NodeId,
}

impl DocumentInner {
    fn entry(&self, id: NodeId) -> Result<&NodeEntry, DomError> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_ref())
            .ok_or(DomError::StaleNode(id))
    }

    fn entry_mut(&mut self, id: NodeId) -> Result<&mut NodeEntry, DomError> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_mut())
            .ok_or(DomError::StaleNode(id))
    }

    fn element(&self, id: NodeId) -> Result<&ElementData, DomError> {
        match &self.entry(id)?.kind {
            NodeKind::Element(element) => Ok(element),
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        match &mut self.entry_mut(id)?.kind {
            NodeKind::Element(element) => Ok(element),
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    fn insert(&mut self, kind: NodeKind) -> NodeId {
        let entry = NodeEntry {
            parent: None,
            children: Vec::new(),
            kind,
        };
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.entry = Some(entry);
            return NodeId::new(index, slot.generation);
        }
        self.slots.push(Slot {
            generation: 0,
            entry: Some(entry),
        });
        NodeId::new(self.slots.len() - 1, 0)
    }

    fn detach(&mut self, id: NodeId) -> Result<(), DomError> {
        let Some(parent) = self.entry(id)?.parent else {
            return Ok(());
        };
        self.entry_mut(parent)?.children.retain(|child| *child != id);
        self.entry_mut(id)?.parent = None;
        Ok(())
    }

    fn free_subtree(&mut self, root: NodeId) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(slot) = self.slots.get_mut(id.index) else {
                continue;
            };
            if slot.generation != id.generation {
                continue;
            }
            if let Some(entry) = slot.entry.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index);
                stack.extend(entry.children);
            }
        }
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.entry(id).ok().and_then(|entry| entry.parent);
        }
        false
    }

    fn write_html(&self, id: NodeId, out: &mut String) -> Result<(), DomError> {
        let entry = self.entry(id)?;
        match &entry.kind {
            NodeKind::Text(text) => escape_into(out, text, false),
            NodeKind::Placeholder => out.push_str("<!---->"),
            NodeKind::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                for name in element.attribute_names() {
                    let value = element.attribute(&name).unwrap_or_default();
                    out.push(' ');
                    out.push_str(&name);
                    out.push_str("=\"");
                    escape_into(out, &value, true);
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&element.tag.as_str()) {
                    return Ok(());
                }
                for child in &entry.children {
                    self.write_html(*child, out)?;
                }
                out.push_str("</");
                out.push_str(&element.tag);
                out.push('>');
            }
        }
        Ok(())
    }

    fn write_text(&self, id: NodeId, out: &mut String) -> Result<(), DomError> {
        let entry = self.entry(id)?;
        if let NodeKind::Text(text) = &entry.kind {
            out.push_str(text);
        }
        for child in &entry.children {
            self.write_text(*child, out)?;
        }
        Ok(())
    }
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

fn escape_into(out: &mut String, text: &str, attribute: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

fn parse_css_text(text: &str) -> BTreeMap<String, String> {
    text.split(';')
        .filter_map(|declaration| declaration.split_once(':'))
        .map(|(name, value)| (name.trim(), value.trim()))
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, value)| (css_property_name(name).into_owned(), value.to_owned()))
        .collect()
}

/// A handle to a tree of materialized nodes rooted at a `body` element.
#[derive(Clone)]
pub struct Document {
    inner: Rc<RefCell<DocumentInner>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Document")
            .field("body", &inner.body)
            .field("slots", &inner.slots.len())
            .field("free", &inner.free.len())
            .finish()
    }
}

impl Document {
    /// Creates a document containing only an empty `body` element.
    #[must_use]
    pub fn new() -> Self {
        let mut inner = DocumentInner {
            slots: Vec::new(),
            free: Vec::new(),
            body: NodeId::new(0, 0),
        };
        inner.body = inner.insert(NodeKind::Element(ElementData::new("body")));
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    /// The `body` element every connected node descends from.
    #[must_use]
    pub fn body(&self) -> NodeId {
        self.inner.borrow().body
    }

    /// Creates a detached element.
    #[must_use]
    pub fn create_element(&self, tag: &str) -> NodeId {
        self.inner
            .borrow_mut()
            .insert(NodeKind::Element(ElementData::new(tag)))
    }

    /// Creates a detached text node.
    #[must_use]
    pub fn create_text_node(&self, text: &str) -> NodeId {
        self.inner
            .borrow_mut()
            .insert(NodeKind::Text(text.to_owned()))
    }

    /// Creates a detached placeholder: no attributes, no children, no text.
    #[must_use]
    pub fn create_placeholder(&self) -> NodeId {
        self.inner.borrow_mut().insert(NodeKind::Placeholder)
    }

    /// Returns `true` if `id` refers to a live node of this document.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.inner.borrow().entry(id).is_ok()
    }

    /// Number of live nodes, connected or not, including `body`.
    #[must_use]
    pub fn node_count(&self) -> usize {
        let inner = self.inner.borrow();
        inner.slots.len() - inner.free.len()
    }

    /// Returns the kind of a node.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::StaleNode`] if the node no longer exists.
    pub fn node_type(&self, id: NodeId) -> Result<NodeType, DomError> {
        Ok(match self.inner.borrow().entry(id)?.kind {
            NodeKind::Element(_) => NodeType::Element,
            NodeKind::Text(_) => NodeType::Text,
            NodeKind::Placeholder => NodeType::Placeholder,
        })
    }

    /// Appends `child` as the last child of `parent`, moving it if it is
    /// already attached elsewhere.
    ///
    /// # Errors
    ///
    /// Fails if either node is stale, if `parent` is not an element, or if
    /// `child` is `parent` or one of its ancestors.
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let mut inner = self.inner.borrow_mut();
        inner.element(parent)?;
        inner.entry(child)?;
        if inner.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }
        inner.detach(child)?;
        inner.entry_mut(parent)?.children.push(child);
        inner.entry_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Detaches `child` from `parent`. The node stays alive and can be
    /// inserted again.
    ///
    /// # Errors
    ///
    /// Fails if either node is stale or `child` is not a child of `parent`.
    pub fn remove_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let mut inner = self.inner.borrow_mut();
        if inner.entry(child)?.parent != Some(parent) {
            inner.entry(parent)?;
            return Err(DomError::NotAChild { parent, child });
        }
        inner.detach(child)
    }

    /// Discards every child of `parent`, freeing their whole subtrees.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::StaleNode`] if `parent` no longer exists.
    pub fn clear_children(&self, parent: NodeId) -> Result<(), DomError> {
        let mut inner = self.inner.borrow_mut();
        let children = std::mem::take(&mut inner.entry_mut(parent)?.children);
        tracing::trace!(%parent, discarded = children.len(), "clearing children");
        for child in children {
            inner.free_subtree(child);
        }
        Ok(())
    }

    /// Detaches `id` from its parent and frees it with its whole subtree.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::StaleNode`] if the node no longer exists.
    pub fn discard(&self, id: NodeId) -> Result<(), DomError> {
        let mut inner = self.inner.borrow_mut();
        inner.detach(id)?;
        inner.free_subtree(id);
        tracing::trace!(%id, "discarding subtree");
        Ok(())
    }

    /// Returns `true` if `ancestor` is `node` or one of its ancestors.
    #[must_use]
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.inner.borrow().is_inclusive_ancestor(ancestor, node)
    }

    /// Children of a node, in order.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::StaleNode`] if the node no longer exists.
    pub fn children(&self, id: NodeId) -> Result<Vec<NodeId>, DomError> {
        Ok(self.inner.borrow().entry(id)?.children.clone())
    }

    /// Parent of a node, `None` when detached.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::StaleNode`] if the node no longer exists.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, DomError> {
        Ok(self.inner.borrow().entry(id)?.parent)
    }

    /// Tag name of an element.
    ///
    /// # Errors
    ///
    /// Fails if the node is stale or not an element.
    pub fn tag_name(&self, id: NodeId) -> Result<String, DomError> {
        Ok(self.inner.borrow().element(id)?.tag.clone())
    }

    /// Data of a text node; `None` for elements and placeholders.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::StaleNode`] if the node no longer exists.
    pub fn text(&self, id: NodeId) -> Result<Option<String>, DomError> {
        Ok(match &self.inner.borrow().entry(id)?.kind {
            NodeKind::Text(text) => Some(text.clone()),
            _ => None,
        })
    }

    /// Concatenated text of the node and all its descendants.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::StaleNode`] if the node no longer exists.
    pub fn text_content(&self, id: NodeId) -> Result<String, DomError> {
        let mut out = String::new();
        self.inner.borrow().write_text(id, &mut out)?;
        Ok(out)
    }

    /// Sets a markup attribute.
    ///
    /// `class` replaces the class list and `style` replaces the inline style,
    /// so both stay in sync with [`Document::class_list`] and
    /// [`Document::style_property`].
    ///
    /// # Errors
    ///
    /// Fails if the node is stale or not an element.
    pub fn set_attribute(&self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let mut inner = self.inner.borrow_mut();
        let element = inner.element_mut(id)?;
        match name {
            "class" => {
                element.class_list = value.split_whitespace().map(str::to_owned).collect();
            }
            "style" => element.style = parse_css_text(value),
            _ => {
                element.attributes.insert(name.to_owned(), value.to_owned());
            }
        }
        Ok(())
    }

    /// Removes a markup attribute.
    ///
    /// # Errors
    ///
    /// Fails if the node is stale or not an element.
    pub fn remove_attribute(&self, id: NodeId, name: &str) -> Result<(), DomError> {
        let mut inner = self.inner.borrow_mut();
        let element = inner.element_mut(id)?;
        match name {
            "class" => element.class_list.clear(),
            "style" => element.style.clear(),
            _ => {
                element.attributes.remove(name);
            }
        }
        Ok(())
    }

    /// Reads a markup attribute. `None` if absent or if `id` is not a live element.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<String> {
        self.inner.borrow().element(id).ok()?.attribute(name)
    }

    /// Returns `true` if the attribute is present.
    #[must_use]
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Names of all present attributes, sorted. Empty for non-elements.
    #[must_use]
    pub fn attribute_names(&self, id: NodeId) -> Vec<String> {
        self.inner
            .borrow()
            .element(id)
            .map(ElementData::attribute_names)
            .unwrap_or_default()
    }

    /// Sets a live property.
    ///
    /// # Errors
    ///
    /// Fails if the node is stale or not an element.
    pub fn set_property(&self, id: NodeId, name: &str, value: Property) -> Result<(), DomError> {
        self.inner
            .borrow_mut()
            .element_mut(id)?
            .properties
            .insert(name.to_owned(), value);
        Ok(())
    }

    /// Reads a live property. `None` if unset or if `id` is not a live element.
    #[must_use]
    pub fn property(&self, id: NodeId, name: &str) -> Option<Property> {
        self.inner
            .borrow()
            .element(id)
            .ok()?
            .properties
            .get(name)
            .cloned()
    }

    /// Replaces the class list.
    ///
    /// # Errors
    ///
    /// Fails if the node is stale or not an element.
    pub fn set_class_list<I, S>(&self, id: NodeId, classes: I) -> Result<(), DomError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.borrow_mut().element_mut(id)?.class_list =
            classes.into_iter().map(Into::into).collect();
        Ok(())
    }

    /// The class list; empty for non-elements.
    #[must_use]
    pub fn class_list(&self, id: NodeId) -> Vec<String> {
        self.inner
            .borrow()
            .element(id)
            .map(|element| element.class_list.clone())
            .unwrap_or_default()
    }

    /// Returns `true` if the element carries `class`.
    #[must_use]
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.class_list(id).iter().any(|c| c == class)
    }

    /// Sets one inline style property. camelCase names are normalized.
    ///
    /// # Errors
    ///
    /// Fails if the node is stale or not an element.
    pub fn set_style_property(&self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.inner
            .borrow_mut()
            .element_mut(id)?
            .style
            .insert(css_property_name(name).into_owned(), value.to_owned());
        Ok(())
    }

    /// Reads one inline style property.
    #[must_use]
    pub fn style_property(&self, id: NodeId, name: &str) -> Option<String> {
        self.inner
            .borrow()
            .element(id)
            .ok()?
            .style
            .get(css_property_name(name).as_ref())
            .cloned()
    }

    /// Binds `handler` to events of kind `event` on the element.
    ///
    /// # Errors
    ///
    /// Fails if the node is stale or not an element.
    pub fn add_event_listener(
        &self,
        id: NodeId,
        event: &str,
        handler: EventHandler,
    ) -> Result<(), DomError> {
        self.inner
            .borrow_mut()
            .element_mut(id)?
            .listeners
            .push((event.to_owned(), handler));
        Ok(())
    }

    /// Returns `true` if the element has at least one listener for `event`.
    #[must_use]
    pub fn has_event_listener(&self, id: NodeId, event: &str) -> bool {
        self.inner
            .borrow()
            .element(id)
            .is_ok_and(|element| element.listeners.iter().any(|(kind, _)| kind == event))
    }

    /// Delivers `event` to `target`, then bubbles it through its ancestors
    /// until a handler stops propagation.
    ///
    /// The propagation path and its listeners are captured before the first
    /// handler runs, so handlers may rebuild the tree. Inspect
    /// [`Event::default_prevented`] afterwards to learn whether the host's
    /// default action was cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::StaleNode`] if `target` no longer exists.
    pub fn dispatch_event(&self, target: NodeId, event: &mut Event) -> Result<(), DomError> {
        let path: Vec<Vec<EventHandler>> = {
            let inner = self.inner.borrow();
            let mut path = Vec::new();
            let mut current = Some(target);
            while let Some(id) = current {
                let entry = inner.entry(id)?;
                if let NodeKind::Element(element) = &entry.kind {
                    path.push(
                        element
                            .listeners
                            .iter()
                            .filter(|(kind, _)| kind == event.kind())
                            .map(|(_, handler)| handler.clone())
                            .collect(),
                    );
                }
                current = entry.parent;
            }
            path
        };

        for handlers in path {
            for handler in handlers {
                handler.call(event);
            }
            if event.propagation_stopped() {
                break;
            }
        }
        Ok(())
    }

    /// Finds the first connected element whose `id` attribute equals `element_id`.
    #[must_use]
    pub fn get_element_by_id(&self, element_id: &str) -> Option<NodeId> {
        let inner = self.inner.borrow();
        let mut stack = vec![inner.body];
        while let Some(id) = stack.pop() {
            let Ok(entry) = inner.entry(id) else {
                continue;
            };
            if let NodeKind::Element(element) = &entry.kind {
                if element.attributes.get("id").is_some_and(|value| value == element_id) {
                    return Some(id);
                }
            }
            stack.extend(entry.children.iter().rev());
        }
        None
    }

    /// Serializes a node and its subtree as HTML.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::StaleNode`] if the node no longer exists.
    pub fn to_html(&self, id: NodeId) -> Result<String, DomError> {
        let mut out = String::new();
        self.inner.borrow().write_html(id, &mut out)?;
        Ok(out)
    }

    /// Serializes the children of a node as HTML.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::StaleNode`] if the node no longer exists.
    pub fn inner_html(&self, id: NodeId) -> Result<String, DomError> {
        let inner = self.inner.borrow();
        let mut out = String::new();
        for child in &inner.entry(id)?.children {
            inner.write_html(*child, &mut out)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn append_moves_nodes_between_parents() {
        let document = Document::new();
        let a = document.create_element("div");
        let b = document.create_element("div");
        let text = document.create_text_node("hi");

        document.append_child(a, text).unwrap();
        document.append_child(b, text).unwrap();

        assert!(document.children(a).unwrap().is_empty());
        assert_eq!(document.children(b).unwrap(), vec![text]);
        assert_eq!(document.parent(text).unwrap(), Some(b));
    }

    #[test]
    fn cannot_append_an_ancestor() {
        let document = Document::new();
        let outer = document.create_element("div");
        let inner = document.create_element("span");
        document.append_child(outer, inner).unwrap();

        assert_eq!(
            document.append_child(inner, outer),
            Err(DomError::HierarchyRequest)
        );
        assert_eq!(
            document.append_child(outer, outer),
            Err(DomError::HierarchyRequest)
        );
    }

    #[test]
    fn text_nodes_cannot_have_children() {
        let document = Document::new();
        let text = document.create_text_node("x");
        let child = document.create_element("b");
        assert_eq!(
            document.append_child(text, child),
            Err(DomError::NotAnElement(text))
        );
    }

    #[test]
    fn clearing_frees_whole_subtrees() {
        let document = Document::new();
        let body = document.body();
        let list = document.create_element("ul");
        let item = document.create_element("li");
        document.append_child(list, item).unwrap();
        document.append_child(body, list).unwrap();
        assert_eq!(document.node_count(), 3);

        document.clear_children(body).unwrap();

        assert_eq!(document.node_count(), 1);
        assert!(!document.contains(list));
        assert!(!document.contains(item));
        assert_eq!(document.children(item), Err(DomError::StaleNode(item)));
    }

    #[test]
    fn discard_detaches_and_frees_the_subtree() {
        let document = Document::new();
        let body = document.body();
        let list = document.create_element("ul");
        let item = document.create_element("li");
        document.append_child(list, item).unwrap();
        document.append_child(body, list).unwrap();

        document.discard(list).unwrap();

        assert_eq!(document.node_count(), 1);
        assert!(document.children(body).unwrap().is_empty());
        assert!(!document.contains(item));
        assert_eq!(document.discard(list), Err(DomError::StaleNode(list)));
    }

    #[test]
    fn recycled_slots_do_not_alias_stale_ids() {
        let document = Document::new();
        let body = document.body();
        let old = document.create_element("p");
        document.append_child(body, old).unwrap();
        document.clear_children(body).unwrap();

        let new = document.create_element("p");

        assert_eq!(old.index(), new.index());
        assert_ne!(old, new);
        assert!(document.contains(new));
        assert!(!document.contains(old));
    }

    #[test]
    fn remove_child_keeps_the_node_alive() {
        let document = Document::new();
        let parent = document.create_element("div");
        let child = document.create_element("span");
        let stranger = document.create_element("i");
        document.append_child(parent, child).unwrap();

        document.remove_child(parent, child).unwrap();

        assert!(document.contains(child));
        assert_eq!(document.parent(child).unwrap(), None);
        assert_eq!(
            document.remove_child(parent, stranger),
            Err(DomError::NotAChild {
                parent,
                child: stranger
            })
        );
    }

    #[test]
    fn class_and_style_attributes_reflect_their_lists() {
        let document = Document::new();
        let div = document.create_element("div");

        document.set_attribute(div, "class", "  a   b ").unwrap();
        document
            .set_attribute(div, "style", "color: red; backgroundColor: blue;;")
            .unwrap();

        assert_eq!(document.class_list(div), ["a", "b"]);
        assert_eq!(document.attribute(div, "class").as_deref(), Some("a b"));
        assert_eq!(
            document.style_property(div, "background-color").as_deref(),
            Some("blue")
        );
        assert_eq!(
            document.attribute(div, "style").as_deref(),
            Some("background-color: blue; color: red;")
        );

        document.remove_attribute(div, "class").unwrap();
        assert!(!document.has_attribute(div, "class"));
    }

    #[test]
    fn finds_connected_elements_by_id() {
        let document = Document::new();
        let detached = document.create_element("div");
        document.set_attribute(detached, "id", "root").unwrap();
        assert_eq!(document.get_element_by_id("root"), None);

        let wrapper = document.create_element("main");
        let root = document.create_element("div");
        document.set_attribute(root, "id", "root").unwrap();
        document.append_child(wrapper, root).unwrap();
        document.append_child(document.body(), wrapper).unwrap();

        assert_eq!(document.get_element_by_id("root"), Some(root));
    }

    #[test]
    fn events_bubble_until_stopped() {
        let document = Document::new();
        let outer = document.create_element("div");
        let middle = document.create_element("div");
        let button = document.create_element("button");
        document.append_child(outer, middle).unwrap();
        document.append_child(middle, button).unwrap();

        let trail = Rc::new(RefCell::new(Vec::new()));
        let listeners = [
            (button, "button", false),
            (middle, "middle", true),
            (outer, "outer", false),
        ];
        for (node, name, stop) in listeners {
            let trail = Rc::clone(&trail);
            document
                .add_event_listener(
                    node,
                    "click",
                    EventHandler::new(move |event| {
                        trail.borrow_mut().push(name);
                        if stop {
                            event.stop_propagation();
                        }
                    }),
                )
                .unwrap();
        }

        let mut event = Event::new("click");
        document.dispatch_event(button, &mut event).unwrap();

        assert_eq!(*trail.borrow(), ["button", "middle"]);
    }

    #[test]
    fn handlers_may_rebuild_the_tree_mid_dispatch() {
        let document = Document::new();
        let body = document.body();
        let button = document.create_element("button");
        document.append_child(body, button).unwrap();

        let handle = document.clone();
        let body_clicks = Rc::new(Cell::new(0));
        document
            .add_event_listener(
                button,
                "click",
                EventHandler::new(move |_| {
                    handle.clear_children(body).unwrap();
                    let replacement = handle.create_element("p");
                    handle.append_child(body, replacement).unwrap();
                }),
            )
            .unwrap();
        let counter = Rc::clone(&body_clicks);
        document
            .add_event_listener(
                body,
                "click",
                EventHandler::new(move |_| counter.set(counter.get() + 1)),
            )
            .unwrap();

        let mut event = Event::new("click");
        document.dispatch_event(button, &mut event).unwrap();

        assert!(!document.contains(button));
        assert_eq!(body_clicks.get(), 1);
        assert_eq!(document.inner_html(body).unwrap(), "<p></p>");
    }

    #[test]
    fn serializes_with_escaping_and_void_elements() {
        let document = Document::new();
        let form = document.create_element("form");
        let input = document.create_element("input");
        document.set_attribute(input, "placeholder", "say \"hi\" & <go>").unwrap();
        let text = document.create_text_node("1 < 2");
        let placeholder = document.create_placeholder();
        document.append_child(form, input).unwrap();
        document.append_child(form, text).unwrap();
        document.append_child(form, placeholder).unwrap();

        assert_eq!(
            document.to_html(form).unwrap(),
            "<form><input placeholder=\"say &quot;hi&quot; &amp; &lt;go&gt;\">1 &lt; 2<!----></form>"
        );
        assert_eq!(document.text_content(form).unwrap(), "1 < 2");
    }
}
