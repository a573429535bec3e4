use crate::NodeId;

/// Error type produced by document operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The node was discarded, or never belonged to this document.
    #[error("node {0} does not exist in this document")]
    StaleNode(NodeId),
    /// The operation needs an element, but the node is text or a placeholder.
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),
    /// The node to remove is not a child of the given parent.
    #[error("node {child} is not a child of node {parent}")]
    NotAChild {
        /// The expected parent.
        parent: NodeId,
        /// The node that was asked to be removed.
        child: NodeId,
    },
    /// Inserting the node would make it its own ancestor.
    #[error("cannot insert a node into itself or one of its descendants")]
    HierarchyRequest,
}
