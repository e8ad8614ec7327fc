use crate::node::NodeId;

/// Errors from tree navigation and editing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// Only leaves carry editable values
    #[error("invalid edit: '{path}' is not a leaf")]
    InvalidEdit { path: String },

    #[error("unknown node: {0:?}")]
    UnknownNode(NodeId),

    /// Patches are objects, so the projected value must be one too
    #[error("cannot derive an override patch from a tree whose root is a {0}")]
    UnpatchableRoot(&'static str),
}
