//! Tree node types

use std::fmt;

use json_override_value::Scalar;

/// Index of a node inside its [`Tree`](crate::Tree)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Position of a node within its parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKey {
    /// The top of the tree
    Root,
    /// Object member
    Name(String),
    /// List element
    Index(usize),
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Root => f.write_str("root"),
            NodeKey::Name(name) => f.write_str(name),
            NodeKey::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Resolved kind of the value a node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Top-level object (the document-name wrapper of an effective view)
    RootObject,
    Object,
    List,
    Scalar,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::RootObject | NodeKind::Object => "object",
            NodeKind::List => "list",
            NodeKind::Scalar => "scalar",
        }
    }
}

/// One position in the projected value
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) row: usize,
    pub(crate) key: NodeKey,
    pub(crate) kind: NodeKind,
    pub(crate) value: Option<Scalar>,
}

impl Node {
    /// Parent node, `None` for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Position among the parent's children (0 for the root)
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn key(&self) -> &NodeKey {
        &self.key
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Leaf value, `None` for containers
    pub fn value(&self) -> Option<&Scalar> {
        self.value.as_ref()
    }

    pub fn is_leaf(&self) -> bool {
        self.kind == NodeKind::Scalar
    }

    /// String form of the value; empty for containers
    pub fn display_value(&self) -> String {
        self.value
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }
}
