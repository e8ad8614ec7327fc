//! Arena-backed tree built from a JSON value
//!
//! Children are owned by the arena and listed by their parent; the parent
//! link is a plain [`NodeId`] used only for upward walks. Object members are
//! laid out in key order, list elements in positional order, so two builds
//! from equal values produce identical ids, rows and keys.

use json_override_value::{JsonValue, Object};

use crate::error::TreeError;
use crate::node::{Node, NodeId, NodeKey, NodeKind};

/// Navigable projection of a [`JsonValue`]
#[derive(Debug, Clone)]
pub struct Tree {
    pub(crate) nodes: Vec<Node>,
}

/// A node flattened for display, in depth-first order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: NodeId,
    /// Distance from the root (top-level members have depth 0)
    pub depth: usize,
    pub key: String,
    pub value: String,
}

impl Tree {
    /// Project `value` into a fresh tree
    pub fn build(value: &JsonValue) -> Self {
        let mut tree = Tree { nodes: Vec::new() };
        tree.insert(value, None, 0, NodeKey::Root);
        tree
    }

    fn insert(
        &mut self,
        value: &JsonValue,
        parent: Option<NodeId>,
        row: usize,
        key: NodeKey,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let kind = match value {
            JsonValue::Object(_) if parent.is_none() => NodeKind::RootObject,
            JsonValue::Object(_) => NodeKind::Object,
            JsonValue::List(_) => NodeKind::List,
            JsonValue::Scalar(_) => NodeKind::Scalar,
        };
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            row,
            key,
            kind,
            value: value.as_scalar().cloned(),
        });

        let children: Vec<NodeId> = match value {
            JsonValue::Object(map) => map
                .iter()
                .enumerate()
                .map(|(row, (name, member))| {
                    self.insert(member, Some(id), row, NodeKey::Name(name.clone()))
                })
                .collect(),
            JsonValue::List(items) => items
                .iter()
                .enumerate()
                .map(|(row, item)| self.insert(item, Some(id), row, NodeKey::Index(row)))
                .collect(),
            JsonValue::Scalar(_) => Vec::new(),
        };
        self.nodes[id.0].children = children;
        id
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the root has no descendants
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.get(id).ok_or(TreeError::UnknownNode(id))
    }

    /// Child of `id` at `row`
    pub fn child(&self, id: NodeId, row: usize) -> Option<NodeId> {
        self.get(id)?.children.get(row).copied()
    }

    /// Find a node by dot-separated path; numeric segments select list rows
    ///
    /// Keys that contain a `.` cannot be addressed this way; walk such
    /// nodes with [`Tree::child`] instead.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        let mut current = self.root();
        if path.is_empty() {
            return Some(current);
        }
        for segment in path.split('.') {
            current = self
                .get(current)?
                .children
                .iter()
                .copied()
                .find(|child| self.nodes[child.0].key.to_string() == segment)?;
        }
        Some(current)
    }

    /// Dot-separated path of `id` from the root (empty for the root)
    pub fn path_of(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = self.get(id);
        while let Some(node) = current {
            if node.parent.is_none() {
                break;
            }
            segments.push(node.key.to_string());
            current = node.parent.and_then(|parent| self.get(parent));
        }
        segments.reverse();
        segments.join(".")
    }

    /// Re-read the current value of the subtree under `id`
    pub fn to_value(&self, id: NodeId) -> Result<JsonValue, TreeError> {
        let node = self.node(id)?;
        Ok(match node.kind {
            NodeKind::RootObject | NodeKind::Object => {
                let mut members = Object::new();
                for child in &node.children {
                    members.insert(self.nodes[child.0].key.to_string(), self.to_value(*child)?);
                }
                JsonValue::Object(members)
            }
            NodeKind::List => JsonValue::List(
                node.children
                    .iter()
                    .map(|child| self.to_value(*child))
                    .collect::<Result<_, _>>()?,
            ),
            NodeKind::Scalar => match &node.value {
                Some(scalar) => JsonValue::Scalar(scalar.clone()),
                None => JsonValue::Scalar(json_override_value::Scalar::Null),
            },
        })
    }

    /// Depth-first listing of every node below the root
    pub fn rows(&self) -> Vec<Row> {
        let mut rows = Vec::with_capacity(self.nodes.len().saturating_sub(1));
        let mut stack: Vec<(NodeId, usize)> = self.nodes[0]
            .children
            .iter()
            .rev()
            .map(|child| (*child, 0))
            .collect();
        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id.0];
            rows.push(Row {
                id,
                depth,
                key: node.key.to_string(),
                value: node.display_value(),
            });
            stack.extend(node.children.iter().rev().map(|child| (*child, depth + 1)));
        }
        rows
    }
}
