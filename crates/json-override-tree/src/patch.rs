//! Leaf edits and override patch reconstruction
//!
//! An edit changes exactly one leaf. The patch is rebuilt by walking parent
//! links from that leaf to the root:
//! - under an object, the accumulated value is wrapped as `{ key: value }`
//! - under a list, the whole list is re-read from the tree, so every sibling
//!   contributes its current value and the list is replaced wholesale
//!
//! The walk stops at the root, whose own key is never part of the patch.

use json_override_value::{JsonValue, Scalar};

use crate::error::TreeError;
use crate::node::{NodeId, NodeKind};
use crate::tree::Tree;

impl Tree {
    /// Set the string value of the leaf `id`
    ///
    /// Containers cannot be edited; the tree is left unchanged on error.
    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) -> Result<(), TreeError> {
        self.ensure_leaf(id)?;
        self.nodes[id.0].value = Some(Scalar::String(value.into()));
        Ok(())
    }

    /// Edit the leaf `id` and return the override patch describing the edit
    pub fn apply_edit(&mut self, id: NodeId, value: impl Into<String>) -> Result<JsonValue, TreeError> {
        self.ensure_leaf(id)?;
        self.ensure_patchable()?;
        self.set_value(id, value)?;
        let patch = self.reconstruct_patch(id)?;
        tracing::debug!(path = %self.path_of(id), %patch, "reconstructed override patch");
        Ok(patch)
    }

    /// Build the nested patch for the current value of leaf `id`
    pub fn reconstruct_patch(&self, id: NodeId) -> Result<JsonValue, TreeError> {
        self.ensure_leaf(id)?;
        self.ensure_patchable()?;

        let mut current = id;
        let mut patch = self.to_value(id)?;
        while let Some(parent) = self.node(current)?.parent {
            patch = match self.node(parent)?.kind {
                NodeKind::List => self.to_value(parent)?,
                _ => JsonValue::wrap(self.node(current)?.key.to_string(), patch),
            };
            current = parent;
        }
        Ok(patch)
    }

    fn ensure_leaf(&self, id: NodeId) -> Result<(), TreeError> {
        if self.node(id)?.is_leaf() {
            Ok(())
        } else {
            Err(TreeError::InvalidEdit {
                path: self.path_of(id),
            })
        }
    }

    fn ensure_patchable(&self) -> Result<(), TreeError> {
        let root = self.node(self.root())?;
        match root.kind {
            NodeKind::RootObject => Ok(()),
            other => Err(TreeError::UnpatchableRoot(other.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use json_override_value::merge;
    use serde_json::json;

    fn v(value: serde_json::Value) -> JsonValue {
        JsonValue::from(value)
    }

    #[test]
    fn test_scalar_edit() {
        let view = v(json!({"a": {"b": {"c": 1, "d": 2}, "e": 3}}));
        let mut tree = Tree::build(&view);
        let leaf = tree.find("a.b.c").unwrap();

        let patch = tree.apply_edit(leaf, "9").unwrap();

        assert_eq!(patch, v(json!({"a": {"b": {"c": "9"}}})));
        assert_eq!(tree.get(leaf).unwrap().display_value(), "9");
    }

    #[test]
    fn test_list_edit_rewrites_whole_list() {
        let view = v(json!({"config_x": {"g": {"f": ["v0", "v1", "v2"]}}}));
        let mut tree = Tree::build(&view);
        let leaf = tree.find("config_x.g.f.1").unwrap();

        let patch = tree.apply_edit(leaf, "changed").unwrap();

        assert_eq!(
            patch,
            v(json!({"config_x": {"g": {"f": ["v0", "changed", "v2"]}}}))
        );
    }

    #[test]
    fn test_list_edit_keeps_sibling_kinds() {
        let view = v(json!({"c": {"f": [6, 7, {"deep": true}]}}));
        let mut tree = Tree::build(&view);
        let leaf = tree.find("c.f.0").unwrap();

        let patch = tree.apply_edit(leaf, "60").unwrap();

        assert_eq!(patch, v(json!({"c": {"f": ["60", 7, {"deep": true}]}})));
    }

    #[test]
    fn test_edit_inside_object_inside_list() {
        let view = v(json!({"c": {"hosts": [{"name": "a", "port": 1}, {"name": "b"}]}}));
        let mut tree = Tree::build(&view);
        let leaf = tree.find("c.hosts.0.port").unwrap();

        let patch = tree.apply_edit(leaf, "2").unwrap();

        assert_eq!(
            patch,
            v(json!({"c": {"hosts": [{"name": "a", "port": "2"}, {"name": "b"}]}}))
        );
    }

    #[test]
    fn test_nested_lists() {
        let view = v(json!({"c": {"grid": [[1, 2], [3, 4]]}}));
        let mut tree = Tree::build(&view);
        let leaf = tree.find("c.grid.1.0").unwrap();

        let patch = tree.apply_edit(leaf, "x").unwrap();

        assert_eq!(patch, v(json!({"c": {"grid": [[1, 2], ["x", 4]]}})));
    }

    #[test]
    fn test_patch_merges_back_onto_view() {
        let view = v(json!({"config_a": {"p": {"k": "old", "other": "same"}}}));
        let mut tree = Tree::build(&view);
        let leaf = tree.find("config_a.p.k").unwrap();

        let patch = tree.apply_edit(leaf, "new").unwrap();
        let merged = merge(&view, &patch).unwrap();

        assert_eq!(merged, tree.to_value(tree.root()).unwrap());
    }

    #[test]
    fn test_top_level_leaf() {
        let mut tree = Tree::build(&v(json!({"flag": "off"})));
        let leaf = tree.find("flag").unwrap();

        assert_eq!(tree.apply_edit(leaf, "on").unwrap(), v(json!({"flag": "on"})));
    }

    #[test]
    fn test_edit_container_is_invalid() {
        let view = v(json!({"a": {"b": {"c": 1}}}));
        let mut tree = Tree::build(&view);
        let branch = tree.find("a.b").unwrap();

        let err = tree.apply_edit(branch, "x").unwrap_err();

        assert_eq!(err, TreeError::InvalidEdit { path: "a.b".to_string() });
        assert_eq!(tree.to_value(tree.root()).unwrap(), view);
    }

    #[test]
    fn test_edit_root_is_invalid() {
        let mut tree = Tree::build(&v(json!({"a": "1"})));
        let root = tree.root();

        assert!(matches!(
            tree.set_value(root, "x"),
            Err(TreeError::InvalidEdit { .. })
        ));
    }

    #[test]
    fn test_list_root_is_unpatchable() {
        let mut tree = Tree::build(&v(json!(["a", "b"])));
        let leaf = tree.find("0").unwrap();

        assert_eq!(
            tree.apply_edit(leaf, "x").unwrap_err(),
            TreeError::UnpatchableRoot("list")
        );
        assert_eq!(tree.get(leaf).unwrap().display_value(), "a");
    }

    #[test]
    fn test_unknown_node() {
        let small = Tree::build(&v(json!({"a": "1"})));
        let large = Tree::build(&v(json!({"a": "1", "b": "2", "c": "3"})));
        let foreign = large.find("c").unwrap();

        assert_eq!(
            small.reconstruct_patch(foreign).unwrap_err(),
            TreeError::UnknownNode(foreign)
        );
    }
}
