//! Tree projection of JSON values
//!
//! [`Tree::build`] turns a [`JsonValue`](json_override_value::JsonValue) into
//! an arena of labeled nodes with parent back-references. Editing a leaf
//! through [`Tree::apply_edit`] yields the nested override patch that
//! reproduces the edit when merged onto the projected value.

mod error;
mod node;
mod patch;
mod tree;

pub use error::TreeError;
pub use node::{Node, NodeId, NodeKey, NodeKind};
pub use tree::{Row, Tree};
