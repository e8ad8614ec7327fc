//! JSON value model for the override editor
//!
//! Provides the tagged [`JsonValue`] union together with the two operations
//! the override store is built on:
//! - [`merge`]: apply a patch onto a base object (intersection of keys only)
//! - [`diff`]: compute the minimal patch turning one object into another

mod ascii;
mod diff;
mod error;
mod merge;
mod value;

pub use ascii::to_ascii_json;
pub use diff::diff;
pub use error::ValueError;
pub use merge::{merge, merge_layers, merge_with, MergeMode};
pub use value::{JsonValue, Object, Scalar};
