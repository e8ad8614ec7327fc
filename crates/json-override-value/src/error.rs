//! Errors raised by the value operations

/// Errors from merge, diff and value conversions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    /// A container argument was not an object
    #[error("invalid argument: {operation} expects an object for '{role}', got {found}")]
    InvalidArgument {
        operation: &'static str,
        role: &'static str,
        found: &'static str,
    },
}
