//! Merge errors.

/// Errors raised while folding fragments together.
///
/// These point at a bug in how a fragment was built, not at a runtime
/// condition worth recovering from.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    #[error(
        "shape mismatch for field '{field}': '{first}' supplies a {first_shape}, \
         '{second}' supplies a {second_shape}"
    )]
    ShapeMismatch {
        field: String,
        first: String,
        first_shape: &'static str,
        second: String,
        second_shape: &'static str,
    },
}
