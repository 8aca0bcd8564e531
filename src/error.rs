//! Error types for index operations.

use thiserror::Error;

/// Errors returned by [`Index`](crate::Index) and [`SharedIndex`](crate::SharedIndex).
///
/// Every variant is recoverable: the index is left exactly as it was
/// before the failing call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// `add` or `search` called before the first `fit`.
    #[error("index is not fitted; call fit before add or search")]
    NotFitted,

    /// `fit` called on an index that is already fitted.
    #[error("index is already fitted; use add to extend it")]
    AlreadyFitted,

    /// A document id appeared twice in a corpus, or is already indexed.
    #[error("duplicate document id: {0}")]
    DuplicateDocumentId(String),

    /// `search` called with `k == 0`.
    #[error("k must be a positive integer")]
    InvalidK,
}

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;
