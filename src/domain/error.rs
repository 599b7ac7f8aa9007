//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the tree invariants.
/// A failed operation never leaves the tree partially mutated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CategoryError {
    #[error("category '{0}' does not exist in the tree")]
    PathNotFound(String),

    #[error("name '{name}' already exists under '{parent}'")]
    NameCollision { name: String, parent: String },

    #[error("cannot place '{node}' under '{target}': it is the node itself or one of its descendants")]
    Cycle { node: String, target: String },

    #[error("root category cannot be deleted")]
    RootDelete,

    #[error("root category cannot be moved")]
    RootMove,

    #[error("invalid path: '{0}'")]
    InvalidPath(String),

    #[error("invalid category name: '{0}'")]
    InvalidName(String),

    #[error("category handle is not part of this tree")]
    UnknownCategory,
}

/// Result type for tree operations.
pub type CategoryResult<T> = Result<T, CategoryError>;
