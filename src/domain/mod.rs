//! Domain layer: the category tree and its invariants
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod display;
pub mod error;
pub mod path;
pub mod tree;

pub use arena::{CategoryId, CategoryNode, CategoryTree};
pub use display::TreeDisplay;
pub use error::{CategoryError, CategoryResult};
pub use path::{validate_name, CategoryPath};
pub use tree::CategoryUpdate;
