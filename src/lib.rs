//! Hierarchical category trees.
//!
//! Categories are labeled nodes addressed by slash-delimited paths. Names are
//! unique among siblings only. Every category can act as the root of the tree
//! below it, so lookups and mutations take the category they are relative to:
//!
//! ```
//! use cattree::domain::{CategoryTree, CategoryUpdate};
//!
//! let mut tree = CategoryTree::new();
//! let animal = tree.create("animal").unwrap();
//! let cat = tree.create_with("cat", Some(animal), &[]).unwrap();
//! tree.create_with("dog", Some(animal), &[]).unwrap();
//! let lion = tree.create("lion").unwrap();
//! tree.add(animal, lion, Some("cat")).unwrap();
//!
//! assert_eq!(tree.get(animal, "animal/cat/lion"), Some(lion));
//! tree.move_category(animal, "cat/lion", "dog").unwrap();
//! assert_eq!(tree.get(animal, "cat/lion"), None);
//!
//! tree.update(cat, CategoryUpdate::rename("feline")).unwrap();
//! assert_eq!(tree.get(animal, "feline"), Some(cat));
//! assert_eq!(tree.size(animal), 4);
//! ```
//!
//! Handles returned by the tree observe later mutations (a renamed category
//! keeps its handle). The tree is single-owner: mutation needs `&mut`, so
//! sharing it across threads requires external locking.

pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{CategoryError, CategoryId, CategoryPath, CategoryResult, CategoryTree, CategoryUpdate};
