use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::{CategoryId, CategoryTree};

pub trait TreeDisplay {
    /// Render the subtree rooted at `at` as a printable box-drawing tree.
    fn to_tree_string(&self, at: CategoryId) -> Tree<String>;
}

impl TreeDisplay for CategoryTree {
    #[instrument(level = "trace", skip(self))]
    fn to_tree_string(&self, at: CategoryId) -> Tree<String> {
        fn build_tree(tree: &CategoryTree, id: CategoryId, parent_tree: &mut Tree<String>) {
            for child in tree.children(id) {
                if let Some(name) = tree.name(child) {
                    let mut child_tree = Tree::new(name.to_string());
                    build_tree(tree, child, &mut child_tree);
                    parent_tree.push(child_tree);
                }
            }
        }

        match self.name(at) {
            Some(name) => {
                let mut root = Tree::new(name.to_string());
                build_tree(self, at, &mut root);
                root
            }
            None => Tree::new("Empty tree".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_tree_string() {
        let mut tree = CategoryTree::new();
        let food = tree.create("food").unwrap();
        let fruits = tree.create_with("fruits", Some(food), &[]).unwrap();
        tree.create_with("apple", Some(fruits), &[]).unwrap();
        tree.create_with("vegetables", Some(food), &[]).unwrap();

        let rendered = tree.to_tree_string(food).to_string();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "food");
        assert!(lines[1].ends_with("fruits"));
        assert!(lines[2].ends_with("apple"));
        assert!(lines[3].ends_with("vegetables"));
    }

    #[test]
    fn test_stale_handle_renders_placeholder() {
        let mut tree = CategoryTree::new();
        let food = tree.create("food").unwrap();
        tree.create_with("fruits", Some(food), &[]).unwrap();
        let fruits = tree.get(food, "fruits").unwrap();
        tree.delete(food, "fruits").unwrap();
        assert_eq!(tree.to_tree_string(fruits).to_string().trim(), "Empty tree");
    }
}
