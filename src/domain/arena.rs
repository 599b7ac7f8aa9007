use std::collections::VecDeque;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

/// Handle to a category stored in a [`CategoryTree`].
///
/// Handles are cheap to copy and stay valid until the category is deleted.
/// A handle to a deleted category never aliases a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CategoryId(pub(crate) Index);

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug, Clone)]
pub struct CategoryNode {
    /// Name, unique among siblings
    pub name: String,
    /// Free-form description
    pub description: Option<String>,
    /// Image reference (URL or file name)
    pub image: Option<String>,
    /// Index of parent node in the arena, None for root nodes
    pub(crate) parent: Option<Index>,
    /// Indices of child nodes in the arena, in insertion order
    pub(crate) children: Vec<Index>,
}

impl CategoryNode {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            description: None,
            image: None,
            parent: None,
            children: Vec::new(),
        }
    }
}

impl fmt::Display for CategoryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Arena-based storage for one or more category hierarchies.
///
/// Parents own their children through `children`; the `parent` link is a plain
/// arena index and never keeps a node alive. Every node can act as the root of
/// the subtree below it, so queries and mutations take the node they are
/// relative to.
#[derive(Debug, Clone)]
pub struct CategoryTree {
    pub(crate) arena: Arena<CategoryNode>,
}

impl Default for CategoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    pub(crate) fn node(&self, id: CategoryId) -> Option<&CategoryNode> {
        self.arena.get(id.0)
    }

    pub(crate) fn node_mut(&mut self, id: CategoryId) -> Option<&mut CategoryNode> {
        self.arena.get_mut(id.0)
    }

    /// Number of categories stored, across all roots.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: CategoryId) -> bool {
        self.arena.contains(id.0)
    }

    pub fn name(&self, id: CategoryId) -> Option<&str> {
        self.node(id).map(|n| n.name.as_str())
    }

    pub fn description(&self, id: CategoryId) -> Option<&str> {
        self.node(id).and_then(|n| n.description.as_deref())
    }

    pub fn image(&self, id: CategoryId) -> Option<&str> {
        self.node(id).and_then(|n| n.image.as_deref())
    }

    pub fn parent(&self, id: CategoryId) -> Option<CategoryId> {
        self.node(id).and_then(|n| n.parent).map(CategoryId)
    }

    /// Children in insertion order. Empty for unknown handles.
    pub fn children(&self, id: CategoryId) -> Vec<CategoryId> {
        self.node(id)
            .map(|n| n.children.iter().copied().map(CategoryId).collect())
            .unwrap_or_default()
    }

    /// All categories without a parent, in arena order.
    pub fn roots(&self) -> Vec<CategoryId> {
        self.arena
            .iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(idx, _)| CategoryId(idx))
            .collect()
    }

    pub fn is_root(&self, id: CategoryId) -> bool {
        self.node(id).is_some_and(|n| n.parent.is_none())
    }

    pub fn is_leaf(&self, id: CategoryId) -> bool {
        self.node(id).is_some_and(|n| n.children.is_empty())
    }

    /// True if both share the same parent and are distinct. Roots have no siblings.
    pub fn is_sibling(&self, id: CategoryId, other: CategoryId) -> bool {
        if id == other {
            return false;
        }
        match (self.parent(id), self.parent(other)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Child of `parent` carrying `name`, if any.
    pub(crate) fn child_named(&self, parent: CategoryId, name: &str) -> Option<CategoryId> {
        let node = self.node(parent)?;
        node.children
            .iter()
            .copied()
            .find(|&idx| self.arena.get(idx).is_some_and(|c| c.name == name))
            .map(CategoryId)
    }

    /// True if `ancestor` is `id` itself or lies on the parent chain above it.
    #[instrument(level = "trace", skip(self))]
    pub fn is_ancestor_or_self(&self, ancestor: CategoryId, id: CategoryId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == ancestor {
                return true;
            }
            current = self.parent(node_id);
        }
        false
    }

    /// Pre-order traversal of the subtree rooted at `id`.
    #[instrument(level = "trace", skip(self))]
    pub fn descendants(&self, id: CategoryId) -> PreOrderIter<'_> {
        PreOrderIter::new(self, id)
    }

    /// Post-order traversal of the subtree rooted at `id`: children before parents.
    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self, id: CategoryId) -> PostOrderIter<'_> {
        PostOrderIter::new(self, id)
    }

    /// Breadth-first traversal yielding `(category, level below id)`.
    #[instrument(level = "trace", skip(self))]
    pub fn iter_levels(&self, id: CategoryId) -> LevelOrderIter<'_> {
        LevelOrderIter::new(self, id)
    }
}

pub struct PreOrderIter<'a> {
    tree: &'a CategoryTree,
    stack: Vec<Index>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a CategoryTree, start: CategoryId) -> Self {
        let mut stack = Vec::new();
        if tree.contains(start) {
            stack.push(start.0);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = (CategoryId, &'a CategoryNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.arena.get(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((CategoryId(current_idx), node));
            }
        }
        None
    }
}

pub struct PostOrderIter<'a> {
    tree: &'a CategoryTree,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a CategoryTree, start: CategoryId) -> Self {
        let mut stack = Vec::new();
        if tree.contains(start) {
            stack.push((start.0, false));
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = (CategoryId, &'a CategoryNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.arena.get(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((CategoryId(current_idx), node));
                }
            }
        }
        None
    }
}

pub struct LevelOrderIter<'a> {
    tree: &'a CategoryTree,
    queue: VecDeque<(Index, usize)>,
}

impl<'a> LevelOrderIter<'a> {
    fn new(tree: &'a CategoryTree, start: CategoryId) -> Self {
        let mut queue = VecDeque::new();
        if tree.contains(start) {
            queue.push_back((start.0, 0));
        }
        Self { tree, queue }
    }
}

impl<'a> Iterator for LevelOrderIter<'a> {
    type Item = (CategoryId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, level)) = self.queue.pop_front() {
            if let Some(node) = self.tree.arena.get(current_idx) {
                for &child in &node.children {
                    self.queue.push_back((child, level + 1));
                }
                return Some((CategoryId(current_idx), level));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // animal
    // ├── cat
    // │   └── lion
    // └── dog
    fn sample() -> (CategoryTree, [CategoryId; 4]) {
        let mut tree = CategoryTree::new();
        let animal = tree.create("animal").unwrap();
        let cat = tree.create("cat").unwrap();
        let dog = tree.create("dog").unwrap();
        let lion = tree.create("lion").unwrap();
        tree.add(animal, cat, None).unwrap();
        tree.add(animal, dog, None).unwrap();
        tree.add(animal, lion, Some("cat")).unwrap();
        (tree, [animal, cat, dog, lion])
    }

    #[test]
    fn test_predicates() {
        let (tree, [animal, cat, dog, lion]) = sample();
        assert!(tree.is_root(animal));
        assert!(!tree.is_root(cat));
        assert!(tree.is_leaf(lion));
        assert!(tree.is_leaf(dog));
        assert!(!tree.is_leaf(animal));
        assert!(tree.is_sibling(cat, dog));
        assert!(!tree.is_sibling(cat, cat));
        assert!(!tree.is_sibling(cat, lion));
        assert!(!tree.is_sibling(animal, animal));
    }

    #[test]
    fn test_roots_are_sibling_free() {
        let mut tree = CategoryTree::new();
        let a = tree.create("a").unwrap();
        let b = tree.create("b").unwrap();
        assert!(!tree.is_sibling(a, b));
        assert_eq!(tree.roots().len(), 2);
    }

    #[test]
    fn test_preorder_visits_children_left_to_right() {
        let (tree, [animal, ..]) = sample();
        let names: Vec<_> = tree.descendants(animal).map(|(_, n)| n.name.as_str()).collect();
        assert_eq!(names, ["animal", "cat", "lion", "dog"]);
    }

    #[test]
    fn test_postorder_visits_children_first() {
        let (tree, [animal, ..]) = sample();
        let names: Vec<_> = tree
            .iter_postorder(animal)
            .map(|(_, n)| n.name.as_str())
            .collect();
        assert_eq!(names, ["lion", "cat", "dog", "animal"]);
    }

    #[test]
    fn test_level_order_groups_by_level() {
        let (tree, [animal, cat, dog, lion]) = sample();
        let levels: Vec<_> = tree.iter_levels(animal).collect();
        assert_eq!(levels, [(animal, 0), (cat, 1), (dog, 1), (lion, 2)]);
    }

    #[test]
    fn test_is_ancestor_or_self() {
        let (tree, [animal, cat, dog, lion]) = sample();
        assert!(tree.is_ancestor_or_self(animal, lion));
        assert!(tree.is_ancestor_or_self(lion, lion));
        assert!(!tree.is_ancestor_or_self(dog, lion));
        assert!(!tree.is_ancestor_or_self(lion, cat));
    }
}
