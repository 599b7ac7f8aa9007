//! Path resolution and mutation of category hierarchies.
//!
//! All operations are relative to a category `at`, which acts as the root of
//! the tree being queried. Paths may optionally start with the name of `at`
//! itself: on a tree rooted at `food`, both `fruits/apple` and
//! `food/fruits/apple` resolve to the same category.
//!
//! Mutations validate everything up front and only then touch the arena, so a
//! failed call leaves the tree exactly as it was.

use std::collections::HashSet;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::{CategoryId, CategoryNode, CategoryTree};
use crate::domain::error::{CategoryError, CategoryResult};
use crate::domain::path::{validate_name, CategoryPath};

/// Changes applied by [`CategoryTree::update`]. Fields left as `None` are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl CategoryUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

impl CategoryTree {
    /// Create a standalone category, the root of its own singleton tree.
    #[instrument(level = "debug", skip(self))]
    pub fn create(&mut self, name: &str) -> CategoryResult<CategoryId> {
        self.create_with(name, None, &[])
    }

    /// Create a category, optionally attached under `parent` and adopting `children`.
    ///
    /// Adopted children are detached from whatever parent they had before.
    /// Fails without creating anything if the name collides with a sibling under
    /// `parent`, if two children share a name, or if a child is `parent` or one
    /// of its ancestors.
    #[instrument(level = "debug", skip(self))]
    pub fn create_with(
        &mut self,
        name: &str,
        parent: Option<CategoryId>,
        children: &[CategoryId],
    ) -> CategoryResult<CategoryId> {
        validate_name(name)?;

        let mut seen = HashSet::new();
        for &child in children {
            let child_name = self.name(child).ok_or(CategoryError::UnknownCategory)?;
            if !seen.insert(child_name) {
                return Err(CategoryError::NameCollision {
                    name: child_name.to_string(),
                    parent: name.to_string(),
                });
            }
        }

        if let Some(parent) = parent {
            if !self.contains(parent) {
                return Err(CategoryError::UnknownCategory);
            }
            let adopted: Vec<Index> = children.iter().map(|c| c.0).collect();
            if self.has_child_named(parent, name, &adopted) {
                return Err(self.collision(parent, name));
            }
            if let Some(&child) = children
                .iter()
                .find(|&&child| self.is_ancestor_or_self(child, parent))
            {
                return Err(CategoryError::Cycle {
                    node: self.display_path(child),
                    target: name.to_string(),
                });
            }
        }

        let id = CategoryId(self.arena.insert(CategoryNode::new(name.to_string())));
        for &child in children {
            self.attach(child, id);
        }
        if let Some(parent) = parent {
            self.attach(id, parent);
        }
        debug!("created category '{}'", name);
        Ok(id)
    }

    /// Resolve `path` strictly downwards from `at`.
    ///
    /// A leading segment equal to the name of `at` is skipped. Every remaining
    /// segment must name a child of the category reached so far. Malformed
    /// paths and dangling segments are misses.
    #[instrument(level = "trace", skip(self))]
    pub fn get(&self, at: CategoryId, path: &str) -> Option<CategoryId> {
        let path = CategoryPath::parse(path).ok()?;
        self.resolve(at, &path)
    }

    /// Resolve an already parsed path; see [`CategoryTree::get`].
    pub fn resolve(&self, at: CategoryId, path: &CategoryPath) -> Option<CategoryId> {
        let root = self.node(at)?;
        let mut segments = path.segments().peekable();
        if segments.peek() == Some(&root.name.as_str()) {
            segments.next();
        }
        segments.try_fold(at, |current, segment| self.child_named(current, segment))
    }

    /// Search-anywhere lookup.
    ///
    /// The first segment may name any category of the subtree; the rest of the
    /// path descends strictly from there. Candidates are tried in pre-order and
    /// the first one that resolves wins, so `find(food, "apple/red")` reaches
    /// `food/fruits/apple/red`.
    #[instrument(level = "trace", skip(self))]
    pub fn find(&self, at: CategoryId, path: &str) -> Option<CategoryId> {
        let path = CategoryPath::parse(path).ok()?;
        let Some(first) = path.first() else {
            return self.contains(at).then_some(at);
        };
        self.descendants(at)
            .filter(|(_, node)| node.name == first)
            .find_map(|(start, _)| {
                path.segments()
                    .skip(1)
                    .try_fold(start, |current, segment| self.child_named(current, segment))
            })
    }

    /// Attach `node` under the category at `path` (or directly under `at`).
    ///
    /// `node` is detached from its previous parent first. A node that is
    /// already a child of the target collides with itself (`NameCollision`).
    #[instrument(level = "debug", skip(self))]
    pub fn add(
        &mut self,
        at: CategoryId,
        node: CategoryId,
        path: Option<&str>,
    ) -> CategoryResult<()> {
        let name = self
            .name(node)
            .ok_or(CategoryError::UnknownCategory)?
            .to_string();
        let target = self.target(at, path.unwrap_or_default())?;

        if self.is_ancestor_or_self(node, target) {
            return Err(CategoryError::Cycle {
                node: self.display_path(node),
                target: self.display_path(target),
            });
        }
        if self.has_child_named(target, &name, &[]) {
            return Err(self.collision(target, &name));
        }

        self.attach(node, target);
        debug!("attached '{}' under '{}'", name, self.display_path(target));
        Ok(())
    }

    /// Move the category at `path` under the category at `new_parent_path`.
    ///
    /// Same failure modes as [`CategoryTree::add`], plus `PathNotFound` for a
    /// missing source and `RootMove` when the source has no parent. Moving a
    /// category under its current parent re-appends it as the last child.
    #[instrument(level = "debug", skip(self))]
    pub fn move_category(
        &mut self,
        at: CategoryId,
        path: &str,
        new_parent_path: &str,
    ) -> CategoryResult<()> {
        let node = self.target(at, path)?;
        if self.is_root(node) {
            return Err(CategoryError::RootMove);
        }
        let target = self.target(at, new_parent_path)?;
        if self.parent(node) == Some(target) {
            self.attach(node, target);
            debug!("moved '{}' to the end of its siblings", path);
            return Ok(());
        }
        self.add(at, node, Some(new_parent_path))
    }

    /// Remove the category at `path` together with its whole subtree.
    ///
    /// Returns `Ok(false)` when the path does not resolve, like a miss in
    /// [`CategoryTree::get`]. Handles into the removed subtree become stale.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, at: CategoryId, path: &str) -> CategoryResult<bool> {
        let Some(node) = self.get(at, path) else {
            debug!("nothing to delete at '{}'", path);
            return Ok(false);
        };
        if self.is_root(node) {
            return Err(CategoryError::RootDelete);
        }

        self.detach(node)?;
        let doomed: Vec<CategoryId> = self.iter_postorder(node).map(|(id, _)| id).collect();
        for id in &doomed {
            self.arena.remove(id.0);
        }
        debug!("deleted '{}' ({} categories)", path, doomed.len());
        Ok(true)
    }

    /// Unlink `node` from its parent, leaving it alive as a standalone root.
    #[instrument(level = "debug", skip(self))]
    pub fn detach(&mut self, node: CategoryId) -> CategoryResult<()> {
        let parent = self
            .node(node)
            .ok_or(CategoryError::UnknownCategory)?
            .parent;
        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.retain(|&c| c != node.0);
            }
            if let Some(node) = self.node_mut(node) {
                node.parent = None;
            }
        }
        Ok(())
    }

    /// Rename `node` and/or change its metadata in place.
    ///
    /// The new name is checked against the siblings of `node`, not against
    /// `node` itself, so renaming to the current name succeeds.
    #[instrument(level = "debug", skip(self))]
    pub fn update(&mut self, node: CategoryId, update: CategoryUpdate) -> CategoryResult<()> {
        if !self.contains(node) {
            return Err(CategoryError::UnknownCategory);
        }
        if let Some(name) = &update.name {
            validate_name(name)?;
            if let Some(parent) = self.parent(node) {
                if self.has_child_named(parent, name, &[node.0]) {
                    return Err(self.collision(parent, name));
                }
            }
        }

        let Some(category) = self.node_mut(node) else {
            return Err(CategoryError::UnknownCategory);
        };
        if let Some(name) = update.name {
            debug!("renaming '{}' to '{}'", category.name, name);
            category.name = name;
        }
        if let Some(description) = update.description {
            category.description = Some(description);
        }
        if let Some(image) = update.image {
            category.image = Some(image);
        }
        Ok(())
    }

    /// Categories exactly `depth` levels below `at`, grouped level by level.
    ///
    /// `get_by_depth(at, 0)` is `[at]`. Within the level, children follow
    /// their parents' order and their own insertion order.
    #[instrument(level = "trace", skip(self))]
    pub fn get_by_depth(&self, at: CategoryId, depth: usize) -> Vec<CategoryId> {
        self.iter_levels(at)
            .take_while(|&(_, level)| level <= depth)
            .filter(|&(_, level)| level == depth)
            .map(|(id, _)| id)
            .collect()
    }

    /// Number of categories in the subtree rooted at `at`, including `at`.
    #[instrument(level = "trace", skip(self))]
    pub fn size(&self, at: CategoryId) -> usize {
        self.descendants(at).count()
    }

    /// Size of the subtree at `path` below `at`.
    pub fn size_at(&self, at: CategoryId, path: &str) -> CategoryResult<usize> {
        let node = self.target(at, path)?;
        Ok(self.size(node))
    }

    /// Every leaf of the subtree rooted at `at`, in pre-order.
    #[instrument(level = "trace", skip(self))]
    pub fn leaves(&self, at: CategoryId) -> Vec<CategoryId> {
        self.descendants(at)
            .filter(|(_, node)| node.children.is_empty())
            .map(|(id, _)| id)
            .collect()
    }

    /// Number of levels in the subtree rooted at `at`; a leaf has depth 1.
    pub fn depth(&self, at: CategoryId) -> usize {
        self.iter_levels(at)
            .map(|(_, level)| level + 1)
            .max()
            .unwrap_or(0)
    }

    /// Path from the root of the tree containing `node` down to `node`.
    pub fn path_of(&self, node: CategoryId) -> Option<CategoryPath> {
        let mut names = Vec::new();
        let mut current = Some(node);
        while let Some(id) = current {
            let category = self.node(id)?;
            names.push(category.name.as_str());
            current = category.parent.map(CategoryId);
        }
        let mut path = CategoryPath::new();
        for name in names.into_iter().rev() {
            path.push(name);
        }
        Some(path)
    }

    /// Resolve a destination path for a mutation; an empty path means `at`.
    fn target(&self, at: CategoryId, path: &str) -> CategoryResult<CategoryId> {
        if !self.contains(at) {
            return Err(CategoryError::UnknownCategory);
        }
        let parsed = CategoryPath::parse(path)?;
        self.resolve(at, &parsed)
            .ok_or_else(|| CategoryError::PathNotFound(path.to_string()))
    }

    fn has_child_named(&self, parent: CategoryId, name: &str, exclude: &[Index]) -> bool {
        self.node(parent).is_some_and(|p| {
            p.children
                .iter()
                .filter(|idx| !exclude.contains(idx))
                .any(|&idx| self.arena.get(idx).is_some_and(|c| c.name == name))
        })
    }

    fn collision(&self, parent: CategoryId, name: &str) -> CategoryError {
        CategoryError::NameCollision {
            name: name.to_string(),
            parent: self.display_path(parent),
        }
    }

    fn display_path(&self, node: CategoryId) -> String {
        self.path_of(node).map(|p| p.to_string()).unwrap_or_default()
    }

    /// Link `child` under `parent`. Callers have already validated the move.
    fn attach(&mut self, child: CategoryId, parent: CategoryId) {
        if let Some(old_parent) = self.parent(child) {
            if let Some(old) = self.node_mut(old_parent) {
                old.children.retain(|&c| c != child.0);
            }
        }
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child.0);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing;

    #[ctor::ctor]
    fn init() {
        testing::init_test_setup();
    }

    // animal
    // ├── cat
    // │   ├── lion
    // │   └── tiger
    // │       └── white_tiger
    // └── dog
    fn animal() -> (CategoryTree, CategoryId) {
        let mut tree = CategoryTree::new();
        let animal = tree.create("animal").unwrap();
        let cat = tree.create_with("cat", Some(animal), &[]).unwrap();
        tree.create_with("dog", Some(animal), &[]).unwrap();
        tree.create_with("lion", Some(cat), &[]).unwrap();
        let tiger = tree.create_with("tiger", Some(cat), &[]).unwrap();
        tree.create_with("white_tiger", Some(tiger), &[]).unwrap();
        (tree, animal)
    }

    fn names(tree: &CategoryTree, ids: &[CategoryId]) -> Vec<String> {
        ids.iter()
            .map(|&id| tree.name(id).unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_get_with_and_without_root_prefix() {
        let (tree, animal) = animal();
        let tiger = tree.get(animal, "cat/tiger").unwrap();
        assert_eq!(tree.get(animal, "animal/cat/tiger"), Some(tiger));
        assert_eq!(tree.get(animal, ""), Some(animal));
        assert_eq!(tree.get(animal, "animal"), Some(animal));
        assert_eq!(tree.get(animal, "tiger"), None);
        assert_eq!(tree.get(animal, "cat//tiger"), None);
    }

    #[test]
    fn test_get_relative_to_subtree() {
        let (tree, animal) = animal();
        let cat = tree.get(animal, "cat").unwrap();
        let white = tree.get(animal, "cat/tiger/white_tiger").unwrap();
        assert_eq!(tree.get(cat, "tiger/white_tiger"), Some(white));
        assert_eq!(tree.get(cat, "cat/tiger/white_tiger"), Some(white));
        assert_eq!(tree.get(cat, "dog"), None);
    }

    #[test]
    fn test_find_searches_whole_subtree() {
        let (tree, animal) = animal();
        let white = tree.get(animal, "cat/tiger/white_tiger").unwrap();
        assert_eq!(tree.find(animal, "white_tiger"), Some(white));
        assert_eq!(tree.find(animal, "tiger/white_tiger"), Some(white));
        assert_eq!(tree.find(animal, "animal/cat/tiger/white_tiger"), Some(white));
        assert_eq!(tree.find(animal, "cat/white_tiger"), None);
        assert_eq!(tree.find(animal, ""), Some(animal));
    }

    #[test]
    fn test_add_under_path() {
        let (mut tree, animal) = animal();
        let wild_dog = tree.create("wild_dog").unwrap();
        tree.add(animal, wild_dog, Some("dog")).unwrap();
        let dog = tree.get(animal, "dog").unwrap();
        assert_eq!(tree.parent(wild_dog), Some(dog));
        assert_eq!(tree.children(dog), vec![wild_dog]);
    }

    #[test]
    fn test_add_missing_path_fails() {
        let (mut tree, animal) = animal();
        let bird = tree.create("bird").unwrap();
        assert_eq!(
            tree.add(animal, bird, Some("fish")),
            Err(CategoryError::PathNotFound("fish".into()))
        );
        assert!(tree.is_root(bird));
    }

    #[test]
    fn test_add_rejects_cycle() {
        let (mut tree, animal) = animal();
        let cat = tree.get(animal, "cat").unwrap();
        let result = tree.add(animal, cat, Some("cat/tiger"));
        assert!(matches!(result, Err(CategoryError::Cycle { .. })));
        assert!(tree.add(animal, cat, Some("cat")).is_err());
        assert_eq!(tree.size(animal), 6);
    }

    #[test]
    fn test_update_rename_and_metadata() {
        let (mut tree, animal) = animal();
        let cat = tree.get(animal, "cat").unwrap();
        tree.update(cat, CategoryUpdate::rename("cats").with_description("some description"))
            .unwrap();
        assert_eq!(tree.name(cat), Some("cats"));
        assert_eq!(tree.description(cat), Some("some description"));
        assert_eq!(tree.image(cat), None);
        assert_eq!(tree.get(animal, "cats"), Some(cat));
    }

    #[test]
    fn test_update_collision_leaves_node_untouched() {
        let (mut tree, animal) = animal();
        let cat = tree.get(animal, "cat").unwrap();
        let result = tree.update(cat, CategoryUpdate::rename("dog").with_image("cat.png"));
        assert_eq!(
            result,
            Err(CategoryError::NameCollision {
                name: "dog".into(),
                parent: "animal".into()
            })
        );
        assert_eq!(tree.name(cat), Some("cat"));
        assert_eq!(tree.image(cat), None);
    }

    #[test]
    fn test_update_same_name_succeeds() {
        let (mut tree, animal) = animal();
        let cat = tree.get(animal, "cat").unwrap();
        assert!(tree.update(cat, CategoryUpdate::rename("cat")).is_ok());
    }

    #[test]
    fn test_get_by_depth_orders_levels() {
        let (tree, animal) = animal();
        assert_eq!(tree.get_by_depth(animal, 0), vec![animal]);
        assert_eq!(names(&tree, &tree.get_by_depth(animal, 1)), ["cat", "dog"]);
        assert_eq!(names(&tree, &tree.get_by_depth(animal, 2)), ["lion", "tiger"]);
        assert_eq!(names(&tree, &tree.get_by_depth(animal, 3)), ["white_tiger"]);
        assert!(tree.get_by_depth(animal, 4).is_empty());
    }

    #[test]
    fn test_size_depth_and_leaves() {
        let (tree, animal) = animal();
        assert_eq!(tree.size(animal), 6);
        assert_eq!(tree.size_at(animal, "cat").unwrap(), 4);
        assert!(tree.size_at(animal, "fish").is_err());
        assert_eq!(tree.depth(animal), 4);
        assert_eq!(names(&tree, &tree.leaves(animal)), ["lion", "white_tiger", "dog"]);
    }

    #[test]
    fn test_path_of() {
        let (tree, animal) = animal();
        let white = tree.get(animal, "cat/tiger/white_tiger").unwrap();
        assert_eq!(
            tree.path_of(white).unwrap().to_string(),
            "animal/cat/tiger/white_tiger"
        );
        assert_eq!(tree.path_of(animal).unwrap().to_string(), "animal");
    }

    #[test]
    fn test_detach_keeps_subtree_alive() {
        let (mut tree, animal) = animal();
        let tiger = tree.get(animal, "cat/tiger").unwrap();
        tree.detach(tiger).unwrap();
        assert!(tree.is_root(tiger));
        assert_eq!(tree.size(tiger), 2);
        assert_eq!(tree.size(animal), 4);
        assert_eq!(tree.len(), 6);
    }

    #[test]
    fn test_move_under_current_parent_appends_last() {
        let mut tree = CategoryTree::new();
        let x = tree.create("x").unwrap();
        let b = tree.create_with("b", Some(x), &[]).unwrap();
        let d = tree.create_with("d", Some(x), &[]).unwrap();

        tree.move_category(x, "b", "x").unwrap();

        assert_eq!(tree.children(x), [d, b]);
        assert_eq!(tree.parent(b), Some(x));
    }
}
