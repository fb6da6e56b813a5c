//! Constant-time lookups over an immutable tree snapshot.
//!
//! The index is an arena of maps keyed by category id, rebuilt from scratch
//! for every snapshot. Nodes never point back at their parents; parent and
//! depth are answered from the maps instead.

use crate::error::TreeError;
use std::collections::HashMap;
use taxon_api::{CategoryId, CategoryNode, CategoryTree};

#[derive(Debug, Clone, Default)]
pub struct TreeIndex {
    /// `None` for roots
    parent_of: HashMap<CategoryId, Option<CategoryId>>,
    children_of: HashMap<CategoryId, Vec<CategoryId>>,
    /// Roots have depth 1
    depth_of: HashMap<CategoryId, usize>,
    name_of: HashMap<CategoryId, String>,
    roots: Vec<CategoryId>,
    max_depth: usize,
}

impl TreeIndex {
    /// An index with no categories ("tree not loaded yet").
    pub fn empty() -> Self {
        Self::default()
    }

    /// Index a snapshot.
    ///
    /// Ids are expected to be unique across the whole forest. If they are not,
    /// the node visited last wins; use [`TreeIndex::try_build`] to reject such
    /// snapshots instead.
    pub fn build(tree: &CategoryTree) -> Self {
        let (index, _) = Self::index_nodes(tree);
        index
    }

    /// Index a snapshot, rejecting duplicate ids.
    pub fn try_build(tree: &CategoryTree) -> Result<Self, TreeError> {
        match Self::index_nodes(tree) {
            (_, Some(duplicate)) => Err(TreeError::DuplicateId(duplicate)),
            (index, None) => Ok(index),
        }
    }

    fn index_nodes(tree: &CategoryTree) -> (Self, Option<CategoryId>) {
        let mut index = Self::default();
        let mut first_duplicate = None;

        // Depth-first, visiting siblings in order
        let mut stack: Vec<(&CategoryNode, Option<CategoryId>, usize)> = tree
            .roots()
            .iter()
            .rev()
            .map(|node| (node, None, 1))
            .collect();

        while let Some((node, parent, depth)) = stack.pop() {
            if index.depth_of.contains_key(&node.id) {
                first_duplicate.get_or_insert(node.id);
                // Last write wins; roots stay one entry per root id
                index.roots.retain(|&root| root != node.id);
            }
            if parent.is_none() {
                index.roots.push(node.id);
            }

            index.parent_of.insert(node.id, parent);
            index.depth_of.insert(node.id, depth);
            index.name_of.insert(node.id, node.name.clone());
            index
                .children_of
                .insert(node.id, node.children.iter().map(|c| c.id).collect());
            index.max_depth = index.max_depth.max(depth);

            for child in node.children.iter().rev() {
                stack.push((child, Some(node.id), depth + 1));
            }
        }

        tracing::debug!(
            "Indexed category tree: {} nodes, {} roots, max depth {}",
            index.len(),
            index.roots.len(),
            index.max_depth
        );

        (index, first_duplicate)
    }

    pub fn len(&self) -> usize {
        self.depth_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depth_of.is_empty()
    }

    pub fn contains(&self, id: CategoryId) -> bool {
        self.depth_of.contains_key(&id)
    }

    pub fn roots(&self) -> &[CategoryId] {
        &self.roots
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Parent of `id`; `None` for roots and for ids outside the snapshot.
    pub fn parent_of(&self, id: CategoryId) -> Option<CategoryId> {
        self.parent_of.get(&id).copied().flatten()
    }

    pub fn children_of(&self, id: CategoryId) -> &[CategoryId] {
        self.children_of.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Depth of `id` (roots are 1). Unknown ids report 0.
    pub fn depth_of(&self, id: CategoryId) -> usize {
        self.depth_of.get(&id).copied().unwrap_or(0)
    }

    pub fn name_of(&self, id: CategoryId) -> Option<&str> {
        self.name_of.get(&id).map(String::as_str)
    }

    /// Ancestors of `id`, nearest parent first, ending at a root.
    ///
    /// Empty for roots and unknown ids.
    pub fn ancestors_of(&self, id: CategoryId) -> Vec<CategoryId> {
        let mut ancestors = Vec::new();
        let mut current = self.parent_of(id);
        // Bounded by the node count: duplicate ids can splice a parent loop
        while let Some(parent) = current {
            if ancestors.len() >= self.len() {
                break;
            }
            ancestors.push(parent);
            current = self.parent_of(parent);
        }
        ancestors
    }

    /// `true` iff `ancestor == id` or `ancestor` lies on the parent chain of `id`.
    pub fn is_ancestor_or_self(&self, ancestor: CategoryId, id: CategoryId) -> bool {
        ancestor == id || self.ancestors_of(id).contains(&ancestor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn electronics() -> CategoryTree {
        CategoryTree::new(vec![
            CategoryNode::with_children(
                1,
                "Electronics",
                vec![CategoryNode::with_children(
                    2,
                    "Phones",
                    vec![CategoryNode::leaf(3, "Android"), CategoryNode::leaf(4, "iOS")],
                )],
            ),
            CategoryNode::leaf(10, "Books"),
        ])
    }

    #[test]
    fn test_build_maps() {
        let index = TreeIndex::build(&electronics());

        assert_eq!(index.len(), 5);
        assert_eq!(index.roots(), &[CategoryId(1), CategoryId(10)]);
        assert_eq!(index.parent_of(CategoryId(3)), Some(CategoryId(2)));
        assert_eq!(index.parent_of(CategoryId(1)), None);
        assert_eq!(index.children_of(CategoryId(2)), &[CategoryId(3), CategoryId(4)]);
        assert!(index.children_of(CategoryId(4)).is_empty());
        assert_eq!(index.depth_of(CategoryId(1)), 1);
        assert_eq!(index.depth_of(CategoryId(4)), 3);
        assert_eq!(index.max_depth(), 3);
        assert_eq!(index.name_of(CategoryId(4)), Some("iOS"));
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let index = TreeIndex::build(&electronics());

        assert_eq!(
            index.ancestors_of(CategoryId(3)),
            vec![CategoryId(2), CategoryId(1)]
        );
        assert!(index.ancestors_of(CategoryId(1)).is_empty());
        assert!(index.is_ancestor_or_self(CategoryId(1), CategoryId(4)));
        assert!(index.is_ancestor_or_self(CategoryId(4), CategoryId(4)));
        assert!(!index.is_ancestor_or_self(CategoryId(3), CategoryId(4)));
        assert!(!index.is_ancestor_or_self(CategoryId(10), CategoryId(4)));
    }

    #[test]
    fn test_unknown_ids_are_orphans() {
        let index = TreeIndex::build(&electronics());
        let ghost = CategoryId(999);

        assert!(!index.contains(ghost));
        assert_eq!(index.depth_of(ghost), 0);
        assert_eq!(index.parent_of(ghost), None);
        assert!(index.ancestors_of(ghost).is_empty());
        assert!(index.is_ancestor_or_self(ghost, ghost));
    }

    #[test]
    fn test_empty_index() {
        let index = TreeIndex::empty();
        assert!(index.is_empty());
        assert_eq!(index.max_depth(), 0);
        assert!(index.roots().is_empty());
    }

    #[test]
    fn test_duplicate_ids() {
        let tree = CategoryTree::new(vec![
            CategoryNode::with_children(1, "A", vec![CategoryNode::leaf(2, "B")]),
            CategoryNode::with_children(3, "C", vec![CategoryNode::leaf(2, "B again")]),
        ]);

        // Last write wins
        let index = TreeIndex::build(&tree);
        assert_eq!(index.parent_of(CategoryId(2)), Some(CategoryId(3)));
        assert_eq!(index.name_of(CategoryId(2)), Some("B again"));

        assert_eq!(
            TreeIndex::try_build(&tree).unwrap_err(),
            TreeError::DuplicateId(CategoryId(2))
        );
        assert!(TreeIndex::try_build(&electronics()).is_ok());
    }

    #[test]
    fn test_duplicate_root_listed_once() {
        let tree = CategoryTree::new(vec![
            CategoryNode::leaf(1, "A"),
            CategoryNode::leaf(5, "E"),
            CategoryNode::leaf(1, "A again"),
        ]);
        let index = TreeIndex::build(&tree);

        assert_eq!(index.roots(), &[CategoryId(5), CategoryId(1)]);
        assert_eq!(index.len(), 2);

        // A root that reappears as a child is no longer a root
        let tree = CategoryTree::new(vec![
            CategoryNode::leaf(2, "B"),
            CategoryNode::with_children(1, "A", vec![CategoryNode::leaf(2, "B again")]),
        ]);
        let index = TreeIndex::build(&tree);
        assert_eq!(index.roots(), &[CategoryId(1)]);
        assert_eq!(index.parent_of(CategoryId(2)), Some(CategoryId(1)));
    }

    #[test]
    fn test_self_nested_duplicate_terminates() {
        // 1 -> 2 -> 1: the second visit of 1 makes parent_of a loop
        let tree = CategoryTree::new(vec![CategoryNode::with_children(
            1,
            "A",
            vec![CategoryNode::with_children(2, "B", vec![CategoryNode::leaf(1, "A")])],
        )]);
        let index = TreeIndex::build(&tree);

        assert!(index.ancestors_of(CategoryId(1)).len() <= index.len());
        assert!(index.is_ancestor_or_self(CategoryId(2), CategoryId(1)));
    }
}
