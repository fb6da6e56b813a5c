use crate::error::TreeError;
use std::collections::{HashMap, HashSet};
use taxon_api::{CategoryId, CategoryNode, CategoryTree, FlatCategory};

/// Deepest nesting accepted from a flat listing, matching serde_json's
/// recursion limit for nested documents.
pub const MAX_DEPTH: usize = 128;

/// Build a nested tree from a flat `(id, name, parent_id)` listing.
///
/// Siblings keep the order in which they appear in `records`. The listing is
/// validated up front: duplicate ids, dangling parents, parent cycles and
/// chains deeper than [`MAX_DEPTH`] are rejected, so the result is always a
/// well-formed forest.
pub fn assemble_flat(records: &[FlatCategory]) -> Result<CategoryTree, TreeError> {
    let mut parent_of: HashMap<CategoryId, Option<CategoryId>> = HashMap::new();
    for record in records {
        if parent_of.insert(record.id, record.parent_id).is_some() {
            return Err(TreeError::DuplicateId(record.id));
        }
    }

    for record in records {
        if let Some(parent) = record.parent_id {
            if !parent_of.contains_key(&parent) {
                return Err(TreeError::UnknownParent {
                    id: record.id,
                    parent,
                });
            }
        }
    }

    check_chains(records, &parent_of)?;

    let mut children: HashMap<Option<CategoryId>, Vec<&FlatCategory>> = HashMap::new();
    for record in records {
        children.entry(record.parent_id).or_default().push(record);
    }

    let roots = children
        .get(&None)
        .map(|roots| {
            roots
                .iter()
                .map(|record| build_node(record, &children))
                .collect()
        })
        .unwrap_or_default();

    Ok(CategoryTree::new(roots))
}

fn check_chains(
    records: &[FlatCategory],
    parent_of: &HashMap<CategoryId, Option<CategoryId>>,
) -> Result<(), TreeError> {
    // Depth of every id whose parent chain is known to end at a root
    let mut depth_of: HashMap<CategoryId, usize> = HashMap::new();

    for record in records {
        let mut path: Vec<CategoryId> = Vec::new();
        let mut on_path: HashSet<CategoryId> = HashSet::new();
        let mut current = Some(record.id);
        let mut base = 0;

        while let Some(id) = current {
            if let Some(&depth) = depth_of.get(&id) {
                base = depth;
                break;
            }
            if !on_path.insert(id) {
                return Err(TreeError::Cycle(id));
            }
            if base + path.len() >= MAX_DEPTH {
                return Err(TreeError::TooDeep {
                    id: record.id,
                    limit: MAX_DEPTH,
                });
            }
            path.push(id);
            current = parent_of.get(&id).copied().flatten();
        }

        if base + path.len() > MAX_DEPTH {
            return Err(TreeError::TooDeep {
                id: record.id,
                limit: MAX_DEPTH,
            });
        }
        for (offset, id) in path.into_iter().rev().enumerate() {
            depth_of.insert(id, base + offset + 1);
        }
    }

    Ok(())
}

fn build_node(
    record: &FlatCategory,
    children: &HashMap<Option<CategoryId>, Vec<&FlatCategory>>,
) -> CategoryNode {
    let kids = children
        .get(&Some(record.id))
        .map(|kids| kids.iter().map(|kid| build_node(kid, children)).collect())
        .unwrap_or_default();

    CategoryNode {
        id: record.id,
        name: record.name.clone(),
        children: kids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeIndex;

    fn flat(id: i64, name: &str, parent: Option<i64>) -> FlatCategory {
        FlatCategory {
            id: CategoryId(id),
            name: name.to_string(),
            parent_id: parent.map(CategoryId),
        }
    }

    #[test]
    fn test_assemble_preserves_sibling_order() {
        // Children listed before their parent
        let records = vec![
            flat(4, "iOS", Some(2)),
            flat(3, "Android", Some(2)),
            flat(1, "Electronics", None),
            flat(2, "Phones", Some(1)),
            flat(10, "Books", None),
        ];
        let tree = assemble_flat(&records).unwrap();

        let expected = CategoryTree::new(vec![
            CategoryNode::with_children(
                1,
                "Electronics",
                vec![CategoryNode::with_children(
                    2,
                    "Phones",
                    vec![CategoryNode::leaf(4, "iOS"), CategoryNode::leaf(3, "Android")],
                )],
            ),
            CategoryNode::leaf(10, "Books"),
        ]);
        assert_eq!(tree, expected);

        let index = TreeIndex::try_build(&tree).unwrap();
        assert_eq!(index.depth_of(CategoryId(3)), 3);
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let records = vec![flat(1, "A", None), flat(1, "A'", None)];
        assert_eq!(
            assemble_flat(&records),
            Err(TreeError::DuplicateId(CategoryId(1)))
        );
    }

    #[test]
    fn test_rejects_unknown_parent() {
        let records = vec![flat(1, "A", None), flat(2, "B", Some(7))];
        assert_eq!(
            assemble_flat(&records),
            Err(TreeError::UnknownParent {
                id: CategoryId(2),
                parent: CategoryId(7)
            })
        );
    }

    #[test]
    fn test_rejects_cycles() {
        let records = vec![
            flat(1, "Root", None),
            flat(2, "A", Some(3)),
            flat(3, "B", Some(2)),
        ];
        assert!(matches!(assemble_flat(&records), Err(TreeError::Cycle(_))));

        let self_parent = vec![flat(5, "Loop", Some(5))];
        assert_eq!(
            assemble_flat(&self_parent),
            Err(TreeError::Cycle(CategoryId(5)))
        );
    }

    #[test]
    fn test_rejects_chains_past_depth_limit() {
        let chain = |len: i64| -> Vec<FlatCategory> {
            (1..=len)
                .map(|i| flat(i, "Level", (i > 1).then(|| i - 1)))
                .collect()
        };

        let tree = assemble_flat(&chain(MAX_DEPTH as i64)).unwrap();
        assert_eq!(TreeIndex::build(&tree).max_depth(), MAX_DEPTH);

        assert_eq!(
            assemble_flat(&chain(MAX_DEPTH as i64 + 1)),
            Err(TreeError::TooDeep {
                id: CategoryId(MAX_DEPTH as i64 + 1),
                limit: MAX_DEPTH
            })
        );

        // Deepest rows first, so no prefix of the chain is known yet
        let mut long: Vec<FlatCategory> = chain(200_000);
        long.reverse();
        assert!(matches!(
            assemble_flat(&long),
            Err(TreeError::TooDeep { limit: MAX_DEPTH, .. })
        ));
    }

    #[test]
    fn test_empty_listing() {
        assert!(assemble_flat(&[]).unwrap().is_empty());
    }
}
