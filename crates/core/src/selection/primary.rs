use super::IdSet;
use crate::tree::TreeIndex;
use taxon_api::CategoryId;

/// Deepest member of `explicit`; ties go to the earliest member.
pub fn deepest_explicit(index: &TreeIndex, explicit: &IdSet) -> Option<CategoryId> {
    deepest(index, explicit.iter().copied())
}

fn deepest(index: &TreeIndex, ids: impl Iterator<Item = CategoryId>) -> Option<CategoryId> {
    let mut best: Option<(CategoryId, usize)> = None;
    for id in ids {
        let depth = index.depth_of(id);
        match best {
            Some((_, best_depth)) if depth <= best_depth => {}
            _ => best = Some((id, depth)),
        }
    }
    best.map(|(id, _)| id)
}

/// Repair `primary` so it names a member of `explicit`.
///
/// 1. empty selection: `None`
/// 2. `primary` already selected: kept
/// 3. `primary` is an ancestor of selected ids: the deepest of those
/// 4. otherwise: the deepest selected id overall
pub fn normalize_primary(
    index: &TreeIndex,
    primary: Option<CategoryId>,
    explicit: &IdSet,
) -> Option<CategoryId> {
    if explicit.is_empty() {
        return None;
    }

    if let Some(candidate) = primary {
        if explicit.contains(&candidate) {
            return Some(candidate);
        }

        let in_branch = explicit
            .iter()
            .copied()
            .filter(|&id| index.is_ancestor_or_self(candidate, id));
        if let Some(id) = deepest(index, in_branch) {
            return Some(id);
        }
    }

    deepest_explicit(index, explicit)
}
