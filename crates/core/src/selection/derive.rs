use super::IdSet;
use crate::tree::TreeIndex;
use taxon_api::{CategoryId, CheckState};

/// Result of expanding an explicit selection against a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Derivation {
    /// Exactly the explicit selection.
    pub checked: IdSet,
    /// Ancestors implied by `checked` that are not themselves checked.
    pub half_checked: IdSet,
    /// `checked` followed by `half_checked`.
    pub effective: IdSet,
}

impl Derivation {
    pub fn check_state(&self) -> CheckState {
        CheckState {
            checked: self.checked.iter().copied().collect(),
            half_checked: self.half_checked.iter().copied().collect(),
        }
    }
}

/// Expand `explicit` with every ancestor of its members.
///
/// Half-checked ids are ordered by discovery: members in order, each one's
/// ancestors nearest first. Ids missing from `index` have no ancestors.
pub fn effective_from_explicit(index: &TreeIndex, explicit: &IdSet) -> Derivation {
    let checked = explicit.clone();
    let mut half_checked = IdSet::new();

    for &id in explicit {
        for ancestor in index.ancestors_of(id) {
            if !checked.contains(&ancestor) {
                half_checked.insert(ancestor);
            }
        }
    }

    let mut effective = checked.clone();
    effective.extend(half_checked.iter().copied());

    Derivation {
        checked,
        half_checked,
        effective,
    }
}

/// Recover the leaf-most covering subset of a persisted effective set.
///
/// An id is kept iff no other member is a strict descendant of it, i.e. it
/// is not a strict ancestor of any member. Input order is preserved.
pub fn explicit_from_effective<'a, I>(index: &TreeIndex, effective: I) -> IdSet
where
    I: IntoIterator<Item = &'a CategoryId>,
{
    let members: IdSet = effective.into_iter().copied().collect();

    let mut implied = IdSet::new();
    for &id in &members {
        implied.extend(index.ancestors_of(id));
    }

    members
        .into_iter()
        .filter(|id| !implied.contains(id))
        .collect()
}
