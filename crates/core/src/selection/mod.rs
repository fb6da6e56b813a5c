//! Selection state over a category tree.
//!
//! The user owns only the explicit set. Everything else (the effective set,
//! the half-checked ancestors, the primary id) is derived from it against the
//! current [`TreeIndex`](crate::tree::TreeIndex) and recomputed after every
//! change.

pub mod controller;
pub mod derive;
pub mod primary;

use indexmap::IndexSet;
use taxon_api::CategoryId;

/// Insertion-ordered id set. Iteration order is the tie-break order for
/// depth comparisons.
pub type IdSet = IndexSet<CategoryId>;
