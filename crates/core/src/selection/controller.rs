//! Session-level selection state for a single host form.
//!
//! The controller owns the committed explicit selection, the derived
//! effective set and the primary id, plus an optional draft used while the
//! selection dialog is open. Every mutation re-runs the derivations, so the
//! read side is always consistent with the explicit set and the installed
//! tree snapshot.

use super::IdSet;
use super::derive::{Derivation, effective_from_explicit, explicit_from_effective};
use super::primary::normalize_primary;
use crate::config::{ResolverConfig, StaleIdPolicy};
use crate::tree::TreeIndex;
use taxon_api::{CategoryId, CategoryTree, CheckState, PersistedSelection, SelectedCategory};

/// Token tying a tree fetch to the request that started it.
///
/// Snapshots fetched under a ticket older than the one already installed are
/// rejected, so a slow fetch cannot overwrite a newer tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum EditSession {
    #[default]
    Idle,
    Editing {
        staged: IdSet,
    },
}

#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    config: ResolverConfig,
    index: TreeIndex,
    explicit: IdSet,
    derivation: Derivation,
    primary: Option<CategoryId>,
    session: EditSession,
    /// Last ticket handed out
    generation: u64,
    /// Ticket of the snapshot currently installed
    installed: u64,
    /// Persisted effective set and primary restored before any tree was available
    pending_restore: Option<(IdSet, Option<CategoryId>)>,
}

impl SelectionController {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn tree(&self) -> &TreeIndex {
        &self.index
    }

    // ---- Tree snapshots ----

    /// Start a tree fetch outside of an edit session (e.g. on initial mount).
    pub fn request_tree(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket(self.generation)
    }

    /// Index `tree` and install it if `ticket` is not stale.
    pub fn install_tree(&mut self, ticket: FetchTicket, tree: &CategoryTree) -> bool {
        self.install_index(ticket, TreeIndex::build(tree))
    }

    /// Install an already built (and possibly validated) index.
    ///
    /// Returns `false` and leaves the controller untouched when a snapshot
    /// from a newer request is already installed.
    pub fn install_index(&mut self, ticket: FetchTicket, index: TreeIndex) -> bool {
        if ticket.0 < self.installed {
            tracing::warn!(
                "Dropping superseded tree snapshot (ticket {}, installed {})",
                ticket.0,
                self.installed
            );
            return false;
        }

        tracing::info!(
            "Installing category tree: {} nodes (ticket {})",
            index.len(),
            ticket.0
        );
        self.index = index;
        self.installed = ticket.0;
        self.resolve_pending_restore();
        self.recompute();
        true
    }

    /// Install `tree` unconditionally.
    pub fn replace_tree(&mut self, tree: &CategoryTree) {
        let ticket = self.request_tree();
        self.install_tree(ticket, tree);
    }

    fn resolve_pending_restore(&mut self) {
        if self.index.is_empty() {
            return;
        }
        let Some((effective, primary)) = self.pending_restore.take() else {
            return;
        };

        let resolved = explicit_from_effective(&self.index, &effective);
        tracing::debug!(
            "Resolved deferred restore: {} persisted ids -> {} explicit",
            effective.len(),
            resolved.len()
        );

        // An untouched draft mirrors the unresolved selection; keep it in step
        if let EditSession::Editing { staged } = &mut self.session {
            if *staged == self.explicit {
                *staged = resolved.clone();
            }
        }
        self.explicit = resolved;
        self.primary = primary;
    }

    // ---- Edit session ----

    /// Open the selection dialog: copy the committed selection into a draft.
    ///
    /// The returned ticket should accompany the tree refetch the dialog
    /// triggers. Reopening while already editing restarts the draft.
    pub fn open_edit(&mut self) -> FetchTicket {
        self.session = EditSession::Editing {
            staged: self.explicit.clone(),
        };
        self.request_tree()
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.session, EditSession::Editing { .. })
    }

    /// The draft selection, if the dialog is open.
    pub fn staged(&self) -> Option<&IdSet> {
        match &self.session {
            EditSession::Editing { staged } => Some(staged),
            EditSession::Idle => None,
        }
    }

    /// Flip `id` in the draft. Returns whether it is staged afterwards.
    pub fn toggle_staged(&mut self, id: CategoryId) -> bool {
        match &mut self.session {
            EditSession::Editing { staged } => {
                if staged.shift_remove(&id) {
                    false
                } else {
                    staged.insert(id);
                    true
                }
            }
            EditSession::Idle => {
                tracing::debug!("Ignoring toggle of {} outside an edit session", id);
                false
            }
        }
    }

    /// Set the draft membership of `id`. Returns whether the draft changed.
    pub fn set_staged(&mut self, id: CategoryId, checked: bool) -> bool {
        match &mut self.session {
            EditSession::Editing { staged } if checked => staged.insert(id),
            EditSession::Editing { staged } => staged.shift_remove(&id),
            EditSession::Idle => {
                tracing::debug!("Ignoring check state of {} outside an edit session", id);
                false
            }
        }
    }

    /// Promote the draft to the committed selection.
    pub fn commit(&mut self) -> bool {
        match std::mem::take(&mut self.session) {
            EditSession::Editing { staged } => {
                self.explicit = staged;
                self.pending_restore = None;
                self.recompute();
                tracing::info!(
                    "Committed selection: {} explicit, {} effective, primary {:?}",
                    self.explicit.len(),
                    self.derivation.effective.len(),
                    self.primary.map(CategoryId::get)
                );
                true
            }
            EditSession::Idle => {
                tracing::debug!("Nothing to commit");
                false
            }
        }
    }

    /// Drop the draft without touching the committed selection.
    pub fn discard(&mut self) -> bool {
        match std::mem::take(&mut self.session) {
            EditSession::Editing { staged } => {
                tracing::debug!("Discarded draft of {} ids", staged.len());
                true
            }
            EditSession::Idle => false,
        }
    }

    // ---- Direct mutations ----

    /// Remove `id` from the committed selection, bypassing the draft.
    ///
    /// Returns whether `id` was selected. The derivations run either way.
    pub fn remove(&mut self, id: CategoryId) -> bool {
        let removed = self.explicit.shift_remove(&id);
        self.pending_restore = None;
        self.recompute();
        removed
    }

    /// Request `id` as primary. The request is normalized, so an id outside
    /// the selection resolves to the closest valid choice.
    pub fn set_primary(&mut self, id: CategoryId) -> Option<CategoryId> {
        self.primary = normalize_primary(&self.index, Some(id), &self.explicit);
        if self.primary != Some(id) {
            tracing::debug!(
                "Primary request {} normalized to {:?}",
                id,
                self.primary.map(CategoryId::get)
            );
        }
        self.primary
    }

    /// Load a saved entity from its persisted effective set and primary id.
    ///
    /// Any open draft is dropped. If no tree has been installed yet, the
    /// persisted set is kept and resolved again once the first tree arrives.
    pub fn initialize_from_persisted(
        &mut self,
        effective: &[CategoryId],
        primary: Option<CategoryId>,
    ) {
        self.session = EditSession::Idle;
        self.explicit = explicit_from_effective(&self.index, effective);
        self.primary = primary;
        self.pending_restore = if self.index.is_empty() && !effective.is_empty() {
            Some((effective.iter().copied().collect(), primary))
        } else {
            None
        };
        self.recompute();
    }

    pub fn restore(&mut self, persisted: &PersistedSelection) {
        self.initialize_from_persisted(&persisted.categories, persisted.primary_category_id);
    }

    /// Clear all selection state. The installed tree is kept.
    pub fn reset(&mut self) {
        self.session = EditSession::Idle;
        self.explicit.clear();
        self.primary = None;
        self.pending_restore = None;
        self.recompute();
    }

    fn recompute(&mut self) {
        if self.config.stale_ids == StaleIdPolicy::Prune && !self.index.is_empty() {
            let before = self.explicit.len();
            let index = &self.index;
            self.explicit.retain(|id| index.contains(*id));
            if self.explicit.len() != before {
                tracing::warn!(
                    "Pruned {} category ids missing from the tree",
                    before - self.explicit.len()
                );
            }
        }

        self.derivation = effective_from_explicit(&self.index, &self.explicit);
        self.primary = normalize_primary(&self.index, self.primary, &self.explicit);
    }

    // ---- Read side ----

    pub fn explicit(&self) -> &IdSet {
        &self.explicit
    }

    pub fn effective(&self) -> &IdSet {
        &self.derivation.effective
    }

    pub fn half_checked(&self) -> &IdSet {
        &self.derivation.half_checked
    }

    pub fn primary(&self) -> Option<CategoryId> {
        self.primary
    }

    pub fn derivation(&self) -> &Derivation {
        &self.derivation
    }

    /// Widget state for the committed selection.
    pub fn check_state(&self) -> CheckState {
        self.derivation.check_state()
    }

    /// Widget state for the draft, while the dialog is open.
    pub fn staged_check_state(&self) -> Option<CheckState> {
        self.staged()
            .map(|staged| effective_from_explicit(&self.index, staged).check_state())
    }

    /// The pair to hand to the persistence layer.
    pub fn persisted(&self) -> PersistedSelection {
        PersistedSelection {
            categories: self.derivation.effective.iter().copied().collect(),
            primary_category_id: self.primary,
        }
    }

    /// Explicit selection in insertion order, with names from the current tree.
    pub fn selected_categories(&self) -> Vec<SelectedCategory> {
        self.explicit
            .iter()
            .map(|&id| SelectedCategory {
                id,
                name: self.index.name_of(id).map(str::to_string),
                primary: self.primary == Some(id),
            })
            .collect()
    }

    /// Explicit ids absent from the installed tree. Empty while no tree is
    /// installed, since nothing can be judged stale yet.
    pub fn stale_ids(&self) -> Vec<CategoryId> {
        if self.index.is_empty() {
            return Vec::new();
        }
        self.explicit
            .iter()
            .copied()
            .filter(|&id| !self.index.contains(id))
            .collect()
    }
}
