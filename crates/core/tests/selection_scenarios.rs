use taxon_api::{CategoryId, CategoryNode, CategoryTree, PersistedSelection};
use taxon_core::{
    IdSet, ResolverConfig, SelectionController, StaleIdPolicy, TreeIndex, effective_from_explicit,
    explicit_from_effective, normalize_primary,
};

fn ids(values: &[i64]) -> IdSet {
    values.iter().map(|&v| CategoryId(v)).collect()
}

/// Electronics(1) > Phones(2) > {Android(3), iOS(4)}
fn phones_tree() -> CategoryTree {
    CategoryTree::new(vec![CategoryNode::with_children(
        1,
        "Electronics",
        vec![CategoryNode::with_children(
            2,
            "Phones",
            vec![CategoryNode::leaf(3, "Android"), CategoryNode::leaf(4, "iOS")],
        )],
    )])
}

fn select(controller: &mut SelectionController, values: &[i64]) {
    controller.open_edit();
    for &v in values {
        controller.toggle_staged(CategoryId(v));
    }
    assert!(controller.commit());
}

#[test]
fn test_leaf_selection_half_checks_ancestors() {
    let index = TreeIndex::build(&phones_tree());
    let derivation = effective_from_explicit(&index, &ids(&[3]));

    assert_eq!(derivation.checked, ids(&[3]));
    assert_eq!(derivation.half_checked, ids(&[1, 2]));
    assert_eq!(derivation.effective, ids(&[1, 2, 3]));
}

#[test]
fn test_parent_and_child_collapse_on_reload() {
    let index = TreeIndex::build(&phones_tree());
    let derivation = effective_from_explicit(&index, &ids(&[2, 3]));

    assert_eq!(derivation.effective, ids(&[1, 2, 3]));
    assert_eq!(explicit_from_effective(&index, &ids(&[1, 2, 3])), ids(&[3]));
}

#[test]
fn test_removing_primary_falls_back_to_remaining_selection() {
    let mut controller = SelectionController::default();
    controller.replace_tree(&phones_tree());
    select(&mut controller, &[3, 4]);
    assert_eq!(controller.set_primary(CategoryId(3)), Some(CategoryId(3)));

    assert!(controller.remove(CategoryId(3)));

    assert_eq!(controller.explicit(), &ids(&[4]));
    assert_eq!(controller.primary(), Some(CategoryId(4)));
    assert_eq!(controller.effective(), &ids(&[1, 2, 4]));
}

#[test]
fn test_fresh_commit_picks_deepest_primary() {
    let index = TreeIndex::build(&phones_tree());
    assert_eq!(normalize_primary(&index, None, &ids(&[2])), Some(CategoryId(2)));

    let mut controller = SelectionController::default();
    controller.replace_tree(&phones_tree());
    select(&mut controller, &[2]);
    assert_eq!(controller.primary(), Some(CategoryId(2)));
}

#[test]
fn test_discard_leaves_committed_state() {
    let mut controller = SelectionController::default();
    controller.replace_tree(&phones_tree());
    select(&mut controller, &[3]);
    let before = controller.persisted();

    controller.open_edit();
    controller.toggle_staged(CategoryId(3));
    controller.toggle_staged(CategoryId(4));
    assert!(controller.discard());

    assert!(!controller.is_editing());
    assert_eq!(controller.persisted(), before);
    assert_eq!(controller.explicit(), &ids(&[3]));
}

#[test]
fn test_reopening_restarts_draft_from_committed() {
    let mut controller = SelectionController::default();
    controller.replace_tree(&phones_tree());
    select(&mut controller, &[3]);

    controller.open_edit();
    controller.toggle_staged(CategoryId(4));
    controller.open_edit();

    assert_eq!(controller.staged(), Some(&ids(&[3])));
}

#[test]
fn test_set_primary_is_normalized() {
    let mut controller = SelectionController::default();
    controller.replace_tree(&phones_tree());
    select(&mut controller, &[3, 4]);

    // Ancestor request resolves to the deepest selected descendant, first wins
    assert_eq!(controller.set_primary(CategoryId(1)), Some(CategoryId(3)));
    // Unknown id falls back to the deepest selection overall
    assert_eq!(controller.set_primary(CategoryId(404)), Some(CategoryId(3)));
    assert_eq!(controller.set_primary(CategoryId(4)), Some(CategoryId(4)));
}

#[test]
fn test_commit_keeps_valid_primary() {
    let mut controller = SelectionController::default();
    controller.replace_tree(&phones_tree());
    select(&mut controller, &[3, 4]);
    controller.set_primary(CategoryId(4));

    controller.open_edit();
    controller.toggle_staged(CategoryId(3));
    controller.commit();

    assert_eq!(controller.primary(), Some(CategoryId(4)));
}

#[test]
fn test_emptying_selection_clears_primary() {
    let mut controller = SelectionController::default();
    controller.replace_tree(&phones_tree());
    select(&mut controller, &[3]);

    controller.remove(CategoryId(3));

    assert!(controller.explicit().is_empty());
    assert!(controller.effective().is_empty());
    assert_eq!(controller.primary(), None);
    assert_eq!(controller.persisted(), PersistedSelection::default());
}

#[test]
fn test_initialize_from_persisted() {
    let mut controller = SelectionController::default();
    controller.replace_tree(&phones_tree());

    controller.initialize_from_persisted(
        &[CategoryId(1), CategoryId(2), CategoryId(3), CategoryId(4)],
        Some(CategoryId(4)),
    );

    assert_eq!(controller.explicit(), &ids(&[3, 4]));
    assert_eq!(controller.half_checked(), &ids(&[1, 2]));
    assert_eq!(controller.primary(), Some(CategoryId(4)));

    let mut persisted = controller.persisted();
    persisted.categories.sort();
    assert_eq!(
        persisted.categories,
        vec![CategoryId(1), CategoryId(2), CategoryId(3), CategoryId(4)]
    );
}

#[test]
fn test_restore_before_tree_is_resolved_on_arrival() {
    let mut controller = SelectionController::default();
    let ticket = controller.request_tree();

    controller.restore(&PersistedSelection {
        categories: vec![CategoryId(1), CategoryId(2), CategoryId(3)],
        primary_category_id: Some(CategoryId(3)),
    });
    // Without a tree nothing can be collapsed yet
    assert_eq!(controller.explicit(), &ids(&[1, 2, 3]));

    assert!(controller.install_tree(ticket, &phones_tree()));

    assert_eq!(controller.explicit(), &ids(&[3]));
    assert_eq!(controller.half_checked(), &ids(&[1, 2]));
    assert_eq!(controller.primary(), Some(CategoryId(3)));
}

#[test]
fn test_deferred_restore_updates_untouched_draft() {
    let mut controller = SelectionController::default();
    controller.initialize_from_persisted(&[CategoryId(1), CategoryId(2), CategoryId(4)], None);

    let ticket = controller.open_edit();
    assert!(controller.install_tree(ticket, &phones_tree()));

    assert_eq!(controller.staged(), Some(&ids(&[4])));
    let staged = controller.staged_check_state().unwrap();
    assert_eq!(staged.half_checked, vec![CategoryId(2), CategoryId(1)]);
}

#[test]
fn test_deferred_restore_matches_direct_primary() {
    let tree = CategoryTree::new(vec![
        CategoryNode::with_children(
            1,
            "Books",
            vec![CategoryNode::with_children(
                2,
                "Fiction",
                vec![CategoryNode::leaf(3, "Mystery")],
            )],
        ),
        CategoryNode::with_children(
            10,
            "Electronics",
            vec![CategoryNode::with_children(
                11,
                "Phones",
                vec![CategoryNode::with_children(
                    12,
                    "Android",
                    vec![CategoryNode::leaf(13, "Pixel")],
                )],
            )],
        ),
    ]);
    let persisted: Vec<CategoryId> = [1, 2, 3, 10, 11, 12, 13].map(CategoryId).to_vec();

    let mut direct = SelectionController::default();
    direct.replace_tree(&tree);
    direct.initialize_from_persisted(&persisted, None);

    let mut deferred = SelectionController::default();
    deferred.initialize_from_persisted(&persisted, None);
    deferred.replace_tree(&tree);

    assert_eq!(direct.primary(), Some(CategoryId(13)));
    assert_eq!(deferred.explicit(), &ids(&[3, 13]));
    assert_eq!(deferred.primary(), direct.primary());

    // A persisted ancestor primary resolves against the full tree too
    let mut deferred = SelectionController::default();
    deferred.initialize_from_persisted(&persisted, Some(CategoryId(10)));
    deferred.replace_tree(&tree);
    assert_eq!(deferred.primary(), Some(CategoryId(13)));
}

#[test]
fn test_superseded_fetch_is_dropped() {
    let mut controller = SelectionController::default();
    let first = controller.open_edit();
    controller.discard();
    let second = controller.open_edit();

    let newer = CategoryTree::new(vec![CategoryNode::leaf(9, "Garden")]);
    assert!(controller.install_tree(second, &newer));
    assert!(!controller.install_tree(first, &phones_tree()));

    assert_eq!(controller.tree().len(), 1);
    assert!(controller.tree().contains(CategoryId(9)));
}

#[test]
fn test_new_tree_rederives_committed_selection() {
    let mut controller = SelectionController::default();
    select(&mut controller, &[3]);
    assert!(controller.half_checked().is_empty());

    controller.replace_tree(&phones_tree());

    assert_eq!(controller.half_checked(), &ids(&[2, 1]));
}

#[test]
fn test_stale_ids_are_kept_by_default() {
    let mut controller = SelectionController::default();
    controller.replace_tree(&phones_tree());
    select(&mut controller, &[4, 42]);

    assert_eq!(controller.explicit(), &ids(&[4, 42]));
    assert_eq!(controller.stale_ids(), vec![CategoryId(42)]);
    assert_eq!(controller.primary(), Some(CategoryId(4)));
}

#[test]
fn test_prune_policy_drops_stale_ids() {
    let config = ResolverConfig::default().with_stale_ids(StaleIdPolicy::Prune);
    let mut controller = SelectionController::new(config);
    controller.replace_tree(&phones_tree());
    select(&mut controller, &[4, 42]);

    assert_eq!(controller.explicit(), &ids(&[4]));
    assert!(controller.stale_ids().is_empty());
}

#[test]
fn test_prune_waits_for_a_tree() {
    let config = ResolverConfig::default().with_stale_ids(StaleIdPolicy::Prune);
    let mut controller = SelectionController::new(config);
    select(&mut controller, &[4, 42]);
    assert_eq!(controller.explicit().len(), 2);

    controller.replace_tree(&phones_tree());
    assert_eq!(controller.explicit(), &ids(&[4]));
}
