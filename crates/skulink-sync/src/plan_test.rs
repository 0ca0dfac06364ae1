use rust_decimal::Decimal;
use skulink_core::{CanonicalProduct, CanonicalVariant, PlatformMeta};
use uuid::Uuid;

use super::*;

// ---------------------------------------------------------------------------
// fixtures
// ---------------------------------------------------------------------------

fn make_variant(sku: &str, price: &str, inventory: Option<i64>) -> CanonicalVariant {
    CanonicalVariant {
        canonical_id: Uuid::new_v4(),
        title: sku.to_string(),
        price: price.parse().unwrap(),
        compare_at_price: None,
        sku: sku.to_string(),
        inventory,
        manage_stock: inventory.map(|_| true),
        taxable: None,
        requires_shipping: None,
        attributes: vec![],
        image: None,
        meta: PlatformMeta::default(),
    }
}

fn make_product(title: &str, variants: Vec<CanonicalVariant>) -> CanonicalProduct {
    CanonicalProduct {
        id: "local-1".to_string(),
        title: title.to_string(),
        description: None,
        images: vec![],
        options: vec![],
        product_type: None,
        status: Some("active".to_string()),
        tags: vec![],
        variants,
        meta: PlatformMeta::default(),
    }
}

fn remote(
    product_id: &str,
    variant_id: &str,
    price: Option<&str>,
    inventory: Option<i64>,
) -> RemoteVariant {
    RemoteVariant {
        product_id: product_id.to_string(),
        variant_id: variant_id.to_string(),
        price: price.map(|p| p.parse::<Decimal>().unwrap()),
        inventory,
    }
}

fn index_of(entries: Vec<(&str, RemoteVariant)>) -> SkuIndex {
    entries
        .into_iter()
        .map(|(sku, row)| (sku.to_string(), row))
        .collect()
}

// ---------------------------------------------------------------------------
// routing
// ---------------------------------------------------------------------------

#[test]
fn no_match_routes_to_create() {
    let product = make_product("Tee", vec![make_variant("T-1", "10.00", Some(3))]);
    let action = plan_product(&product, &SkuIndex::new()).unwrap();
    assert_eq!(action, PlannedAction::Create);
}

#[test]
fn single_match_routes_whole_product_to_update() {
    let variants = vec![
        make_variant("T-1", "10.00", Some(5)),
        make_variant("T-2", "10.00", Some(5)),
        make_variant("T-3", "10.00", Some(5)),
        make_variant("T-4", "10.00", Some(5)),
    ];
    let product = make_product("Tee", variants);
    let index = index_of(vec![("T-2", remote("p9", "v2", Some("10.00"), Some(5)))]);

    match plan_product(&product, &index).unwrap() {
        PlannedAction::Update(update) => {
            assert_eq!(update.parent_id, "p9");
            // The one matched variant agrees with remote state, so nothing
            // to change; the other three ride along as appends.
            assert!(update.changes.is_empty());
            assert_eq!(update.appends, vec![0, 2, 3]);
        }
        other => panic!("expected Update, got {other:?}"),
    }
}

#[test]
fn all_matched_and_identical_is_unchanged() {
    let product = make_product(
        "Tee",
        vec![
            make_variant("T-1", "10.00", Some(5)),
            make_variant("T-2", "12.50", None),
        ],
    );
    let index = index_of(vec![
        ("T-1", remote("p9", "v1", Some("10.00"), Some(5))),
        ("T-2", remote("p9", "v2", Some("12.50"), None)),
    ]);

    let action = plan_product(&product, &index).unwrap();
    assert_eq!(action, PlannedAction::Unchanged);
}

#[test]
fn empty_sku_variants_are_appended_not_matched() {
    let product = make_product(
        "Tee",
        vec![
            make_variant("T-1", "10.00", Some(5)),
            make_variant("", "10.00", Some(5)),
        ],
    );
    // An empty-string key in the index must not catch the empty SKU.
    let index = index_of(vec![
        ("T-1", remote("p9", "v1", Some("10.00"), Some(5))),
        ("", remote("p9", "v77", Some("10.00"), Some(5))),
    ]);

    match plan_product(&product, &index).unwrap() {
        PlannedAction::Update(update) => assert_eq!(update.appends, vec![1]),
        other => panic!("expected Update, got {other:?}"),
    }
}

#[test]
fn product_without_variants_is_an_error() {
    let product = make_product("Empty", vec![]);
    match plan_product(&product, &SkuIndex::new()) {
        Err(SyncError::NoVariants { title }) => assert_eq!(title, "Empty"),
        other => panic!("expected NoVariants, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// minimal diffs
// ---------------------------------------------------------------------------

#[test]
fn inventory_only_diff_leaves_price_untouched() {
    let product = make_product("Tee", vec![make_variant("T-1", "10.00", Some(7))]);
    let index = index_of(vec![("T-1", remote("p9", "v1", Some("10.00"), Some(5)))]);

    match plan_product(&product, &index).unwrap() {
        PlannedAction::Update(update) => {
            assert_eq!(update.changes.len(), 1);
            let change = &update.changes[0];
            assert_eq!(change.new_price, None);
            assert_eq!(change.new_inventory, Some(InventoryTarget::Tracked(7)));
        }
        other => panic!("expected Update, got {other:?}"),
    }
}

#[test]
fn price_only_diff_leaves_inventory_untouched() {
    let product = make_product("Tee", vec![make_variant("T-1", "11.00", Some(5))]);
    let index = index_of(vec![("T-1", remote("p9", "v1", Some("10.00"), Some(5)))]);

    match plan_product(&product, &index).unwrap() {
        PlannedAction::Update(update) => {
            let change = &update.changes[0];
            assert_eq!(change.new_price, Some(Decimal::new(1100, 2)));
            assert_eq!(change.new_inventory, None);
        }
        other => panic!("expected Update, got {other:?}"),
    }
}

#[test]
fn prices_compare_numerically_across_scales() {
    let product = make_product("Tee", vec![make_variant("T-1", "10.00", Some(5))]);
    let index = index_of(vec![("T-1", remote("p9", "v1", Some("10.0"), Some(5)))]);

    let action = plan_product(&product, &index).unwrap();
    assert_eq!(action, PlannedAction::Unchanged);
}

#[test]
fn rows_without_remote_price_are_never_price_diffed() {
    // Standalone eBay items expose no price on the catalog surface.
    let product = make_product("Mug", vec![make_variant("M-1", "15.00", Some(3))]);
    let index = index_of(vec![("M-1", remote("M-1::meta={}", "M-1::meta={}", None, Some(3)))]);

    let action = plan_product(&product, &index).unwrap();
    assert_eq!(action, PlannedAction::Unchanged);
}

#[test]
fn clearing_inventory_targets_untracked() {
    let product = make_product("Tee", vec![make_variant("T-1", "10.00", None)]);
    let index = index_of(vec![("T-1", remote("p9", "v1", Some("10.00"), Some(5)))]);

    match plan_product(&product, &index).unwrap() {
        PlannedAction::Update(update) => {
            assert_eq!(
                update.changes[0].new_inventory,
                Some(InventoryTarget::Untracked)
            );
        }
        other => panic!("expected Update, got {other:?}"),
    }
}

#[test]
fn tracked_zero_differs_from_untracked() {
    let product = make_product("Tee", vec![make_variant("T-1", "10.00", Some(0))]);
    let index = index_of(vec![("T-1", remote("p9", "v1", Some("10.00"), None))]);

    match plan_product(&product, &index).unwrap() {
        PlannedAction::Update(update) => {
            assert_eq!(
                update.changes[0].new_inventory,
                Some(InventoryTarget::Tracked(0))
            );
        }
        other => panic!("expected Update, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// parent resolution
// ---------------------------------------------------------------------------

#[test]
fn first_matched_parent_wins_on_disagreement() {
    let product = make_product(
        "Tee",
        vec![
            make_variant("T-1", "10.00", Some(5)),
            make_variant("T-2", "11.00", Some(5)),
        ],
    );
    let index = index_of(vec![
        ("T-1", remote("p1", "v1", Some("10.00"), Some(5))),
        ("T-2", remote("p2", "v2", Some("10.00"), Some(5))),
    ]);

    match plan_product(&product, &index).unwrap() {
        PlannedAction::Update(update) => assert_eq!(update.parent_id, "p1"),
        other => panic!("expected Update, got {other:?}"),
    }
}

#[test]
fn rows_with_empty_parent_are_skipped_for_resolution() {
    let product = make_product(
        "Tee",
        vec![
            make_variant("T-1", "10.00", Some(5)),
            make_variant("T-2", "11.00", Some(5)),
        ],
    );
    let index = index_of(vec![
        ("T-1", remote("", "v1", Some("10.00"), Some(5))),
        ("T-2", remote("p2", "v2", Some("10.00"), Some(5))),
    ]);

    match plan_product(&product, &index).unwrap() {
        PlannedAction::Update(update) => assert_eq!(update.parent_id, "p2"),
        other => panic!("expected Update, got {other:?}"),
    }
}

#[test]
fn all_empty_parents_are_unresolvable() {
    let product = make_product("Tee", vec![make_variant("T-1", "11.00", Some(5))]);
    let index = index_of(vec![("T-1", remote("", "v1", Some("10.00"), Some(5)))]);

    match plan_product(&product, &index) {
        Err(SyncError::UnresolvableParent { title }) => assert_eq!(title, "Tee"),
        other => panic!("expected UnresolvableParent, got {other:?}"),
    }
}
