//! Pure planning: decide per product whether to create, update or leave
//! alone, and compute the minimal set of variant mutations for an update.
//!
//! Routing is by SKU match alone. Any variant matching remote state sends
//! the whole product down the update path; a product with no matches at all
//! is created fresh. Planning performs no I/O, so every decision here is
//! testable without a platform in the loop.

use rust_decimal::Decimal;
use skulink_core::{CanonicalProduct, CanonicalVariant};

use crate::error::SyncError;
use crate::remote::{RemoteVariant, SkuIndex};

/// Desired inventory state for one variant mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryTarget {
    /// Track stock with this quantity.
    Tracked(i64),
    /// Stop tracking stock for the variant.
    Untracked,
}

/// One matched variant whose remote price or inventory differs from the
/// catalog. Fields left `None` are not touched by the update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantChange {
    pub sku: String,
    /// Remote id the mutation must address, taken from
    /// [`RemoteVariant::variant_id`].
    pub remote_variant_id: String,
    pub new_price: Option<Decimal>,
    pub new_inventory: Option<InventoryTarget>,
}

/// Update plan for a product with at least one SKU match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductUpdate {
    /// Remote parent every mutation is applied under.
    pub parent_id: String,
    /// Matched variants needing a price or inventory mutation.
    pub changes: Vec<VariantChange>,
    /// Indexes into `product.variants` of variants with no remote match;
    /// they are appended to the existing parent.
    pub appends: Vec<usize>,
}

/// What the reconciler decided to do with one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedAction {
    /// No variant matched; the whole product is created remotely.
    Create,
    /// At least one variant matched and something differs.
    Update(ProductUpdate),
    /// Every matched variant already agrees with the catalog and nothing
    /// needs appending.
    Unchanged,
}

/// Plans one product against the remote SKU index.
///
/// Matched variants are diffed field by field; only those whose price or
/// inventory actually changed appear in the plan. Prices compare
/// numerically, so `"10.0"` and `"10.00"` never produce a spurious update,
/// and rows without a remote price are never price-diffed.
///
/// # Errors
///
/// [`SyncError::NoVariants`] when the product has nothing to sync, and
/// [`SyncError::UnresolvableParent`] when variants matched but none of the
/// matched rows carries a parent id to update under.
pub fn plan_product(
    product: &CanonicalProduct,
    index: &SkuIndex,
) -> Result<PlannedAction, SyncError> {
    if product.variants.is_empty() {
        return Err(SyncError::NoVariants {
            title: product.title.clone(),
        });
    }

    let mut matched: Vec<(&CanonicalVariant, &RemoteVariant)> = Vec::new();
    let mut appends: Vec<usize> = Vec::new();
    for (position, variant) in product.variants.iter().enumerate() {
        // Empty SKUs never match remote state.
        match index.get(&variant.sku).filter(|_| !variant.sku.is_empty()) {
            Some(remote) => matched.push((variant, remote)),
            None => appends.push(position),
        }
    }

    if matched.is_empty() {
        return Ok(PlannedAction::Create);
    }

    let parent_id = resolve_parent(&product.title, &matched)?;

    let mut changes = Vec::new();
    for (variant, remote) in &matched {
        if let Some(change) = diff_variant(variant, remote) {
            changes.push(change);
        }
    }

    if changes.is_empty() && appends.is_empty() {
        return Ok(PlannedAction::Unchanged);
    }

    Ok(PlannedAction::Update(ProductUpdate {
        parent_id,
        changes,
        appends,
    }))
}

/// Picks the remote parent to update under. The first matched row with a
/// parent id wins; disagreements among later rows are logged and ignored.
fn resolve_parent(
    title: &str,
    matched: &[(&CanonicalVariant, &RemoteVariant)],
) -> Result<String, SyncError> {
    let mut parent: Option<&str> = None;
    for (_, remote) in matched {
        if remote.product_id.is_empty() {
            continue;
        }
        match parent {
            None => parent = Some(&remote.product_id),
            Some(current) if current != remote.product_id => {
                tracing::warn!(
                    product = %title,
                    parent = %current,
                    other = %remote.product_id,
                    "matched variants disagree on the remote parent, keeping the first"
                );
            }
            Some(_) => {}
        }
    }
    parent
        .map(str::to_owned)
        .ok_or_else(|| SyncError::UnresolvableParent {
            title: title.to_string(),
        })
}

fn diff_variant(variant: &CanonicalVariant, remote: &RemoteVariant) -> Option<VariantChange> {
    let new_price = match remote.price {
        None => None,
        Some(current) if current == variant.price => None,
        Some(_) => Some(variant.price),
    };

    let new_inventory = if variant.inventory == remote.inventory {
        None
    } else {
        Some(
            variant
                .inventory
                .map_or(InventoryTarget::Untracked, InventoryTarget::Tracked),
        )
    };

    if new_price.is_none() && new_inventory.is_none() {
        return None;
    }

    Some(VariantChange {
        sku: variant.sku.clone(),
        remote_variant_id: remote.variant_id.clone(),
        new_price,
        new_inventory,
    })
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
