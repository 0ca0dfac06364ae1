//! The reconciliation engine.
//!
//! One batched SKU lookup decides routing, then creates and updates fan out
//! with bounded concurrency. Failures are collected per product, so one bad
//! product never aborts the run; only the lookup itself failing does.

use chrono::Utc;
use futures::stream::{self, StreamExt};
use skulink_core::CanonicalProduct;

use crate::error::SyncError;
use crate::plan::{plan_product, PlannedAction, ProductUpdate};
use crate::report::{OutcomeStatus, ProductOutcome, SyncReport};
use crate::target::CatalogTarget;

/// Engine tunables.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Upper bound on products mutated concurrently.
    pub max_concurrent: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self { max_concurrent: 4 }
    }
}

/// Pushes a canonical catalog into `target` and reports what happened.
///
/// # Errors
///
/// Returns an error only when the initial SKU lookup fails; every later
/// failure is captured per product in the report.
pub async fn sync_catalog(
    target: &dyn CatalogTarget,
    products: Vec<CanonicalProduct>,
    options: &SyncOptions,
) -> Result<SyncReport, SyncError> {
    let started_at = Utc::now();

    let skus = collect_skus(&products);
    tracing::info!(
        platform = %target.platform(),
        products = products.len(),
        skus = skus.len(),
        "starting sync"
    );
    let index = target.lookup_by_skus(&skus).await?;

    let mut outcomes = Vec::new();
    let mut creates = Vec::new();
    let mut updates = Vec::new();
    for product in products {
        match plan_product(&product, &index) {
            Ok(PlannedAction::Create) => creates.push(product),
            Ok(PlannedAction::Update(update)) => updates.push((product, update)),
            Ok(PlannedAction::Unchanged) => {
                outcomes.push(outcome_for(&product, OutcomeStatus::Unchanged));
            }
            Err(error) => {
                tracing::error!(
                    platform = %target.platform(),
                    product = %product.title,
                    error = %error,
                    "planning failed"
                );
                outcomes.push(outcome_for(&product, OutcomeStatus::Failed(error)));
            }
        }
    }

    let max_concurrent = options.max_concurrent.max(1);

    let created: Vec<ProductOutcome> = stream::iter(creates)
        .map(|product| async move {
            let status = match target.create(&product).await {
                Ok(remote_id) => {
                    tracing::info!(
                        platform = %target.platform(),
                        product = %product.title,
                        remote_id = %remote_id,
                        "created product"
                    );
                    OutcomeStatus::Created { remote_id }
                }
                Err(error) => {
                    tracing::error!(
                        platform = %target.platform(),
                        product = %product.title,
                        error = %error,
                        "create failed"
                    );
                    OutcomeStatus::Failed(error)
                }
            };
            outcome_for(&product, status)
        })
        .buffer_unordered(max_concurrent)
        .collect()
        .await;
    outcomes.extend(created);

    let updated: Vec<ProductOutcome> = stream::iter(updates)
        .map(|(product, update)| async move {
            let status = match target.update(&product, &update).await {
                Ok(()) => {
                    tracing::info!(
                        platform = %target.platform(),
                        product = %product.title,
                        changed = update.changes.len(),
                        appended = update.appends.len(),
                        "updated product"
                    );
                    OutcomeStatus::Updated {
                        changed: update.changes.len(),
                        appended: update.appends.len(),
                    }
                }
                Err(error) => {
                    tracing::error!(
                        platform = %target.platform(),
                        product = %product.title,
                        error = %error,
                        "update failed"
                    );
                    OutcomeStatus::Failed(error)
                }
            };
            outcome_for(&product, status)
        })
        .buffer_unordered(max_concurrent)
        .collect()
        .await;
    outcomes.extend(updated);

    let report = SyncReport {
        platform: target.platform(),
        started_at,
        finished_at: Utc::now(),
        outcomes,
    };

    if report.failed() > 0 {
        tracing::warn!(
            platform = %report.platform,
            failed = report.failed(),
            total = report.outcomes.len(),
            "some products failed during sync"
        );
    }
    tracing::info!(
        platform = %report.platform,
        created = report.created(),
        updated = report.updated(),
        unchanged = report.unchanged(),
        failed = report.failed(),
        "sync finished"
    );

    Ok(report)
}

/// Every non-empty variant SKU across the catalog, sorted and deduplicated,
/// ready for one batched remote lookup.
fn collect_skus(products: &[CanonicalProduct]) -> Vec<String> {
    let mut skus: Vec<String> = products
        .iter()
        .flat_map(|product| product.variants.iter())
        .map(|variant| variant.sku.clone())
        .filter(|sku| !sku.is_empty())
        .collect();
    skus.sort();
    skus.dedup();
    skus
}

fn outcome_for(product: &CanonicalProduct, status: OutcomeStatus) -> ProductOutcome {
    ProductOutcome {
        title: product.title.clone(),
        sku_hint: product
            .variants
            .first()
            .map(|variant| variant.sku.clone())
            .unwrap_or_default(),
        status,
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
