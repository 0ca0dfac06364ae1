//! Command handlers for the CLI.
//!
//! These are called from `main` after config and logging are established.
//! Per-product failures during a push are isolated by the engine and show
//! up in the report; only a fully failed run aborts with an error.

use std::path::Path;

use skulink_core::{AppConfig, CanonicalProduct};
use skulink_sync::{
    plan_product, sync_catalog, CatalogTarget, PlannedAction, SyncOptions, SyncReport,
};

use crate::channel::{build_source, build_target, PlatformArg};

/// Pull a platform catalog and write it out as canonical JSON.
///
/// Writes to `out` when given, stdout otherwise. Records the adapter
/// skipped are logged by the channel and absent from the output.
pub(crate) async fn run_pull(
    config: &AppConfig,
    from: PlatformArg,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let source = build_source(config, from)?;
    let products = source.fetch_catalog().await?;
    let json = serde_json::to_string_pretty(&products)?;

    match out {
        Some(path) => {
            std::fs::write(path, json).map_err(|e| {
                anyhow::anyhow!("failed to write catalog to {}: {e}", path.display())
            })?;
            println!(
                "pulled {} products from {} into {}",
                products.len(),
                from.platform(),
                path.display()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Push a canonical catalog file into a platform.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, the target's
/// credentials are missing, the remote SKU lookup fails, or every product
/// in the catalog fails to push.
pub(crate) async fn run_push(
    config: &AppConfig,
    to: PlatformArg,
    input: &Path,
    dry_run: bool,
) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(input)
        .map_err(|e| anyhow::anyhow!("failed to read catalog from {}: {e}", input.display()))?;
    let products: Vec<CanonicalProduct> = serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("{} is not a canonical catalog: {e}", input.display()))?;

    push_products(config, to, products, dry_run).await
}

/// Pull one platform's catalog and push it into another.
pub(crate) async fn run_sync(
    config: &AppConfig,
    from: PlatformArg,
    to: PlatformArg,
    dry_run: bool,
) -> anyhow::Result<()> {
    if from == to {
        anyhow::bail!(
            "source and target platform are both {}; nothing to sync",
            from.platform()
        );
    }

    let source = build_source(config, from)?;
    let products = source.fetch_catalog().await?;
    println!("pulled {} products from {}", products.len(), from.platform());

    push_products(config, to, products, dry_run).await
}

async fn push_products(
    config: &AppConfig,
    to: PlatformArg,
    products: Vec<CanonicalProduct>,
    dry_run: bool,
) -> anyhow::Result<()> {
    if products.is_empty() {
        println!("catalog is empty; nothing to push");
        return Ok(());
    }

    let target = build_target(config, to)?;

    if dry_run {
        return preview_push(target.as_ref(), &products).await;
    }

    let options = SyncOptions {
        max_concurrent: config.max_concurrent_products,
    };
    let report = sync_catalog(target.as_ref(), products, &options).await?;
    print_report(&report);

    if report.all_failed() {
        anyhow::bail!("all {} products failed to push", report.outcomes.len());
    }
    Ok(())
}

/// Resolves and plans every product without mutating the target. The SKU
/// lookup still runs, so the preview reflects actual remote state.
async fn preview_push(
    target: &dyn CatalogTarget,
    products: &[CanonicalProduct],
) -> anyhow::Result<()> {
    let mut skus: Vec<String> = products
        .iter()
        .flat_map(|p| p.variants.iter())
        .filter(|v| !v.sku.is_empty())
        .map(|v| v.sku.clone())
        .collect();
    skus.sort();
    skus.dedup();

    let index = target.lookup_by_skus(&skus).await?;

    let mut creates = 0usize;
    let mut updates = 0usize;
    let mut unchanged = 0usize;
    let mut unplannable = 0usize;
    for product in products {
        match plan_product(product, &index) {
            Ok(PlannedAction::Create) => {
                creates += 1;
                println!("would create '{}'", product.title);
            }
            Ok(PlannedAction::Update(update)) => {
                updates += 1;
                println!(
                    "would update '{}': {} variant changes, {} new variants",
                    product.title,
                    update.changes.len(),
                    update.appends.len()
                );
            }
            Ok(PlannedAction::Unchanged) => unchanged += 1,
            Err(e) => {
                unplannable += 1;
                tracing::error!(title = %product.title, error = %e, "cannot plan product");
            }
        }
    }

    println!(
        "dry-run against {}: {creates} to create, {updates} to update, {unchanged} unchanged, {unplannable} unplannable",
        target.platform()
    );
    Ok(())
}

fn print_report(report: &SyncReport) {
    println!(
        "pushed {} products to {}: {} created, {} updated, {} unchanged, {} failed",
        report.outcomes.len(),
        report.platform,
        report.created(),
        report.updated(),
        report.unchanged(),
        report.failed()
    );
}
