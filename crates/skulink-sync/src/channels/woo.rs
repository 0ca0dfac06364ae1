//! WooCommerce wired to the sync contracts.
//!
//! SKU resolution uses the store's native `?sku=` filter; matches come back
//! as `simple` rows (the product is its own variant) or `variation` rows
//! carrying their `parent_id`. Mutations split accordingly: price and stock
//! on a simple parent patch the product itself, variation changes and
//! appends go through one variation batch call per product.

use std::collections::HashSet;

use async_trait::async_trait;
use rust_decimal::Decimal;
use skulink_core::{CanonicalProduct, Conversion, Platform, PlatformAdapter};
use skulink_woo::types::{
    WooProduct, WooProductPatch, WooProductType, WooVariationBatch, WooVariationPatch,
};
use skulink_woo::{infer_inventory, WooAdapter, WooClient};

use crate::error::SyncError;
use crate::plan::{InventoryTarget, ProductUpdate, VariantChange};
use crate::remote::{RemoteVariant, SkuIndex};
use crate::target::{CatalogSource, CatalogTarget};

use super::parse_remote_id;

pub struct WooChannel {
    client: WooClient,
    adapter: WooAdapter,
    page_size: u32,
}

impl WooChannel {
    #[must_use]
    pub fn new(client: WooClient, page_size: u32) -> Self {
        Self {
            client,
            adapter: WooAdapter::new(),
            page_size,
        }
    }
}

#[async_trait]
impl CatalogSource for WooChannel {
    fn platform(&self) -> Platform {
        Platform::Woo
    }

    async fn fetch_catalog(&self) -> Result<Vec<CanonicalProduct>, SyncError> {
        let records = self.client.fetch_all_products(self.page_size).await?;
        let mut catalog = Vec::with_capacity(records.len());
        for record in records {
            match self.adapter.from_platform(record)? {
                Conversion::Converted(product) => catalog.push(*product),
                Conversion::Skipped { id, reason } => {
                    tracing::warn!(
                        platform = %Platform::Woo,
                        record_id = %id,
                        reason = %reason,
                        "skipping record"
                    );
                }
            }
        }
        Ok(catalog)
    }
}

#[async_trait]
impl CatalogTarget for WooChannel {
    fn platform(&self) -> Platform {
        Platform::Woo
    }

    async fn lookup_by_skus(&self, skus: &[String]) -> Result<SkuIndex, SyncError> {
        let requested: HashSet<&str> = skus.iter().map(String::as_str).collect();
        let rows = self.client.lookup_by_skus(skus).await?;

        let mut index = SkuIndex::new();
        for row in &rows {
            let Some(sku) = row.sku.as_deref().filter(|s| requested.contains(s)) else {
                continue;
            };
            let Some(row_id) = row.id else { continue };
            let remote = match row.product_type {
                WooProductType::Simple => RemoteVariant {
                    product_id: row_id.to_string(),
                    variant_id: row_id.to_string(),
                    price: effective_price(row),
                    inventory: infer_inventory(row.stock_quantity, row.stock_status.as_deref()),
                },
                WooProductType::Variation => {
                    let Some(parent_id) = row.parent_id else { continue };
                    RemoteVariant {
                        product_id: parent_id.to_string(),
                        variant_id: row_id.to_string(),
                        price: effective_price(row),
                        inventory: infer_inventory(row.stock_quantity, row.stock_status.as_deref()),
                    }
                }
                // A parent-level SKU on a variable product carries no
                // variant semantics; grouped and external rows are not
                // sale units at all.
                WooProductType::Variable
                | WooProductType::Grouped
                | WooProductType::External => {
                    tracing::debug!(
                        sku = %sku,
                        row_type = row.product_type.as_str(),
                        "ignoring non-variant row matched by sku"
                    );
                    continue;
                }
            };
            index.insert(sku.to_string(), remote);
        }
        Ok(index)
    }

    async fn create(&self, product: &CanonicalProduct) -> Result<String, SyncError> {
        let record = self.adapter.to_platform(product)?;
        // Variations never travel inline: the parent is created first, the
        // variations follow in a second phase against its id.
        let variations = record.variation_records.clone();
        let stored = self.client.create_product(&record).await?;
        let parent_id = stored.id.ok_or_else(|| SyncError::MissingRemoteId {
            platform: Platform::Woo,
            title: product.title.clone(),
        })?;

        if !variations.is_empty() {
            let batch = WooVariationBatch {
                create: variations,
                update: Vec::new(),
            };
            self.client.batch_variations(parent_id, &batch).await?;
        }
        Ok(parent_id.to_string())
    }

    async fn update(
        &self,
        product: &CanonicalProduct,
        update: &ProductUpdate,
    ) -> Result<(), SyncError> {
        let parent_id = parse_remote_id(Platform::Woo, &update.parent_id)?;

        let mut product_patch = WooProductPatch::default();
        let mut batch = WooVariationBatch::default();
        for change in &update.changes {
            // A simple product is its own variant: the matched row id equals
            // the parent id and the mutation patches the product itself.
            if change.remote_variant_id == update.parent_id {
                product_patch = simple_patch(product, change);
            } else {
                batch.update.push(variation_patch(product, change)?);
            }
        }

        if !update.appends.is_empty() {
            let parent = self.client.get_product(parent_id).await?;
            if parent.product_type == WooProductType::Variable {
                for &position in &update.appends {
                    let Some(variant) = product.variants.get(position) else {
                        continue;
                    };
                    batch.create.push(self.adapter.variation_payload(variant)?);
                }
            } else {
                tracing::warn!(
                    product = %product.title,
                    parent_id,
                    skipped = update.appends.len(),
                    "cannot append variations to a non-variable product"
                );
            }
        }

        if !product_patch.is_empty() {
            self.client.update_product(parent_id, &product_patch).await?;
        }
        if !batch.is_empty() {
            self.client.batch_variations(parent_id, &batch).await?;
        }
        Ok(())
    }
}

/// Current effective price of a row: the computed `price` when the store
/// reports one, else sale, else regular. Empty strings count as unset.
fn effective_price(row: &WooProduct) -> Option<Decimal> {
    parse_price_field(row.price.as_deref())
        .or_else(|| parse_price_field(row.sale_price.as_deref()))
        .or_else(|| parse_price_field(row.regular_price.as_deref()))
}

fn parse_price_field(value: Option<&str>) -> Option<Decimal> {
    value.filter(|v| !v.is_empty()).and_then(|v| v.parse().ok())
}

fn simple_patch(product: &CanonicalProduct, change: &VariantChange) -> WooProductPatch {
    let (regular_price, sale_price) = price_fields(product, change);
    let (manage_stock, stock_quantity, stock_status) = inventory_fields(change.new_inventory);
    WooProductPatch {
        regular_price,
        sale_price,
        manage_stock,
        stock_quantity,
        stock_status,
    }
}

fn variation_patch(
    product: &CanonicalProduct,
    change: &VariantChange,
) -> Result<WooVariationPatch, SyncError> {
    let id = parse_remote_id(Platform::Woo, &change.remote_variant_id)?;
    let (regular_price, sale_price) = price_fields(product, change);
    let (manage_stock, stock_quantity, stock_status) = inventory_fields(change.new_inventory);
    Ok(WooVariationPatch {
        id,
        regular_price,
        sale_price,
        manage_stock,
        stock_quantity,
        stock_status,
    })
}

/// Renders a price change into Woo's regular/sale pair. With a canonical
/// compare-at price the effective price is the sale price; without one the
/// sale price is written as `""`, which clears any remote sale so the
/// regular price becomes effective again.
fn price_fields(
    product: &CanonicalProduct,
    change: &VariantChange,
) -> (Option<String>, Option<String>) {
    let Some(price) = change.new_price else {
        return (None, None);
    };
    let compare_at = product
        .find_variant_by_sku(&change.sku)
        .and_then(|variant| variant.compare_at_price);
    match compare_at {
        Some(regular) => (Some(regular.to_string()), Some(price.to_string())),
        None => (Some(price.to_string()), Some(String::new())),
    }
}

fn inventory_fields(
    target: Option<InventoryTarget>,
) -> (Option<bool>, Option<i64>, Option<String>) {
    match target {
        None => (None, None, None),
        Some(InventoryTarget::Tracked(quantity)) => {
            let status = if quantity > 0 { "instock" } else { "outofstock" };
            (Some(true), Some(quantity), Some(status.to_string()))
        }
        Some(InventoryTarget::Untracked) => (Some(false), None, Some("outofstock".to_string())),
    }
}
