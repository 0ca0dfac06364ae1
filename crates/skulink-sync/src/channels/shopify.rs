//! Shopify wired to the sync contracts.
//!
//! The Admin REST API has no SKU filter on the product listing, so SKU
//! resolution scans the catalog once and indexes the requested SKUs from it.

use std::collections::HashSet;

use async_trait::async_trait;
use rust_decimal::Decimal;
use skulink_core::{CanonicalProduct, Conversion, Platform, PlatformAdapter};
use skulink_shopify::types::{ShopifyInventoryPatch, ShopifyVariantPatch};
use skulink_shopify::{ShopifyAdapter, ShopifyClient};

use crate::error::SyncError;
use crate::plan::{InventoryTarget, ProductUpdate};
use crate::remote::{RemoteVariant, SkuIndex};
use crate::target::{CatalogSource, CatalogTarget};

use super::parse_remote_id;

pub struct ShopifyChannel {
    client: ShopifyClient,
    adapter: ShopifyAdapter,
    page_size: u32,
}

impl ShopifyChannel {
    #[must_use]
    pub fn new(client: ShopifyClient, page_size: u32) -> Self {
        Self {
            client,
            adapter: ShopifyAdapter::new(),
            page_size,
        }
    }
}

#[async_trait]
impl CatalogSource for ShopifyChannel {
    fn platform(&self) -> Platform {
        Platform::Shopify
    }

    async fn fetch_catalog(&self) -> Result<Vec<CanonicalProduct>, SyncError> {
        let records = self.client.fetch_all_products(self.page_size).await?;
        let mut catalog = Vec::with_capacity(records.len());
        for record in records {
            match self.adapter.from_platform(record)? {
                Conversion::Converted(product) => catalog.push(*product),
                Conversion::Skipped { id, reason } => {
                    tracing::warn!(
                        platform = %Platform::Shopify,
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
impl CatalogTarget for ShopifyChannel {
    fn platform(&self) -> Platform {
        Platform::Shopify
    }

    async fn lookup_by_skus(&self, skus: &[String]) -> Result<SkuIndex, SyncError> {
        let requested: HashSet<&str> = skus.iter().map(String::as_str).collect();
        let records = self.client.fetch_all_products(self.page_size).await?;

        let mut index = SkuIndex::new();
        for record in &records {
            let Some(product_id) = record.id else { continue };
            for variant in &record.variants {
                let Some(sku) = variant.sku.as_deref().filter(|s| !s.is_empty()) else {
                    continue;
                };
                if !requested.contains(sku) {
                    continue;
                }
                let Some(variant_id) = variant.id else { continue };
                let tracked = variant.inventory_management.as_deref() == Some("shopify");
                index.insert(
                    sku.to_string(),
                    RemoteVariant {
                        product_id: product_id.to_string(),
                        variant_id: variant_id.to_string(),
                        price: variant.price.parse::<Decimal>().ok(),
                        inventory: tracked.then(|| variant.inventory_quantity.unwrap_or(0)),
                    },
                );
            }
        }
        Ok(index)
    }

    async fn create(&self, product: &CanonicalProduct) -> Result<String, SyncError> {
        let record = self.adapter.to_platform(product)?;
        let stored = self.client.create_product(&record).await?;
        let id = stored.id.ok_or_else(|| SyncError::MissingRemoteId {
            platform: Platform::Shopify,
            title: product.title.clone(),
        })?;
        Ok(id.to_string())
    }

    async fn update(
        &self,
        product: &CanonicalProduct,
        update: &ProductUpdate,
    ) -> Result<(), SyncError> {
        for change in &update.changes {
            let id = parse_remote_id(Platform::Shopify, &change.remote_variant_id)?;
            let patch = ShopifyVariantPatch {
                id,
                price: change.new_price.map(|price| price.to_string()),
                inventory: change.new_inventory.map(|target| match target {
                    InventoryTarget::Tracked(quantity) => ShopifyInventoryPatch::Tracked(quantity),
                    InventoryTarget::Untracked => ShopifyInventoryPatch::Untracked,
                }),
            };
            self.client.update_variant(patch).await?;
        }

        if update.appends.is_empty() {
            return Ok(());
        }
        let parent_id = parse_remote_id(Platform::Shopify, &update.parent_id)?;
        for &position in &update.appends {
            let Some(variant) = product.variants.get(position) else {
                continue;
            };
            let payload = self.adapter.variant_payload(product, variant)?;
            self.client.create_variant(parent_id, &payload).await?;
        }
        Ok(())
    }
}
