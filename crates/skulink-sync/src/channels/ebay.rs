//! eBay wired to the sync contracts.
//!
//! The catalog feed has no SKU filter, so resolution scans the feed once and
//! indexes requested SKUs from it. Index keys are plain canonical SKUs;
//! the stored `variant_id` is the full wire SKU (with its embedded metadata
//! suffix), because that string is the identity every mutation endpoint is
//! keyed by. Re-encoding a SKU during an update would mint a new remote
//! identity, so updates always address the wire SKU exactly as observed.

use std::collections::HashSet;

use async_trait::async_trait;
use rust_decimal::Decimal;
use skulink_core::{CanonicalProduct, Conversion, Platform, PlatformAdapter};
use skulink_ebay::sku::decode_sku;
use skulink_ebay::types::{EbayInventoryItem, EbayPriceQuantity, EbayRecord};
use skulink_ebay::{EbayAdapter, EbayClient, EbayError};

use crate::error::SyncError;
use crate::plan::{InventoryTarget, ProductUpdate};
use crate::remote::{RemoteVariant, SkuIndex};
use crate::target::{CatalogSource, CatalogTarget};

pub struct EbayChannel {
    client: EbayClient,
    adapter: EbayAdapter,
    page_size: u32,
}

impl EbayChannel {
    #[must_use]
    pub fn new(client: EbayClient, page_size: u32) -> Self {
        Self {
            client,
            adapter: EbayAdapter::new(),
            page_size,
        }
    }
}

#[async_trait]
impl CatalogSource for EbayChannel {
    fn platform(&self) -> Platform {
        Platform::Ebay
    }

    async fn fetch_catalog(&self) -> Result<Vec<CanonicalProduct>, SyncError> {
        let records = self.client.fetch_all_records(self.page_size).await?;
        let mut catalog = Vec::with_capacity(records.len());
        for record in records {
            match self.adapter.from_platform(record)? {
                Conversion::Converted(product) => catalog.push(*product),
                Conversion::Skipped { id, reason } => {
                    tracing::warn!(
                        platform = %Platform::Ebay,
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
impl CatalogTarget for EbayChannel {
    fn platform(&self) -> Platform {
        Platform::Ebay
    }

    async fn lookup_by_skus(&self, skus: &[String]) -> Result<SkuIndex, SyncError> {
        let requested: HashSet<&str> = skus.iter().map(String::as_str).collect();
        let records = self.client.fetch_all_records(self.page_size).await?;

        let mut index = SkuIndex::new();
        for record in &records {
            match record {
                EbayRecord::Item(item) => {
                    let (plain, _) = decode_sku(&item.sku);
                    if !requested.contains(plain.as_str()) {
                        continue;
                    }
                    index.insert(
                        plain,
                        RemoteVariant {
                            product_id: item.sku.clone(),
                            variant_id: item.sku.clone(),
                            // Standalone items expose no price on this feed;
                            // the planner never price-diffs such rows.
                            price: None,
                            inventory: item_quantity(item),
                        },
                    );
                }
                EbayRecord::Group(group) => {
                    for offer in &group.offers {
                        let (plain, _) = decode_sku(&offer.sku);
                        if !requested.contains(plain.as_str()) {
                            continue;
                        }
                        index.insert(
                            plain,
                            RemoteVariant {
                                product_id: group.inventory_item_group_key.clone(),
                                variant_id: offer.sku.clone(),
                                price: offer
                                    .price
                                    .as_deref()
                                    .and_then(|p| p.parse::<Decimal>().ok()),
                                inventory: offer.available_quantity,
                            },
                        );
                    }
                }
            }
        }
        Ok(index)
    }

    async fn create(&self, product: &CanonicalProduct) -> Result<String, SyncError> {
        match self.adapter.to_platform(product)? {
            EbayRecord::Item(item) => {
                self.client.put_inventory_item(&item.sku, &item).await?;
                Ok(item.sku)
            }
            EbayRecord::Group(group) => {
                self.client
                    .put_item_group(&group.inventory_item_group_key, &group)
                    .await?;
                Ok(group.inventory_item_group_key)
            }
        }
    }

    async fn update(
        &self,
        product: &CanonicalProduct,
        update: &ProductUpdate,
    ) -> Result<(), SyncError> {
        let requests: Vec<EbayPriceQuantity> = update
            .changes
            .iter()
            .filter_map(|change| {
                let price = change.new_price.map(|p| p.to_string());
                let quantity = match change.new_inventory {
                    Some(InventoryTarget::Tracked(quantity)) => Some(quantity),
                    // There is no untracked state on this surface; leaving
                    // the quantity untouched is the closest thing.
                    Some(InventoryTarget::Untracked) | None => None,
                };
                if price.is_none() && quantity.is_none() {
                    return None;
                }
                Some(EbayPriceQuantity {
                    sku: change.remote_variant_id.clone(),
                    price,
                    quantity,
                })
            })
            .collect();
        if !requests.is_empty() {
            self.client.bulk_update_price_quantity(requests).await?;
        }

        if update.appends.is_empty() {
            return Ok(());
        }

        // New variants merge into the existing group; a standalone item that
        // grew extra variants is re-emitted as a group instead.
        match self.client.get_item_group(&update.parent_id).await {
            Ok(mut group) => {
                for &position in &update.appends {
                    let Some(variant) = product.variants.get(position) else {
                        continue;
                    };
                    group.offers.push(self.adapter.offer_payload(variant)?);
                }
                self.client
                    .put_item_group(&update.parent_id, &group)
                    .await?;
            }
            Err(EbayError::NotFound { .. }) => {
                if let EbayRecord::Group(group) = self.adapter.to_platform(product)? {
                    tracing::warn!(
                        product = %product.title,
                        group_key = %group.inventory_item_group_key,
                        "standalone item grew variants, re-emitting as an item group"
                    );
                    self.client
                        .put_item_group(&group.inventory_item_group_key, &group)
                        .await?;
                }
            }
            Err(error) => return Err(error.into()),
        }
        Ok(())
    }
}

fn item_quantity(item: &EbayInventoryItem) -> Option<i64> {
    item.availability
        .as_ref()
        .and_then(|availability| availability.ship_to_location_availability.as_ref())
        .and_then(|ship| ship.quantity)
}
