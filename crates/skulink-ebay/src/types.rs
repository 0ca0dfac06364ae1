//! eBay Sell Inventory wire types.
//!
//! ## Observed shape notes
//!
//! Field names are camelCase on the wire. A catalog listing returns a mixed
//! feed of records, each either a standalone inventory item or an
//! inventory-item group; the two shapes are told apart by the presence of
//! `inventoryItemGroupKey`. Single items carry no price (prices live on
//! offers, and a standalone item's offer is managed outside this feed);
//! group records inline one offer per variant with price and quantity.
//! Price and quantity updates go through the SKU-keyed bulk endpoint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One record of the catalog feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EbayRecord {
    // Groups first: untagged decoding takes the first shape that fits, and
    // only groups carry the required `inventoryItemGroupKey`.
    Group(EbayInventoryItemGroup),
    Item(EbayInventoryItem),
}

/// A standalone inventory item: one product, one sale unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EbayInventoryItem {
    pub sku: String,
    /// Condition enum value, e.g. `NEW`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default)]
    pub product: EbayProductDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<EbayAvailability>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EbayProductDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Item specifics, e.g. `{"Size": ["M"]}`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aspects: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_urls: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EbayAvailability {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_to_location_availability: Option<EbayShipToLocationAvailability>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EbayShipToLocationAvailability {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
}

/// A multi-variant listing: shared details plus one offer per variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EbayInventoryItemGroup {
    pub inventory_item_group_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub varies_by: Option<EbayVariesBy>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub offers: Vec<EbayOffer>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EbayVariesBy {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specifications: Vec<EbaySpecification>,
}

/// One axis variants differ along, e.g. `Size: [S, M]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EbaySpecification {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

/// One variant's offer within a group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EbayOffer {
    pub sku: String,
    /// Decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_quantity: Option<i64>,
}

/// One page of the catalog feed.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EbayRecordsPage {
    #[serde(default)]
    pub records: Vec<EbayRecord>,
    #[serde(default)]
    pub total: Option<u32>,
}

/// One entry of a SKU-keyed bulk price/quantity update.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EbayPriceQuantity {
    pub sku: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EbayBulkPriceQuantityRequest {
    pub requests: Vec<EbayPriceQuantity>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn feed_discriminates_groups_by_group_key() {
        let record: EbayRecord = serde_json::from_value(json!({
            "inventoryItemGroupKey": "grp-1",
            "title": "Zip Hoodie",
            "offers": [{"sku": "HOOD-S", "price": "39.00", "availableQuantity": 4}]
        }))
        .expect("deserialize");
        match record {
            EbayRecord::Group(group) => {
                assert_eq!(group.inventory_item_group_key, "grp-1");
                assert_eq!(group.offers.len(), 1);
            }
            EbayRecord::Item(_) => panic!("expected a group"),
        }
    }

    #[test]
    fn feed_reads_plain_items_without_group_key() {
        let record: EbayRecord = serde_json::from_value(json!({
            "sku": "TOTE-1",
            "condition": "NEW",
            "product": {"title": "Canvas Tote", "aspects": {"Material": ["Canvas"]}},
            "availability": {"shipToLocationAvailability": {"quantity": 12}}
        }))
        .expect("deserialize");
        match record {
            EbayRecord::Item(item) => {
                assert_eq!(item.sku, "TOTE-1");
                assert_eq!(
                    item.availability
                        .and_then(|a| a.ship_to_location_availability)
                        .and_then(|s| s.quantity),
                    Some(12)
                );
            }
            EbayRecord::Group(_) => panic!("expected an item"),
        }
    }

    #[test]
    fn bulk_update_entries_skip_unset_fields() {
        let request = EbayBulkPriceQuantityRequest {
            requests: vec![EbayPriceQuantity {
                sku: "TOTE-1".to_string(),
                price: None,
                quantity: Some(7),
            }],
        };
        let body = serde_json::to_value(&request).expect("serialize");
        assert_eq!(body["requests"][0]["quantity"], 7);
        assert!(body["requests"][0].get("price").is_none());
    }
}
