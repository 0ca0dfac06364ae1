//! WooCommerce REST v3 wire types for products and variations.
//!
//! ## Observed shape notes
//!
//! ### Prices
//! `regular_price` and `sale_price` are decimal strings and arrive as empty
//! strings (`""`) when unset, not `null`. The read-only `price` field carries
//! the computed current price.
//!
//! ### `manage_stock`
//! Boolean on products, but variations report the literal string `"parent"`
//! when they inherit stock management from their parent. Deserialized
//! tolerantly: `"parent"` reads as absent.
//!
//! ### `meta_data`
//! An array of `{id, key, value}` entries where `value` is arbitrary JSON.
//! This store's canonical carriers are JSON documents serialized into string
//! values, but reads tolerate inline objects as well.
//!
//! ### Variations
//! `GET /products` returns variation IDs only; the client hydrates full
//! variation records with follow-up requests before handing products to the
//! adapter. Writes never inline variations: parents are created first, then
//! variations through the `/products/{id}/variations` endpoints.
//!
//! ### Images
//! Image order is the array order; there is no position field.

use serde::{Deserialize, Serialize};

/// The `type` field of a product record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WooProductType {
    #[default]
    Simple,
    Variable,
    Grouped,
    External,
    /// Returned by SKU lookups for rows that are variations of some parent.
    Variation,
}

impl WooProductType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            WooProductType::Simple => "simple",
            WooProductType::Variable => "variable",
            WooProductType::Grouped => "grouped",
            WooProductType::External => "external",
            WooProductType::Variation => "variation",
        }
    }
}

/// A product record as `GET /wp-json/wc/v3/products` returns it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WooProduct {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(rename = "type", default)]
    pub product_type: WooProductType,
    /// `"publish"`, `"draft"`, `"private"`, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regular_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<String>,
    /// Read-only computed price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(
        default,
        deserialize_with = "manage_stock_tolerant",
        skip_serializing_if = "Option::is_none"
    )]
    pub manage_stock: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i64>,
    /// `"instock"`, `"outofstock"` or `"onbackorder"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<WooTag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<WooCategory>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<WooProductAttribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<WooImage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meta_data: Vec<WooMetaData>,
    /// Variation IDs exactly as the API reports them.
    #[serde(rename = "variations", default, skip_serializing_if = "Vec::is_empty")]
    pub variation_ids: Vec<i64>,
    /// Hydrated variation records. Never on the wire: the client fills this
    /// after fetching, and writes go through the variation endpoints.
    #[serde(skip)]
    pub variation_records: Vec<WooVariation>,
    /// Present on `variation` rows returned by SKU lookups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
}

/// A variation of a variable product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WooVariation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regular_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(
        default,
        deserialize_with = "manage_stock_tolerant",
        skip_serializing_if = "Option::is_none"
    )]
    pub manage_stock: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<WooVariationAttribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<WooImage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meta_data: Vec<WooMetaData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WooTag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WooCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
}

/// An attribute definition on a parent product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WooProductAttribute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    /// Whether variations select along this attribute.
    #[serde(default)]
    pub variation: bool,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// One attribute selection on a variation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WooVariationAttribute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub option: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WooImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// A `{key, value}` metadata entry; `value` is arbitrary JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WooMetaData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub key: String,
    pub value: serde_json::Value,
}

impl WooMetaData {
    #[must_use]
    pub fn new(key: &str, value: serde_json::Value) -> Self {
        Self {
            id: None,
            key: key.to_string(),
            value,
        }
    }
}

/// Minimal-diff patch for `PUT /products/{id}` on simple products. Only the
/// fields the reconciler decided to change are serialized.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WooProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manage_stock: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_status: Option<String>,
}

impl WooProductPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regular_price.is_none()
            && self.sale_price.is_none()
            && self.manage_stock.is_none()
            && self.stock_quantity.is_none()
            && self.stock_status.is_none()
    }
}

/// One `update` entry of a variation batch call.
#[derive(Debug, Clone, Serialize)]
pub struct WooVariationPatch {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manage_stock: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_status: Option<String>,
}

/// Payload for `POST /products/{id}/variations/batch`: creates and updates
/// in one round trip.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WooVariationBatch {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub create: Vec<WooVariation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub update: Vec<WooVariationPatch>,
}

impl WooVariationBatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.update.is_empty()
    }
}

/// Response of a variation batch call.
#[derive(Debug, Default, Deserialize)]
pub struct WooVariationBatchResponse {
    #[serde(default)]
    pub create: Vec<WooVariation>,
    #[serde(default)]
    pub update: Vec<WooVariation>,
}

fn default_visible() -> bool {
    true
}

/// Tolerant `manage_stock` reader: `true`/`false` pass through, the
/// variation-only literal `"parent"` (and anything else non-boolean) reads
/// as absent.
fn manage_stock_tolerant<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_bool())
}
