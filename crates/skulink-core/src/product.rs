use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::meta::PlatformMeta;

/// A product in canonical form, independent of any one platform's shape.
///
/// Canonical JSON uses camelCase keys; the same serialization is what gets
/// embedded into platform-side metadata carriers, so the casing here is part
/// of the wire contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalProduct {
    /// Identifier of the record on the platform it was last read from.
    /// Advisory only: cross-platform matching is by variant SKU, never by
    /// this field.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Ordered product images.
    #[serde(default)]
    pub images: Vec<CanonicalImage>,
    /// Declared option dimensions (e.g. `Size`, `Color`) with their ordered
    /// value lists. Variants reference these by attribute name.
    #[serde(default)]
    pub options: Vec<CanonicalProductOption>,
    #[serde(default)]
    pub product_type: Option<String>,
    /// Lifecycle status in canonical vocabulary: `"active"`, `"draft"` or
    /// `"archived"`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub variants: Vec<CanonicalVariant>,
    /// Per-platform identity and bookkeeping for the product itself.
    #[serde(default)]
    pub meta: PlatformMeta,
}

impl CanonicalProduct {
    /// Returns the total number of variants for this product.
    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    /// Returns `true` when the product has more than one purchasable variant.
    #[must_use]
    pub fn has_multiple_variants(&self) -> bool {
        self.variants.len() > 1
    }

    /// Finds the variant carrying `sku`, if any. Empty SKUs never match.
    #[must_use]
    pub fn find_variant_by_sku(&self, sku: &str) -> Option<&CanonicalVariant> {
        if sku.is_empty() {
            return None;
        }
        self.variants.iter().find(|v| v.sku == sku)
    }
}

/// A single purchasable variant of a [`CanonicalProduct`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalVariant {
    /// Stable cross-platform identity, assigned exactly once when a record is
    /// first converted into canonical form. Never derived from platform data
    /// and never regenerated afterwards.
    pub canonical_id: Uuid,
    pub title: String,
    /// Unit price. Serialized as a decimal string (`"12.99"`), matching what
    /// every platform wire format expects.
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    /// Pre-sale comparison price, if set.
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub compare_at_price: Option<Decimal>,
    /// Merchant SKU. The reconciliation join key; may be empty, in which case
    /// the variant never matches remote state.
    #[serde(default)]
    pub sku: String,
    /// Available quantity. `None` means inventory is not tracked for this
    /// variant, which is distinct from a tracked quantity of zero.
    #[serde(default)]
    pub inventory: Option<i64>,
    /// Whether the source platform was managing stock for this variant.
    #[serde(default)]
    pub manage_stock: Option<bool>,
    #[serde(default)]
    pub taxable: Option<bool>,
    #[serde(default)]
    pub requires_shipping: Option<bool>,
    /// Option selections, e.g. `Size=Large`, `Color=Red`. Names correspond to
    /// the product's declared [`CanonicalProductOption`]s where those exist.
    #[serde(default)]
    pub attributes: Vec<VariantAttribute>,
    #[serde(default)]
    pub image: Option<CanonicalImage>,
    /// Per-platform identity and bookkeeping for this variant.
    #[serde(default)]
    pub meta: PlatformMeta,
}

impl CanonicalVariant {
    /// Returns the value of the attribute named `name`, if present.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}

/// A product or variant image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalImage {
    /// Platform-assigned identifier, stored as a string to avoid precision
    /// loss on numeric IDs.
    #[serde(default)]
    pub id: Option<String>,
    pub src: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub position: Option<i32>,
}

/// A declared option dimension with its ordered values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalProductOption {
    pub name: String,
    pub values: Vec<String>,
}

/// One option selection on a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantAttribute {
    pub name: String,
    pub value: String,
}

impl VariantAttribute {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
