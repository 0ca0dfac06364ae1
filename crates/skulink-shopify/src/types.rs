//! Shopify Admin REST wire types for the product resource.
//!
//! ## Observed shape notes
//!
//! ### Tags
//! The Admin API sends tags as a **comma-separated string** (`"mens, sale"`),
//! unlike the public `products.json` endpoint which sends an array. Empty
//! string when the product has no tags. Split/joined at the adapter boundary.
//!
//! ### Prices
//! Always decimal strings (`"30.00"`), never numbers. `compare_at_price` is
//! explicitly `null` when the variant is not on sale, not `"0.00"`.
//!
//! ### Option slots
//! A variant's selections live in the fixed slots `option1`..`option3`, in
//! the order of the product's declared `options` list. A product with no
//! configured options reports one placeholder option named `Title` with the
//! single value `Default Title`.
//!
//! ### Inventory
//! `inventory_management` is `"shopify"` when Shopify tracks stock for the
//! variant and `null` otherwise; `inventory_quantity` is only meaningful in
//! the tracked case.
//!
//! ### Metafields
//! Reads and writes carry the product's and each variant's metafields inline.
//! Canonical identity persists under the `canonical` namespace (see the
//! adapter).

use serde::{Deserialize, Serialize};

/// Top-level response from `GET /admin/api/{version}/products.json`.
#[derive(Debug, Deserialize)]
pub struct ShopifyProductsResponse {
    pub products: Vec<ShopifyProduct>,
}

/// Envelope for single-product responses and create payloads.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShopifyProductEnvelope {
    pub product: ShopifyProduct,
}

/// Envelope for single-variant responses and create/update payloads.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShopifyVariantEnvelope {
    pub variant: ShopifyVariant,
}

/// A product as the Admin API represents it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopifyProduct {
    /// Absent on create payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    /// Raw HTML description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    /// `"active"`, `"draft"` or `"archived"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Comma-separated tag list; empty string when untagged.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tags: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ShopifyOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ShopifyImage>,
    #[serde(default)]
    pub variants: Vec<ShopifyVariant>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metafields: Vec<ShopifyMetafield>,
}

/// A declared option dimension (`Size`, `Color`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopifyOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    /// 1-based; determines which `optionN` slot variants use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

/// A single purchasable variant of a [`ShopifyProduct`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopifyVariant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,
    /// Display title, e.g. `"Large / Red"` or `"Default Title"`.
    #[serde(default)]
    pub title: String,
    /// May be empty on stores that do not assign SKUs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Decimal string, never null.
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_shipping: Option<bool>,
    /// `"shopify"` when stock is tracked, `null` otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_management: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_quantity: Option<i64>,
    /// Links the variant to an entry of the product's image gallery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metafields: Vec<ShopifyMetafield>,
}

/// An image in the product gallery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopifyImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
}

/// A namespaced key/value metafield. Values are always transported as
/// strings; JSON payloads are serialized into `value` with `type = "json"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopifyMetafield {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub namespace: String,
    pub key: String,
    pub value: String,
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub value_type: Option<String>,
}

impl ShopifyMetafield {
    #[must_use]
    pub fn json(namespace: &str, key: &str, value: String) -> Self {
        Self {
            id: None,
            namespace: namespace.to_string(),
            key: key.to_string(),
            value,
            value_type: Some("json".to_string()),
        }
    }

    #[must_use]
    pub fn text(namespace: &str, key: &str, value: String) -> Self {
        Self {
            id: None,
            namespace: namespace.to_string(),
            key: key.to_string(),
            value,
            value_type: Some("single_line_text_field".to_string()),
        }
    }
}

/// Inventory half of a variant patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopifyInventoryPatch {
    /// Track stock under Shopify's inventory service with this on-hand count.
    Tracked(i64),
    /// Stop tracking stock for the variant.
    Untracked,
}

/// Minimal-diff update payload for `PUT /variants/{id}.json`. Only fields the
/// reconciler decided to change are serialized; omitted fields are left
/// untouched by the store.
///
/// Serialization is hand-rolled because untracking requires an **explicit**
/// `"inventory_management": null`, which `skip_serializing_if` cannot emit.
#[derive(Debug, Clone, Default)]
pub struct ShopifyVariantPatch {
    pub id: i64,
    pub price: Option<String>,
    pub inventory: Option<ShopifyInventoryPatch>,
}

impl Serialize for ShopifyVariantPatch {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let fields = 1
            + usize::from(self.price.is_some())
            + if self.inventory.is_some() { 2 } else { 0 };
        let mut map = serializer.serialize_map(Some(fields))?;
        map.serialize_entry("id", &self.id)?;
        if let Some(price) = &self.price {
            map.serialize_entry("price", price)?;
        }
        match self.inventory {
            Some(ShopifyInventoryPatch::Tracked(quantity)) => {
                map.serialize_entry("inventory_management", "shopify")?;
                map.serialize_entry("inventory_quantity", &quantity)?;
            }
            Some(ShopifyInventoryPatch::Untracked) => {
                map.serialize_entry("inventory_management", &Option::<&str>::None)?;
                map.serialize_entry("inventory_quantity", &Option::<i64>::None)?;
            }
            None => {}
        }
        map.end()
    }
}

/// Envelope for variant patch payloads.
#[derive(Debug, Serialize)]
pub struct ShopifyVariantPatchEnvelope {
    pub variant: ShopifyVariantPatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_deserializes_admin_shape() {
        let json = r#"{
            "id": 111,
            "product_id": 42,
            "title": "Large / Red",
            "sku": "TJ-L-R",
            "price": "30.00",
            "compare_at_price": null,
            "option1": "Large",
            "option2": "Red",
            "inventory_management": "shopify",
            "inventory_quantity": 7
        }"#;
        let variant: ShopifyVariant = serde_json::from_str(json).expect("deserialize");
        assert_eq!(variant.id, Some(111));
        assert_eq!(variant.price, "30.00");
        assert!(variant.compare_at_price.is_none());
        assert_eq!(variant.inventory_management.as_deref(), Some("shopify"));
        assert_eq!(variant.inventory_quantity, Some(7));
        assert!(variant.metafields.is_empty());
    }

    #[test]
    fn patch_serializes_only_changed_fields() {
        let patch = ShopifyVariantPatch {
            id: 111,
            price: None,
            inventory: Some(ShopifyInventoryPatch::Tracked(3)),
        };
        let json = serde_json::to_value(ShopifyVariantPatchEnvelope { variant: patch })
            .expect("serialize");
        assert_eq!(json["variant"]["inventory_management"], "shopify");
        assert_eq!(json["variant"]["inventory_quantity"], 3);
        assert!(json["variant"].get("price").is_none());
    }

    #[test]
    fn patch_untrack_sends_explicit_nulls() {
        let patch = ShopifyVariantPatch {
            id: 111,
            price: None,
            inventory: Some(ShopifyInventoryPatch::Untracked),
        };
        let json = serde_json::to_value(ShopifyVariantPatchEnvelope { variant: patch })
            .expect("serialize");
        assert!(json["variant"]["inventory_management"].is_null());
        assert!(json["variant"]["inventory_quantity"].is_null());
        // Explicit nulls, not omitted keys.
        assert!(json["variant"].as_object().is_some_and(|v| v.contains_key("inventory_management")));
    }

    #[test]
    fn metafield_type_field_uses_wire_name() {
        let field = ShopifyMetafield::json("canonical", "meta", "{}".to_string());
        let json = serde_json::to_value(&field).expect("serialize");
        assert_eq!(json["type"], "json");
        assert_eq!(json["namespace"], "canonical");
    }
}
