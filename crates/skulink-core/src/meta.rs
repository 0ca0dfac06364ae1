//! Per-platform identity and bookkeeping attached to canonical records.
//!
//! The meta map travels with every canonical product and variant and is
//! persisted on each platform through that platform's metadata carrier
//! (metafields, `meta_data` entries, SKU-embedded payloads). Platforms this
//! build does not know about pass through the flattened `extra` maps
//! untouched, so a newer peer's sub-records survive a round trip through an
//! older one.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of platforms this system speaks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Shopify,
    Woo,
    Ebay,
}

impl Platform {
    /// Stable lowercase name, used in logs and meta keys.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Shopify => "shopify",
            Platform::Woo => "woo",
            Platform::Ebay => "ebay",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform-keyed metadata for one canonical product or variant.
///
/// Merging is additive: converting a platform record into canonical form
/// unions newly observed values into the existing map and never replaces the
/// map wholesale, so identity learned from one platform survives a pass
/// through another.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shopify: Option<ShopifyMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub woo: Option<WooMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ebay: Option<EbayMeta>,
    /// Sub-records for platforms unknown to this build, passed through
    /// verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl PlatformMeta {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shopify.is_none() && self.woo.is_none() && self.ebay.is_none() && self.extra.is_empty()
    }

    /// Unions `newer` into `self`. Known fields take the newer value when the
    /// newer side has one; `extra` keys union with the newer value winning;
    /// platform sub-records absent on the newer side are retained as-is.
    pub fn merge_from(&mut self, newer: PlatformMeta) {
        match (&mut self.shopify, newer.shopify) {
            (Some(current), Some(incoming)) => current.merge_from(incoming),
            (current @ None, Some(incoming)) => *current = Some(incoming),
            _ => {}
        }
        match (&mut self.woo, newer.woo) {
            (Some(current), Some(incoming)) => current.merge_from(incoming),
            (current @ None, Some(incoming)) => *current = Some(incoming),
            _ => {}
        }
        match (&mut self.ebay, newer.ebay) {
            (Some(current), Some(incoming)) => current.merge_from(incoming),
            (current @ None, Some(incoming)) => *current = Some(incoming),
            _ => {}
        }
        self.extra.extend(newer.extra);
    }

    /// The Shopify sub-record, created empty on first access.
    pub fn shopify_mut(&mut self) -> &mut ShopifyMeta {
        self.shopify.get_or_insert_with(ShopifyMeta::default)
    }

    /// The WooCommerce sub-record, created empty on first access.
    pub fn woo_mut(&mut self) -> &mut WooMeta {
        self.woo.get_or_insert_with(WooMeta::default)
    }

    /// The eBay sub-record, created empty on first access.
    pub fn ebay_mut(&mut self) -> &mut EbayMeta {
        self.ebay.get_or_insert_with(EbayMeta::default)
    }
}

/// Shopify-side identity for a canonical record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyMeta {
    /// Product or variant ID as Shopify reports it, stored as a string to
    /// avoid precision loss.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ShopifyMeta {
    fn merge_from(&mut self, newer: ShopifyMeta) {
        if newer.id.is_some() {
            self.id = newer.id;
        }
        self.extra.extend(newer.extra);
    }
}

/// WooCommerce-side identity for a canonical record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WooMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Which WooCommerce shape this product was last written as: `"simple"`
    /// or `"variable"`. Once a product has been variable it stays variable
    /// even if it drops to one variant, so the representation never
    /// oscillates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl WooMeta {
    fn merge_from(&mut self, newer: WooMeta) {
        if newer.id.is_some() {
            self.id = newer.id;
        }
        if newer.product_type.is_some() {
            self.product_type = newer.product_type;
        }
        self.extra.extend(newer.extra);
    }
}

/// eBay-side identity for a canonical record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EbayMeta {
    /// Inventory item group key for multi-variant listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_key: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl EbayMeta {
    fn merge_from(&mut self, newer: EbayMeta) {
        if newer.group_key.is_some() {
            self.group_key = newer.group_key;
        }
        self.extra.extend(newer.extra);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn platform_names_are_lowercase() {
        assert_eq!(Platform::Shopify.as_str(), "shopify");
        assert_eq!(Platform::Woo.to_string(), "woo");
        assert_eq!(Platform::Ebay.as_str(), "ebay");
    }

    #[test]
    fn empty_meta_reports_empty() {
        assert!(PlatformMeta::default().is_empty());
    }

    #[test]
    fn merge_unions_platforms_from_both_sides() {
        let mut base = PlatformMeta::default();
        base.shopify_mut().id = Some("111".to_string());

        let mut newer = PlatformMeta::default();
        newer.woo_mut().id = Some(42);

        base.merge_from(newer);
        assert_eq!(base.shopify.as_ref().and_then(|s| s.id.as_deref()), Some("111"));
        assert_eq!(base.woo.as_ref().and_then(|w| w.id), Some(42));
    }

    #[test]
    fn merge_newer_value_wins_per_field() {
        let mut base = PlatformMeta::default();
        base.woo_mut().id = Some(1);
        base.woo_mut().product_type = Some("variable".to_string());

        let mut newer = PlatformMeta::default();
        newer.woo_mut().id = Some(2);

        base.merge_from(newer);
        let woo = base.woo.expect("woo meta present");
        assert_eq!(woo.id, Some(2));
        // A field the newer side did not observe is retained.
        assert_eq!(woo.product_type.as_deref(), Some("variable"));
    }

    #[test]
    fn merge_never_drops_absent_platforms() {
        let mut base = PlatformMeta::default();
        base.ebay_mut().group_key = Some("grp-1".to_string());

        base.merge_from(PlatformMeta::default());
        assert_eq!(
            base.ebay.as_ref().and_then(|e| e.group_key.as_deref()),
            Some("grp-1")
        );
    }

    #[test]
    fn unknown_platform_subrecords_pass_through() {
        let json = json!({
            "shopify": { "id": "9" },
            "bigcommerce": { "id": 77, "channel": "eu" }
        });
        let meta: PlatformMeta = serde_json::from_value(json).expect("deserialize");
        assert_eq!(meta.extra["bigcommerce"]["channel"], "eu");

        let out = serde_json::to_value(&meta).expect("serialize");
        assert_eq!(out["bigcommerce"]["id"], 77);
        assert_eq!(out["shopify"]["id"], "9");
    }

    #[test]
    fn serde_uses_camel_case_keys() {
        let mut meta = PlatformMeta::default();
        meta.woo_mut().product_type = Some("simple".to_string());
        meta.ebay_mut().group_key = Some("grp-x".to_string());

        let out = serde_json::to_value(&meta).expect("serialize");
        assert_eq!(out["woo"]["productType"], "simple");
        assert_eq!(out["ebay"]["groupKey"], "grp-x");
    }

    #[test]
    fn unknown_fields_inside_subrecords_survive() {
        let json = json!({
            "woo": { "id": 5, "permalink": "https://shop.example/p/5" }
        });
        let meta: PlatformMeta = serde_json::from_value(json).expect("deserialize");
        let out = serde_json::to_value(&meta).expect("serialize");
        assert_eq!(out["woo"]["permalink"], "https://shop.example/p/5");
    }
}
