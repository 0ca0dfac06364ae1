//! Remote state gathered by the batched SKU lookup.

use std::collections::HashMap;

use rust_decimal::Decimal;

/// What the target platform currently holds for one SKU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteVariant {
    /// Id of the remote parent record: a product id on Shopify and Woo, a
    /// group key (or the item's own wire SKU) on eBay.
    pub product_id: String,
    /// Id a mutation of this variant must address: variant id, variation id,
    /// or the full wire SKU on eBay.
    pub variant_id: String,
    /// Current effective price. `None` when the remote surface does not
    /// expose one (standalone eBay items); such rows are never price-diffed.
    pub price: Option<Decimal>,
    /// Current quantity, `None` when the platform is not tracking stock.
    pub inventory: Option<i64>,
}

/// Remote rows keyed by plain canonical SKU.
pub type SkuIndex = HashMap<String, RemoteVariant>;
