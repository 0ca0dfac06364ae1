use skulink_core::{AdapterError, Platform};
use thiserror::Error;

/// Errors the reconciler can produce.
///
/// Remote transport and decode failures from the platform clients pass
/// through transparently; the variants declared here are the reconciler's
/// own failure modes. All of them are scoped to a single product: the engine
/// records them per product and keeps going.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Variants matched remote SKUs, but none of the matches carried a
    /// parent id the update could be applied under.
    #[error("no usable remote parent id for product `{title}`")]
    UnresolvableParent { title: String },

    /// A product with no variants has nothing to match or push.
    #[error("product `{title}` has no variants")]
    NoVariants { title: String },

    /// A remote id that must be numeric for the platform's endpoints was not.
    #[error("remote {platform} id `{id}` is not numeric")]
    InvalidRemoteId { platform: Platform, id: String },

    /// A create call succeeded but the stored record came back without an id.
    #[error("created {platform} record for `{title}` has no id")]
    MissingRemoteId { platform: Platform, title: String },

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error(transparent)]
    Shopify(#[from] skulink_shopify::ShopifyError),

    #[error(transparent)]
    Woo(#[from] skulink_woo::WooError),

    #[error(transparent)]
    Ebay(#[from] skulink_ebay::EbayError),
}
