//! Platform channels: each owns one client plus one adapter and implements
//! both sync contracts, [`crate::target::CatalogSource`] and
//! [`crate::target::CatalogTarget`].

mod ebay;
mod shopify;
mod woo;

pub use self::ebay::EbayChannel;
pub use self::shopify::ShopifyChannel;
pub use self::woo::WooChannel;

use skulink_core::Platform;

use crate::error::SyncError;

/// Parses a remote id that must be numeric for the platform's endpoints.
fn parse_remote_id(platform: Platform, id: &str) -> Result<i64, SyncError> {
    id.parse().map_err(|_| SyncError::InvalidRemoteId {
        platform,
        id: id.to_string(),
    })
}
