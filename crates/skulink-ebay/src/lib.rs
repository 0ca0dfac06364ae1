//! eBay integration: Sell Inventory wire types, the SKU identity codec, the
//! bidirectional adapter and the HTTP client.

pub mod adapter;
pub mod client;
pub mod error;
pub mod sku;
pub mod types;

pub use adapter::EbayAdapter;
pub use client::EbayClient;
pub use error::EbayError;
pub use sku::{decode_sku, encode_sku, SkuPayload, META_SEPARATOR};
