//! Shopify integration: Admin REST wire types, the bidirectional adapter and
//! the HTTP client.

pub mod adapter;
pub mod client;
pub mod error;
pub mod pagination;
pub mod types;

pub use adapter::ShopifyAdapter;
pub use client::ShopifyClient;
pub use error::ShopifyError;
