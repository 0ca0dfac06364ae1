//! WooCommerce integration: REST v3 wire types, the bidirectional adapter
//! and the HTTP client.

pub mod adapter;
pub mod client;
pub mod error;
pub mod types;

pub use adapter::{infer_inventory, WooAdapter};
pub use client::WooClient;
pub use error::WooError;
