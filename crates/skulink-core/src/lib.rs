//! Canonical product model and the adapter contract shared by every
//! platform integration.

pub mod adapter;
pub mod app_config;
pub mod config;
pub mod meta;
pub mod product;

pub use adapter::{AdapterError, Conversion, PlatformAdapter};
pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use meta::{EbayMeta, Platform, PlatformMeta, ShopifyMeta, WooMeta};
pub use product::{
    CanonicalImage, CanonicalProduct, CanonicalProductOption, CanonicalVariant, VariantAttribute,
};
