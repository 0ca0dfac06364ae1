/// Shopify Admin API credentials.
#[derive(Clone)]
pub struct ShopifyCredentials {
    /// Shop base URL, e.g. `https://acme.myshopify.com`.
    pub shop_url: String,
    pub access_token: String,
}

impl std::fmt::Debug for ShopifyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyCredentials")
            .field("shop_url", &self.shop_url)
            .field("access_token", &"[redacted]")
            .finish()
    }
}

/// WooCommerce REST API credentials.
#[derive(Clone)]
pub struct WooCredentials {
    /// Store base URL, e.g. `https://shop.example.com`.
    pub base_url: String,
    pub consumer_key: String,
    pub consumer_secret: String,
}

impl std::fmt::Debug for WooCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WooCredentials")
            .field("base_url", &self.base_url)
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[redacted]")
            .finish()
    }
}

/// eBay Inventory API credentials.
#[derive(Clone)]
pub struct EbayCredentials {
    pub base_url: String,
    pub bearer_token: String,
}

impl std::fmt::Debug for EbayCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EbayCredentials")
            .field("base_url", &self.base_url)
            .field("bearer_token", &"[redacted]")
            .finish()
    }
}

/// Process-wide configuration, loaded from environment variables.
///
/// Platform credential blocks are optional; a platform with no block simply
/// cannot be used as a source or target in this process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    /// Page size for full-catalog fetches.
    pub fetch_page_size: u32,
    /// Bound on concurrently dispatched per-product writes during a sync.
    pub max_concurrent_products: usize,
    pub shopify: Option<ShopifyCredentials>,
    pub woo: Option<WooCredentials>,
    pub ebay: Option<EbayCredentials>,
}
