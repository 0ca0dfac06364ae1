use thiserror::Error;

use skulink_core::AdapterError;

#[derive(Debug, Error)]
pub enum ShopifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {shop} (retry after {retry_after_secs}s)")]
    RateLimited { shop: String, retry_after_secs: u64 },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("pagination limit reached for {shop}: exceeded {max_pages} pages")]
    PaginationLimit { shop: String, max_pages: usize },

    #[error("invalid shop URL \"{shop_url}\": {reason}")]
    InvalidShopUrl { shop_url: String, reason: String },

    #[error(transparent)]
    Adapter(#[from] AdapterError),
}
