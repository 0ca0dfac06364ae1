use skulink_core::AdapterError;
use thiserror::Error;

/// Errors from the WooCommerce client and adapter.
#[derive(Debug, Error)]
pub enum WooError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to deserialize WooCommerce response for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {store}, retry after {retry_after_secs}s")]
    RateLimited {
        store: String,
        retry_after_secs: u64,
    },

    #[error("resource not found: {url}")]
    NotFound { url: String },

    #[error("unexpected status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("pagination exceeded {max_pages} pages for {store}")]
    PaginationLimit { store: String, max_pages: u32 },

    #[error("invalid store URL `{base_url}`: {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error(transparent)]
    Adapter(#[from] AdapterError),
}
