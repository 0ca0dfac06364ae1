use skulink_core::AdapterError;
use thiserror::Error;

/// Errors from the eBay client and adapter.
#[derive(Debug, Error)]
pub enum EbayError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to deserialize eBay response for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("resource not found: {url}")]
    NotFound { url: String },

    #[error("unexpected status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("pagination exceeded {max_pages} pages")]
    PaginationLimit { max_pages: u32 },

    #[error("invalid API base URL `{base_url}`: {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error(transparent)]
    Adapter(#[from] AdapterError),
}
