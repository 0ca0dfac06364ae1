//! HTTP client for the WooCommerce REST v3 product endpoints.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::error::WooError;
use crate::types::{
    WooProduct, WooProductPatch, WooProductType, WooVariation, WooVariationBatch,
    WooVariationBatchResponse,
};

/// Upper bound on pages per catalog fetch. Prevents infinite loops on a
/// store that keeps reporting full pages.
const MAX_PAGES: u32 = 200;

/// Page size used when hydrating the variations of one parent.
const VARIATIONS_PAGE_SIZE: u32 = 100;

/// SKUs per lookup request; the filter value is a comma-joined list and
/// store front ends cap the query string length.
const SKU_LOOKUP_CHUNK: usize = 40;

/// Client for one store's REST API.
///
/// Authenticates every request with the consumer key/secret pair over basic
/// auth. Rate limits (429), not-found (404) and other non-2xx responses
/// surface as typed errors; remote failures propagate to the caller without
/// retry.
pub struct WooClient {
    client: Client,
    /// Versioned API base, e.g. `https://store.example.com/wp-json/wc/v3/`.
    api_base: Url,
    consumer_key: String,
    consumer_secret: String,
    /// Host name used in error and log messages.
    store: String,
}

impl WooClient {
    /// Creates a client for `base_url` (e.g. `https://store.example.com`).
    ///
    /// # Errors
    ///
    /// Returns [`WooError::InvalidBaseUrl`] when `base_url` does not parse,
    /// and [`WooError::Http`] when the underlying client cannot be
    /// constructed.
    pub fn new(
        base_url: &str,
        consumer_key: &str,
        consumer_secret: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, WooError> {
        let base = Url::parse(base_url).map_err(|e| WooError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        let api_base = base
            .join("/wp-json/wc/v3/")
            .map_err(|e| WooError::InvalidBaseUrl {
                base_url: base_url.to_string(),
                reason: e.to_string(),
            })?;
        let store = base.host_str().unwrap_or(base_url).to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            api_base,
            consumer_key: consumer_key.to_string(),
            consumer_secret: consumer_secret.to_string(),
            store,
        })
    }

    /// Fetches one page of products. Pages are 1-based.
    ///
    /// # Errors
    ///
    /// - [`WooError::RateLimited`] — HTTP 429.
    /// - [`WooError::NotFound`] — HTTP 404.
    /// - [`WooError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`WooError::Http`] — network or TLS failure.
    /// - [`WooError::Deserialize`] — response body is not valid JSON.
    pub async fn fetch_products_page(
        &self,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<WooProduct>, WooError> {
        let mut url = self.endpoint("products")?;
        url.query_pairs_mut()
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.to_string());

        let response = self.authed(self.client.get(url.clone())).send().await?;
        let response = self.check_status(response, url.as_str()).await?;
        self.decode(response, "products page").await
    }

    /// Fetches the whole catalog and hydrates the variations of every
    /// variable parent, so each returned record is self-contained.
    /// All-or-nothing: any page failure fails the fetch.
    ///
    /// # Errors
    ///
    /// Propagates the page errors of [`Self::fetch_products_page`], plus
    /// [`WooError::PaginationLimit`] after [`MAX_PAGES`] pages.
    pub async fn fetch_all_products(&self, page_size: u32) -> Result<Vec<WooProduct>, WooError> {
        let mut all = Vec::new();

        let mut complete = false;
        for page in 1..=MAX_PAGES {
            let mut batch = self.fetch_products_page(page_size, page).await?;
            let fetched = batch.len();
            all.append(&mut batch);
            tracing::debug!(store = %self.store, page, fetched, total = all.len(), "fetched products page");

            if fetched < page_size as usize {
                complete = true;
                break;
            }
        }
        if !complete {
            return Err(WooError::PaginationLimit {
                store: self.store.clone(),
                max_pages: MAX_PAGES,
            });
        }

        for product in &mut all {
            if product.product_type != WooProductType::Variable {
                continue;
            }
            let Some(parent_id) = product.id else {
                continue;
            };
            if product.variation_ids.is_empty() {
                continue;
            }
            product.variation_records = self.fetch_variations(parent_id).await?;
        }

        Ok(all)
    }

    /// Fetches all variations of one variable product.
    ///
    /// # Errors
    ///
    /// Same error surface as [`Self::fetch_products_page`].
    pub async fn fetch_variations(&self, product_id: i64) -> Result<Vec<WooVariation>, WooError> {
        let mut all = Vec::new();

        for page in 1..=MAX_PAGES {
            let mut url = self.endpoint(&format!("products/{product_id}/variations"))?;
            url.query_pairs_mut()
                .append_pair("per_page", &VARIATIONS_PAGE_SIZE.to_string())
                .append_pair("page", &page.to_string());

            let response = self.authed(self.client.get(url.clone())).send().await?;
            let response = self.check_status(response, url.as_str()).await?;
            let mut batch: Vec<WooVariation> = self
                .decode(response, &format!("variations of product {product_id}"))
                .await?;
            let fetched = batch.len();
            all.append(&mut batch);

            if fetched < VARIATIONS_PAGE_SIZE as usize {
                return Ok(all);
            }
        }

        Err(WooError::PaginationLimit {
            store: self.store.clone(),
            max_pages: MAX_PAGES,
        })
    }

    /// Looks up products by SKU. Matches come back as `simple` rows or as
    /// `variation` rows carrying their `parent_id`; SKUs without a match are
    /// simply absent. Requests are chunked, so one call may issue several
    /// requests.
    ///
    /// # Errors
    ///
    /// Same error surface as [`Self::fetch_products_page`].
    pub async fn lookup_by_skus(&self, skus: &[String]) -> Result<Vec<WooProduct>, WooError> {
        let mut matches = Vec::new();

        for chunk in skus.chunks(SKU_LOOKUP_CHUNK) {
            let mut url = self.endpoint("products")?;
            url.query_pairs_mut()
                .append_pair("sku", &chunk.join(","))
                .append_pair("per_page", &SKU_LOOKUP_CHUNK.to_string());

            let response = self.authed(self.client.get(url.clone())).send().await?;
            let response = self.check_status(response, url.as_str()).await?;
            let mut batch: Vec<WooProduct> = self.decode(response, "sku lookup").await?;
            matches.append(&mut batch);
        }

        tracing::debug!(store = %self.store, requested = skus.len(), matched = matches.len(), "sku lookup complete");
        Ok(matches)
    }

    /// Fetches a single product by ID. Variation records are not hydrated.
    ///
    /// # Errors
    ///
    /// Same error surface as [`Self::fetch_products_page`]; a missing ID
    /// surfaces as [`WooError::NotFound`].
    pub async fn get_product(&self, product_id: i64) -> Result<WooProduct, WooError> {
        let url = self.endpoint(&format!("products/{product_id}"))?;
        let response = self.authed(self.client.get(url.clone())).send().await?;
        let response = self.check_status(response, url.as_str()).await?;
        self.decode(response, "product response").await
    }

    /// Creates a product and returns the record as the store persisted it.
    /// Variations are never inlined; create them against the returned ID
    /// with [`Self::batch_variations`].
    ///
    /// # Errors
    ///
    /// Same error surface as [`Self::fetch_products_page`].
    pub async fn create_product(&self, product: &WooProduct) -> Result<WooProduct, WooError> {
        let url = self.endpoint("products")?;
        let response = self
            .authed(self.client.post(url.clone()).json(product))
            .send()
            .await?;
        let response = self.check_status(response, url.as_str()).await?;
        self.decode(response, "create product response").await
    }

    /// Applies a minimal field patch to one product.
    ///
    /// # Errors
    ///
    /// Same error surface as [`Self::fetch_products_page`].
    pub async fn update_product(
        &self,
        product_id: i64,
        patch: &WooProductPatch,
    ) -> Result<(), WooError> {
        let url = self.endpoint(&format!("products/{product_id}"))?;
        let response = self
            .authed(self.client.put(url.clone()).json(patch))
            .send()
            .await?;
        self.check_status(response, url.as_str()).await?;
        Ok(())
    }

    /// Creates and updates variations of one parent in a single round trip.
    ///
    /// # Errors
    ///
    /// Same error surface as [`Self::fetch_products_page`].
    pub async fn batch_variations(
        &self,
        product_id: i64,
        batch: &WooVariationBatch,
    ) -> Result<WooVariationBatchResponse, WooError> {
        let url = self.endpoint(&format!("products/{product_id}/variations/batch"))?;
        let response = self
            .authed(self.client.post(url.clone()).json(batch))
            .send()
            .await?;
        let response = self.check_status(response, url.as_str()).await?;
        self.decode(response, "variation batch response").await
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.basic_auth(&self.consumer_key, Some(&self.consumer_secret))
    }

    fn endpoint(&self, path: &str) -> Result<Url, WooError> {
        self.api_base.join(path).map_err(|e| WooError::InvalidBaseUrl {
            base_url: self.api_base.to_string(),
            reason: format!("cannot build endpoint {path}: {e}"),
        })
    }

    async fn check_status(
        &self,
        response: reqwest::Response,
        url: &str,
    ) -> Result<reqwest::Response, WooError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(WooError::RateLimited {
                store: self.store.clone(),
                retry_after_secs,
            });
        }

        if status == StatusCode::NOT_FOUND {
            return Err(WooError::NotFound {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WooError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        Ok(response)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
        context: &str,
    ) -> Result<T, WooError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| WooError::Deserialize {
            context: format!("{context} from {}", self.store),
            source: e,
        })
    }
}
