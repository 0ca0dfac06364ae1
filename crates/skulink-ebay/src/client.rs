//! HTTP client for the eBay Sell Inventory endpoints.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, RETRY_AFTER};
use reqwest::{Client, StatusCode, Url};

use crate::error::EbayError;
use crate::types::{
    EbayBulkPriceQuantityRequest, EbayInventoryItem, EbayInventoryItemGroup, EbayPriceQuantity,
    EbayRecord, EbayRecordsPage,
};

/// Upper bound on pages per catalog fetch. Prevents infinite loops on a
/// feed that keeps reporting full pages.
const MAX_PAGES: u32 = 200;

/// Client for one seller account.
///
/// Authenticates with an OAuth bearer token. Rate limits (429), not-found
/// (404) and other non-2xx responses surface as typed errors; remote
/// failures propagate to the caller without retry.
pub struct EbayClient {
    client: Client,
    /// Versioned API base, e.g. `https://api.ebay.com/sell/inventory/v1/`.
    api_base: Url,
}

impl EbayClient {
    /// Creates a client for `base_url` (e.g. `https://api.ebay.com`).
    ///
    /// # Errors
    ///
    /// Returns [`EbayError::InvalidBaseUrl`] when `base_url` does not parse,
    /// and [`EbayError::Http`] when the underlying client cannot be
    /// constructed.
    pub fn new(
        base_url: &str,
        bearer_token: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, EbayError> {
        let base = Url::parse(base_url).map_err(|e| EbayError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        let api_base = base
            .join("/sell/inventory/v1/")
            .map_err(|e| EbayError::InvalidBaseUrl {
                base_url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        let mut headers = HeaderMap::new();
        let mut token = HeaderValue::from_str(&format!("Bearer {bearer_token}")).map_err(|_| {
            EbayError::InvalidBaseUrl {
                base_url: base_url.to_string(),
                reason: "bearer token contains invalid header characters".to_string(),
            }
        })?;
        token.set_sensitive(true);
        headers.insert(AUTHORIZATION, token);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, api_base })
    }

    /// Fetches one page of the mixed item/group feed.
    ///
    /// # Errors
    ///
    /// - [`EbayError::RateLimited`] — HTTP 429.
    /// - [`EbayError::NotFound`] — HTTP 404.
    /// - [`EbayError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`EbayError::Http`] — network or TLS failure.
    /// - [`EbayError::Deserialize`] — response body is not valid JSON.
    pub async fn fetch_records_page(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<EbayRecordsPage, EbayError> {
        let mut url = self.endpoint("inventory_record")?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());

        let response = self.client.get(url.clone()).send().await?;
        let response = self.check_status(response, url.as_str()).await?;
        self.decode(response, "inventory records page").await
    }

    /// Fetches the whole catalog feed. All-or-nothing: any page failure
    /// fails the fetch.
    ///
    /// # Errors
    ///
    /// Propagates the page errors of [`Self::fetch_records_page`], plus
    /// [`EbayError::PaginationLimit`] after [`MAX_PAGES`] pages.
    pub async fn fetch_all_records(&self, page_size: u32) -> Result<Vec<EbayRecord>, EbayError> {
        let mut all = Vec::new();
        let mut offset = 0u32;

        for _ in 0..MAX_PAGES {
            let page = self.fetch_records_page(page_size, offset).await?;
            let fetched = page.records.len();
            all.extend(page.records);
            tracing::debug!(offset, fetched, total = all.len(), "fetched inventory page");

            if fetched < page_size as usize {
                return Ok(all);
            }
            offset += page_size;
        }

        Err(EbayError::PaginationLimit {
            max_pages: MAX_PAGES,
        })
    }

    /// Fetches one inventory-item group by its key.
    ///
    /// # Errors
    ///
    /// Same error surface as [`Self::fetch_records_page`]; an unknown key
    /// maps to [`EbayError::NotFound`].
    pub async fn get_item_group(&self, key: &str) -> Result<EbayInventoryItemGroup, EbayError> {
        let url = self.keyed_endpoint("inventory_item_group", key)?;
        let response = self.client.get(url.clone()).send().await?;
        let response = self.check_status(response, url.as_str()).await?;
        self.decode(response, "inventory item group").await
    }

    /// Creates or replaces one inventory item, keyed by its wire SKU.
    ///
    /// # Errors
    ///
    /// Same error surface as [`Self::fetch_records_page`].
    pub async fn put_inventory_item(
        &self,
        sku: &str,
        item: &EbayInventoryItem,
    ) -> Result<(), EbayError> {
        let url = self.keyed_endpoint("inventory_item", sku)?;
        let response = self.client.put(url.clone()).json(item).send().await?;
        self.check_status(response, url.as_str()).await?;
        Ok(())
    }

    /// Creates or replaces one inventory-item group.
    ///
    /// # Errors
    ///
    /// Same error surface as [`Self::fetch_records_page`].
    pub async fn put_item_group(
        &self,
        key: &str,
        group: &EbayInventoryItemGroup,
    ) -> Result<(), EbayError> {
        let url = self.keyed_endpoint("inventory_item_group", key)?;
        let response = self.client.put(url.clone()).json(group).send().await?;
        self.check_status(response, url.as_str()).await?;
        Ok(())
    }

    /// Applies SKU-keyed price and quantity changes in one bulk call.
    ///
    /// # Errors
    ///
    /// Same error surface as [`Self::fetch_records_page`].
    pub async fn bulk_update_price_quantity(
        &self,
        requests: Vec<EbayPriceQuantity>,
    ) -> Result<(), EbayError> {
        let url = self.endpoint("bulk_update_price_quantity")?;
        let body = EbayBulkPriceQuantityRequest { requests };
        let response = self.client.post(url.clone()).json(&body).send().await?;
        self.check_status(response, url.as_str()).await?;
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url, EbayError> {
        self.api_base.join(path).map_err(|e| EbayError::InvalidBaseUrl {
            base_url: self.api_base.to_string(),
            reason: format!("cannot build endpoint {path}: {e}"),
        })
    }

    /// Builds `{resource}/{key}` with the key percent-encoded as one path
    /// segment, so SKUs carrying embedded JSON stay intact.
    fn keyed_endpoint(&self, resource: &str, key: &str) -> Result<Url, EbayError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| EbayError::InvalidBaseUrl {
                base_url: self.api_base.to_string(),
                reason: "cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .push(resource)
            .push(key);
        Ok(url)
    }

    async fn check_status(
        &self,
        response: reqwest::Response,
        url: &str,
    ) -> Result<reqwest::Response, EbayError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(EbayError::RateLimited { retry_after_secs });
        }

        if status == StatusCode::NOT_FOUND {
            return Err(EbayError::NotFound {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EbayError::UnexpectedStatus {
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
    ) -> Result<T, EbayError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| EbayError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}
