//! HTTP client for the Shopify Admin REST product endpoints.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, LINK, RETRY_AFTER};
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;

use crate::error::ShopifyError;
use crate::pagination::next_page_cursor;
use crate::types::{
    ShopifyProduct, ShopifyProductEnvelope, ShopifyProductsResponse, ShopifyVariant,
    ShopifyVariantEnvelope, ShopifyVariantPatch, ShopifyVariantPatchEnvelope,
};

/// Admin API version pinned for every request path.
const API_VERSION: &str = "2024-07";

/// Upper bound on pages per catalog fetch. Prevents infinite loops on
/// cycling cursors.
const MAX_PAGES: usize = 200;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

#[derive(Serialize)]
struct ProductPayload<'a> {
    product: &'a ShopifyProduct,
}

#[derive(Serialize)]
struct VariantPayload<'a> {
    variant: &'a ShopifyVariant,
}

/// Client for one shop's Admin API.
///
/// Authenticates with a private-app access token. Rate limits (429),
/// not-found (404) and other non-2xx responses surface as typed errors;
/// remote failures propagate to the caller without retry.
pub struct ShopifyClient {
    client: Client,
    /// Versioned API base, e.g. `https://acme.myshopify.com/admin/api/2024-07/`.
    api_base: Url,
    /// Host name used in error and log messages.
    shop: String,
}

impl ShopifyClient {
    /// Creates a client for `shop_url` (e.g. `https://acme.myshopify.com`).
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::InvalidShopUrl`] when `shop_url` does not
    /// parse, and [`ShopifyError::Http`] when the underlying client cannot
    /// be constructed.
    pub fn new(
        shop_url: &str,
        access_token: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ShopifyError> {
        let base = Url::parse(shop_url).map_err(|e| ShopifyError::InvalidShopUrl {
            shop_url: shop_url.to_string(),
            reason: e.to_string(),
        })?;
        let api_base = base
            .join(&format!("/admin/api/{API_VERSION}/"))
            .map_err(|e| ShopifyError::InvalidShopUrl {
                shop_url: shop_url.to_string(),
                reason: e.to_string(),
            })?;
        let shop = base.host_str().unwrap_or(shop_url).to_string();

        let mut headers = HeaderMap::new();
        let mut token = HeaderValue::from_str(access_token).map_err(|_| {
            ShopifyError::InvalidShopUrl {
                shop_url: shop_url.to_string(),
                reason: "access token contains invalid header characters".to_string(),
            }
        })?;
        token.set_sensitive(true);
        headers.insert(ACCESS_TOKEN_HEADER, token);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_base,
            shop,
        })
    }

    /// Fetches one page of products, returning the page and the cursor for
    /// the next one (when a next page exists).
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::RateLimited`] — HTTP 429.
    /// - [`ShopifyError::NotFound`] — HTTP 404.
    /// - [`ShopifyError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`ShopifyError::Http`] — network or TLS failure.
    /// - [`ShopifyError::Deserialize`] — response body is not valid JSON.
    pub async fn fetch_products_page(
        &self,
        limit: u32,
        page_info: Option<&str>,
    ) -> Result<(Vec<ShopifyProduct>, Option<String>), ShopifyError> {
        let mut url = self.endpoint("products.json")?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        if let Some(cursor) = page_info {
            url.query_pairs_mut().append_pair("page_info", cursor);
        }

        let response = self.client.get(url.clone()).send().await?;
        let response = self.check_status(response, url.as_str()).await?;

        // Capture the Link header before consuming the body.
        let link_header = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let body = response.text().await?;
        let parsed = serde_json::from_str::<ShopifyProductsResponse>(&body).map_err(|e| {
            ShopifyError::Deserialize {
                context: format!("products page from {}", self.shop),
                source: e,
            }
        })?;

        Ok((parsed.products, next_page_cursor(link_header.as_deref())))
    }

    /// Fetches the whole catalog by following pagination cursors.
    /// All-or-nothing: any page failure fails the fetch.
    ///
    /// # Errors
    ///
    /// Propagates the page errors of [`Self::fetch_products_page`], plus
    /// [`ShopifyError::PaginationLimit`] after [`MAX_PAGES`] pages.
    pub async fn fetch_all_products(
        &self,
        page_size: u32,
    ) -> Result<Vec<ShopifyProduct>, ShopifyError> {
        let mut all = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let (mut page, next) = self.fetch_products_page(page_size, cursor.as_deref()).await?;
            let fetched = page.len();
            all.append(&mut page);
            tracing::debug!(shop = %self.shop, fetched, total = all.len(), "fetched products page");

            match next {
                Some(c) => cursor = Some(c),
                None => return Ok(all),
            }
        }

        Err(ShopifyError::PaginationLimit {
            shop: self.shop.clone(),
            max_pages: MAX_PAGES,
        })
    }

    /// Creates a product (with its variants and metafields) and returns the
    /// record as the platform stored it.
    ///
    /// # Errors
    ///
    /// Same error surface as [`Self::fetch_products_page`].
    pub async fn create_product(
        &self,
        product: &ShopifyProduct,
    ) -> Result<ShopifyProduct, ShopifyError> {
        let url = self.endpoint("products.json")?;
        let response = self
            .client
            .post(url.clone())
            .json(&ProductPayload { product })
            .send()
            .await?;
        let response = self.check_status(response, url.as_str()).await?;
        let envelope: ShopifyProductEnvelope =
            self.decode(response, "create product response").await?;
        Ok(envelope.product)
    }

    /// Adds a variant to an existing product.
    ///
    /// # Errors
    ///
    /// Same error surface as [`Self::fetch_products_page`].
    pub async fn create_variant(
        &self,
        product_id: i64,
        variant: &ShopifyVariant,
    ) -> Result<ShopifyVariant, ShopifyError> {
        let url = self.endpoint(&format!("products/{product_id}/variants.json"))?;
        let response = self
            .client
            .post(url.clone())
            .json(&VariantPayload { variant })
            .send()
            .await?;
        let response = self.check_status(response, url.as_str()).await?;
        let envelope: ShopifyVariantEnvelope =
            self.decode(response, "create variant response").await?;
        Ok(envelope.variant)
    }

    /// Applies a minimal field patch to one variant.
    ///
    /// # Errors
    ///
    /// Same error surface as [`Self::fetch_products_page`].
    pub async fn update_variant(&self, patch: ShopifyVariantPatch) -> Result<(), ShopifyError> {
        let url = self.endpoint(&format!("variants/{}.json", patch.id))?;
        let response = self
            .client
            .put(url.clone())
            .json(&ShopifyVariantPatchEnvelope { variant: patch })
            .send()
            .await?;
        self.check_status(response, url.as_str()).await?;
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url, ShopifyError> {
        self.api_base
            .join(path)
            .map_err(|e| ShopifyError::InvalidShopUrl {
                shop_url: self.api_base.to_string(),
                reason: format!("cannot build endpoint {path}: {e}"),
            })
    }

    async fn check_status(
        &self,
        response: reqwest::Response,
        url: &str,
    ) -> Result<reqwest::Response, ShopifyError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(ShopifyError::RateLimited {
                shop: self.shop.clone(),
                retry_after_secs,
            });
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ShopifyError::NotFound {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ShopifyError::UnexpectedStatus {
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
    ) -> Result<T, ShopifyError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ShopifyError::Deserialize {
            context: format!("{context} from {}", self.shop),
            source: e,
        })
    }
}
