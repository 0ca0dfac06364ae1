//! Channel construction from configured credentials.
//!
//! Each platform's credential block is optional in [`AppConfig`]; commands
//! fail with an actionable message naming the missing environment variables
//! when the block they need is absent.

use anyhow::bail;
use clap::ValueEnum;
use skulink_core::{AppConfig, Platform};
use skulink_sync::{CatalogSource, CatalogTarget, EbayChannel, ShopifyChannel, WooChannel};

/// Platform selector shared by every subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum PlatformArg {
    Shopify,
    Woo,
    Ebay,
}

impl PlatformArg {
    pub(crate) fn platform(self) -> Platform {
        match self {
            Self::Shopify => Platform::Shopify,
            Self::Woo => Platform::Woo,
            Self::Ebay => Platform::Ebay,
        }
    }
}

/// Builds the pull side for `platform`.
pub(crate) fn build_source(
    config: &AppConfig,
    platform: PlatformArg,
) -> anyhow::Result<Box<dyn CatalogSource>> {
    Ok(match platform {
        PlatformArg::Shopify => Box::new(shopify_channel(config)?),
        PlatformArg::Woo => Box::new(woo_channel(config)?),
        PlatformArg::Ebay => Box::new(ebay_channel(config)?),
    })
}

/// Builds the push side for `platform`. Same construction as
/// [`build_source`]; the two ends of a sync get separate clients.
pub(crate) fn build_target(
    config: &AppConfig,
    platform: PlatformArg,
) -> anyhow::Result<Box<dyn CatalogTarget>> {
    Ok(match platform {
        PlatformArg::Shopify => Box::new(shopify_channel(config)?),
        PlatformArg::Woo => Box::new(woo_channel(config)?),
        PlatformArg::Ebay => Box::new(ebay_channel(config)?),
    })
}

fn shopify_channel(config: &AppConfig) -> anyhow::Result<ShopifyChannel> {
    let Some(creds) = config.shopify.as_ref() else {
        bail!(
            "shopify credentials are not configured; set SKULINK_SHOPIFY_SHOP_URL and SKULINK_SHOPIFY_ACCESS_TOKEN"
        );
    };
    let client = skulink_shopify::ShopifyClient::new(
        &creds.shop_url,
        &creds.access_token,
        config.http_timeout_secs,
        &config.user_agent,
    )
    .map_err(|e| anyhow::anyhow!("failed to build Shopify client: {e}"))?;
    Ok(ShopifyChannel::new(client, config.fetch_page_size))
}

fn woo_channel(config: &AppConfig) -> anyhow::Result<WooChannel> {
    let Some(creds) = config.woo.as_ref() else {
        bail!(
            "woo credentials are not configured; set SKULINK_WOO_BASE_URL, SKULINK_WOO_CONSUMER_KEY and SKULINK_WOO_CONSUMER_SECRET"
        );
    };
    let client = skulink_woo::WooClient::new(
        &creds.base_url,
        &creds.consumer_key,
        &creds.consumer_secret,
        config.http_timeout_secs,
        &config.user_agent,
    )
    .map_err(|e| anyhow::anyhow!("failed to build WooCommerce client: {e}"))?;
    Ok(WooChannel::new(client, config.fetch_page_size))
}

fn ebay_channel(config: &AppConfig) -> anyhow::Result<EbayChannel> {
    let Some(creds) = config.ebay.as_ref() else {
        bail!("ebay credentials are not configured; set SKULINK_EBAY_BEARER_TOKEN");
    };
    let client = skulink_ebay::EbayClient::new(
        &creds.base_url,
        &creds.bearer_token,
        config.http_timeout_secs,
        &config.user_agent,
    )
    .map_err(|e| anyhow::anyhow!("failed to build eBay client: {e}"))?;
    Ok(EbayChannel::new(client, config.fetch_page_size))
}
