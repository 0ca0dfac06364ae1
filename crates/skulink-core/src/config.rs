use thiserror::Error;

use crate::app_config::{AppConfig, EbayCredentials, ShopifyCredentials, WooCredentials};

/// Default eBay API host; override with `SKULINK_EBAY_BASE_URL` for sandbox
/// environments.
const DEFAULT_EBAY_BASE_URL: &str = "https://api.ebay.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("incomplete {platform} credentials: {missing} is not set")]
    IncompleteCredentials {
        platform: &'static str,
        missing: &'static str,
    },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid or a platform credential block
/// is only partially set.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid or a platform credential block
/// is only partially set.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup — no
/// `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let optional = |var: &str| -> Option<String> { lookup(var).ok() };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("SKULINK_LOG_LEVEL", "info");
    let http_timeout_secs = parse_u64("SKULINK_HTTP_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SKULINK_USER_AGENT", "skulink/0.1 (catalog-sync)");
    let fetch_page_size = parse_u32("SKULINK_FETCH_PAGE_SIZE", "100")?;
    let max_concurrent_products = parse_usize("SKULINK_MAX_CONCURRENT_PRODUCTS", "4")?;

    let shopify = match (
        optional("SKULINK_SHOPIFY_SHOP_URL"),
        optional("SKULINK_SHOPIFY_ACCESS_TOKEN"),
    ) {
        (Some(shop_url), Some(access_token)) => Some(ShopifyCredentials {
            shop_url,
            access_token,
        }),
        (None, None) => None,
        (Some(_), None) => {
            return Err(ConfigError::IncompleteCredentials {
                platform: "shopify",
                missing: "SKULINK_SHOPIFY_ACCESS_TOKEN",
            })
        }
        (None, Some(_)) => {
            return Err(ConfigError::IncompleteCredentials {
                platform: "shopify",
                missing: "SKULINK_SHOPIFY_SHOP_URL",
            })
        }
    };

    let woo = match (
        optional("SKULINK_WOO_BASE_URL"),
        optional("SKULINK_WOO_CONSUMER_KEY"),
        optional("SKULINK_WOO_CONSUMER_SECRET"),
    ) {
        (Some(base_url), Some(consumer_key), Some(consumer_secret)) => Some(WooCredentials {
            base_url,
            consumer_key,
            consumer_secret,
        }),
        (None, None, None) => None,
        (None, _, _) => {
            return Err(ConfigError::IncompleteCredentials {
                platform: "woo",
                missing: "SKULINK_WOO_BASE_URL",
            })
        }
        (_, None, _) => {
            return Err(ConfigError::IncompleteCredentials {
                platform: "woo",
                missing: "SKULINK_WOO_CONSUMER_KEY",
            })
        }
        (_, _, None) => {
            return Err(ConfigError::IncompleteCredentials {
                platform: "woo",
                missing: "SKULINK_WOO_CONSUMER_SECRET",
            })
        }
    };

    // The eBay base URL has a production default, so the bearer token alone
    // decides whether the block exists.
    let ebay = match optional("SKULINK_EBAY_BEARER_TOKEN") {
        Some(bearer_token) => Some(EbayCredentials {
            base_url: or_default("SKULINK_EBAY_BASE_URL", DEFAULT_EBAY_BASE_URL),
            bearer_token,
        }),
        None => {
            if optional("SKULINK_EBAY_BASE_URL").is_some() {
                return Err(ConfigError::IncompleteCredentials {
                    platform: "ebay",
                    missing: "SKULINK_EBAY_BEARER_TOKEN",
                });
            }
            None
        }
    };

    Ok(AppConfig {
        log_level,
        http_timeout_secs,
        user_agent,
        fetch_page_size,
        max_concurrent_products,
        shopify,
        woo,
        ebay,
    })
}
