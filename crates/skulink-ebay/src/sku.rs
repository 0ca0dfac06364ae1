//! SKU-embedded identity codec.
//!
//! eBay inventory records have no generic metadata store, so canonical
//! identity rides inside the SKU itself: `<sku>::meta=<json>`. The JSON
//! document carries the variant's canonical ID, its title and its meta map.
//! Consumers split on the first occurrence of the separator; a malformed
//! JSON tail degrades to no payload and keeps the plain SKU.

use serde::{Deserialize, Serialize};

use skulink_core::adapter::AdapterError;
use skulink_core::meta::PlatformMeta;

/// Separator between the plain SKU and the embedded JSON document.
pub const META_SEPARATOR: &str = "::meta=";

/// The document embedded after [`META_SEPARATOR`].
///
/// `canonical_id` stays a plain string here: the codec round-trips whatever
/// was embedded, well-formed UUID or not, and leaves interpretation to the
/// adapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkuPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "PlatformMeta::is_empty")]
    pub meta: PlatformMeta,
}

/// Builds the wire SKU for `sku` with `payload` appended.
///
/// # Errors
///
/// Returns [`AdapterError::MetaEncode`] if the payload cannot be serialized.
pub fn encode_sku(sku: &str, payload: &SkuPayload) -> Result<String, AdapterError> {
    let json = serde_json::to_string(payload).map_err(|source| AdapterError::MetaEncode {
        context: format!("sku payload for `{sku}`"),
        source,
    })?;
    Ok(format!("{sku}{META_SEPARATOR}{json}"))
}

/// Splits a wire SKU into the plain SKU and its embedded payload.
///
/// No separator means no payload. A tail that fails to parse as JSON is
/// dropped with a warning; the plain SKU is still recovered.
#[must_use]
pub fn decode_sku(wire_sku: &str) -> (String, Option<SkuPayload>) {
    let Some((plain, encoded)) = wire_sku.split_once(META_SEPARATOR) else {
        return (wire_sku.to_string(), None);
    };
    match serde_json::from_str(encoded) {
        Ok(payload) => (plain.to_string(), Some(payload)),
        Err(error) => {
            tracing::warn!(
                sku = plain,
                %error,
                "malformed sku metadata, treating as absent"
            );
            (plain.to_string(), None)
        }
    }
}
