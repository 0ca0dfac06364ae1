//! Bidirectional mapping between eBay inventory records and the canonical
//! model.
//!
//! A one-variant product renders as a standalone inventory item, anything
//! else as an inventory-item group with one offer per variant. Canonical
//! identity rides inside the SKU string (see [`crate::sku`]); there is no
//! other metadata carrier on this platform, so product-level meta survives
//! only through the group key.
//!
//! Standalone items carry no price on the wire. Reading one yields a zero
//! price with a warning; the reconciler knows not to diff prices against
//! such records.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use skulink_core::adapter::{AdapterError, Conversion, PlatformAdapter};
use skulink_core::meta::{Platform, PlatformMeta};
use skulink_core::product::{
    CanonicalImage, CanonicalProduct, CanonicalProductOption, CanonicalVariant, VariantAttribute,
};

use crate::sku::{decode_sku, encode_sku, SkuPayload};
use crate::types::{
    EbayAvailability, EbayInventoryItem, EbayInventoryItemGroup, EbayOffer, EbayProductDetails,
    EbayRecord, EbayShipToLocationAvailability, EbaySpecification, EbayVariesBy,
};

/// Condition written on every inventory item.
const DEFAULT_CONDITION: &str = "NEW";

/// Prefix of group keys derived when no persisted key exists.
const GROUP_KEY_PREFIX: &str = "grp-";

/// Separator between attribute values in a variant title.
const TITLE_SEPARATOR: &str = " / ";

#[derive(Debug, Clone, Copy, Default)]
pub struct EbayAdapter;

impl EbayAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Builds the wire offer used when merging `variant` into an existing
    /// remote group.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::MetaEncode`] if the variant's meta map cannot
    /// be serialized.
    pub fn offer_payload(&self, variant: &CanonicalVariant) -> Result<EbayOffer, AdapterError> {
        render_offer(variant)
    }
}

impl PlatformAdapter for EbayAdapter {
    type Record = EbayRecord;

    fn platform(&self) -> Platform {
        Platform::Ebay
    }

    fn from_platform(&self, record: Self::Record) -> Result<Conversion, AdapterError> {
        match record {
            EbayRecord::Item(item) => convert_item(&item),
            EbayRecord::Group(group) => convert_group(&group),
        }
    }

    fn to_platform(&self, product: &CanonicalProduct) -> Result<Self::Record, AdapterError> {
        match product.variants.as_slice() {
            [variant] => Ok(EbayRecord::Item(render_item(product, variant)?)),
            _ => Ok(EbayRecord::Group(render_group(product)?)),
        }
    }
}

fn convert_item(item: &EbayInventoryItem) -> Result<Conversion, AdapterError> {
    let (plain_sku, payload) = decode_sku(&item.sku);
    let payload = payload.unwrap_or_default();

    let product_title = item
        .product
        .title
        .clone()
        .or_else(|| payload.title.clone())
        .unwrap_or_else(|| plain_sku.clone());
    let variant_title = payload
        .title
        .clone()
        .unwrap_or_else(|| product_title.clone());

    tracing::warn!(
        sku = %plain_sku,
        "standalone inventory item carries no price, reading as zero"
    );

    let variant = CanonicalVariant {
        canonical_id: parse_canonical_id(payload.canonical_id.as_deref(), &plain_sku),
        title: variant_title,
        price: Decimal::ZERO,
        compare_at_price: None,
        sku: plain_sku.clone(),
        inventory: item
            .availability
            .as_ref()
            .and_then(|a| a.ship_to_location_availability.as_ref())
            .and_then(|s| s.quantity),
        manage_stock: None,
        taxable: None,
        requires_shipping: None,
        attributes: single_valued_aspects(&item.product.aspects),
        image: None,
        meta: payload.meta,
    };

    Ok(Conversion::Converted(Box::new(CanonicalProduct {
        id: plain_sku,
        title: product_title,
        description: item.product.description.clone(),
        images: canonical_images(&item.product.image_urls),
        options: vec![],
        product_type: None,
        status: None,
        tags: vec![],
        variants: vec![variant],
        meta: PlatformMeta::default(),
    })))
}

fn convert_group(group: &EbayInventoryItemGroup) -> Result<Conversion, AdapterError> {
    if group.offers.is_empty() {
        return Ok(Conversion::Skipped {
            id: group.inventory_item_group_key.clone(),
            reason: "inventory item group has no offers".to_string(),
        });
    }

    let mut meta = PlatformMeta::default();
    meta.ebay_mut().group_key = Some(group.inventory_item_group_key.clone());

    let options: Vec<CanonicalProductOption> = group
        .varies_by
        .as_ref()
        .map(|varies_by| {
            varies_by
                .specifications
                .iter()
                .map(|specification| CanonicalProductOption {
                    name: specification.name.clone(),
                    values: specification.values.clone(),
                })
                .collect()
        })
        .unwrap_or_default();

    let mut variants = Vec::with_capacity(group.offers.len());
    for offer in &group.offers {
        variants.push(convert_offer(offer, &options)?);
    }

    Ok(Conversion::Converted(Box::new(CanonicalProduct {
        id: group.inventory_item_group_key.clone(),
        title: group
            .title
            .clone()
            .unwrap_or_else(|| group.inventory_item_group_key.clone()),
        description: group.description.clone(),
        images: canonical_images(&group.image_urls),
        options,
        product_type: None,
        status: None,
        tags: vec![],
        variants,
        meta,
    })))
}

fn convert_offer(
    offer: &EbayOffer,
    options: &[CanonicalProductOption],
) -> Result<CanonicalVariant, AdapterError> {
    let (plain_sku, payload) = decode_sku(&offer.sku);
    let payload = payload.unwrap_or_default();

    let price = match offer.price.as_deref() {
        Some(raw) => parse_price(raw, &plain_sku)?,
        None => {
            tracing::warn!(sku = %plain_sku, "offer carries no price, reading as zero");
            Decimal::ZERO
        }
    };

    let title = payload.title.clone().unwrap_or_else(|| plain_sku.clone());

    Ok(CanonicalVariant {
        canonical_id: parse_canonical_id(payload.canonical_id.as_deref(), &plain_sku),
        title: title.clone(),
        price,
        compare_at_price: None,
        sku: plain_sku,
        inventory: offer.available_quantity,
        manage_stock: None,
        taxable: None,
        requires_shipping: None,
        attributes: attributes_from_title(&title, options),
        image: None,
        meta: payload.meta,
    })
}

fn render_item(
    product: &CanonicalProduct,
    variant: &CanonicalVariant,
) -> Result<EbayInventoryItem, AdapterError> {
    let mut aspects = BTreeMap::new();
    for attribute in &variant.attributes {
        aspects.insert(attribute.name.clone(), vec![attribute.value.clone()]);
    }

    Ok(EbayInventoryItem {
        sku: encode_sku(&variant.sku, &variant_payload(variant))?,
        condition: Some(DEFAULT_CONDITION.to_string()),
        product: EbayProductDetails {
            title: Some(product.title.clone()),
            description: product.description.clone(),
            aspects,
            image_urls: image_urls(&product.images),
        },
        availability: variant.inventory.map(|quantity| EbayAvailability {
            ship_to_location_availability: Some(EbayShipToLocationAvailability {
                quantity: Some(quantity),
            }),
        }),
    })
}

fn render_group(product: &CanonicalProduct) -> Result<EbayInventoryItemGroup, AdapterError> {
    let specifications: Vec<EbaySpecification> = product
        .options
        .iter()
        .map(|option| EbaySpecification {
            name: option.name.clone(),
            values: option.values.clone(),
        })
        .collect();

    let mut offers = Vec::with_capacity(product.variants.len());
    for variant in &product.variants {
        offers.push(render_offer(variant)?);
    }

    Ok(EbayInventoryItemGroup {
        inventory_item_group_key: group_key_for(product),
        title: Some(product.title.clone()),
        description: product.description.clone(),
        image_urls: image_urls(&product.images),
        varies_by: (!specifications.is_empty()).then_some(EbayVariesBy { specifications }),
        offers,
    })
}

fn render_offer(variant: &CanonicalVariant) -> Result<EbayOffer, AdapterError> {
    Ok(EbayOffer {
        sku: encode_sku(&variant.sku, &variant_payload(variant))?,
        price: Some(variant.price.to_string()),
        available_quantity: variant.inventory,
    })
}

fn variant_payload(variant: &CanonicalVariant) -> SkuPayload {
    SkuPayload {
        canonical_id: Some(variant.canonical_id.to_string()),
        title: Some(variant.title.clone()),
        meta: variant.meta.clone(),
    }
}

/// A persisted group key wins; otherwise the key derives from the first
/// variant's canonical ID, which keeps re-renders of the same product on
/// the same remote group.
fn group_key_for(product: &CanonicalProduct) -> String {
    if let Some(key) = product
        .meta
        .ebay
        .as_ref()
        .and_then(|ebay| ebay.group_key.clone())
    {
        return key;
    }
    let seed = product
        .variants
        .first()
        .map_or_else(|| product.id.clone(), |v| v.canonical_id.to_string());
    format!("{GROUP_KEY_PREFIX}{seed}")
}

fn parse_canonical_id(raw: Option<&str>, sku: &str) -> Uuid {
    match raw {
        None => Uuid::new_v4(),
        Some(raw) => match raw.parse() {
            Ok(id) => id,
            Err(_) => {
                tracing::warn!(
                    sku,
                    canonical_id = raw,
                    "embedded canonical id is not a UUID, minting a fresh one"
                );
                Uuid::new_v4()
            }
        },
    }
}

/// Item specifics with exactly one value read back as variant attributes;
/// multi-valued aspects describe the product, not the variant.
fn single_valued_aspects(aspects: &BTreeMap<String, Vec<String>>) -> Vec<VariantAttribute> {
    aspects
        .iter()
        .filter_map(|(name, values)| match values.as_slice() {
            [value] => Some(VariantAttribute::new(name.clone(), value.clone())),
            _ => None,
        })
        .collect()
}

/// Offers carry no per-variant specifics, but variant titles follow the
/// `value / value` convention along the group's axes. When the segment
/// count matches the axis count, attributes are rebuilt by position.
fn attributes_from_title(
    title: &str,
    options: &[CanonicalProductOption],
) -> Vec<VariantAttribute> {
    if options.is_empty() {
        return vec![];
    }
    let segments: Vec<&str> = title.split(TITLE_SEPARATOR).map(str::trim).collect();
    if segments.len() != options.len() {
        return vec![];
    }
    options
        .iter()
        .zip(segments)
        .map(|(option, value)| VariantAttribute::new(option.name.clone(), value))
        .collect()
}

fn parse_price(raw: &str, record_id: &str) -> Result<Decimal, AdapterError> {
    raw.trim().parse().map_err(|_| AdapterError::InvalidPrice {
        platform: Platform::Ebay,
        record_id: record_id.to_string(),
        value: raw.to_string(),
    })
}

fn canonical_images(image_urls: &[String]) -> Vec<CanonicalImage> {
    image_urls
        .iter()
        .enumerate()
        .map(|(index, url)| CanonicalImage {
            id: None,
            src: url.clone(),
            alt: None,
            position: i32::try_from(index + 1).ok(),
        })
        .collect()
}

fn image_urls(images: &[CanonicalImage]) -> Vec<String> {
    images.iter().map(|image| image.src.clone()).collect()
}

#[cfg(test)]
#[path = "adapter_test.rs"]
mod tests;
