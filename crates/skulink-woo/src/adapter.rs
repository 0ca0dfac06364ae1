//! Bidirectional mapping between WooCommerce product records and the
//! canonical model.
//!
//! Canonical identity persists in `meta_data` entries: products carry their
//! whole meta map under `_canonicalMeta`, variant identity lives under
//! `_canonicalId` and `_canonicalVariantMeta` (on the product itself for
//! simple products, on each variation otherwise). A malformed carrier value
//! degrades to an empty meta map with a warning; it never fails the
//! conversion.
//!
//! Writes pick between the simple and variable shapes. A single-variant
//! product renders simple unless its meta says it already lives as a
//! variable product remotely; once variable, always variable, so a product
//! that temporarily drops to one variant does not flip shape on every pass.

use rust_decimal::Decimal;
use uuid::Uuid;

use skulink_core::adapter::{AdapterError, Conversion, PlatformAdapter};
use skulink_core::meta::{Platform, PlatformMeta};
use skulink_core::product::{
    CanonicalImage, CanonicalProduct, CanonicalProductOption, CanonicalVariant, VariantAttribute,
};

use crate::types::{
    WooCategory, WooImage, WooMetaData, WooProduct, WooProductAttribute, WooProductType, WooTag,
    WooVariation, WooVariationAttribute,
};

/// Product-level key holding the serialized meta map.
pub const CANONICAL_META_KEY: &str = "_canonicalMeta";
/// Key holding the canonical variant ID.
pub const CANONICAL_ID_KEY: &str = "_canonicalId";
/// Key holding the serialized variant meta map.
pub const CANONICAL_VARIANT_META_KEY: &str = "_canonicalVariantMeta";

#[derive(Debug, Clone, Copy, Default)]
pub struct WooAdapter;

impl WooAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Builds the wire variation used when appending `variant` to an
    /// existing variable product.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::MetaEncode`] if the variant's meta map cannot
    /// be serialized.
    pub fn variation_payload(
        &self,
        variant: &CanonicalVariant,
    ) -> Result<WooVariation, AdapterError> {
        render_variation(variant)
    }
}

impl PlatformAdapter for WooAdapter {
    type Record = WooProduct;

    fn platform(&self) -> Platform {
        Platform::Woo
    }

    fn from_platform(&self, record: Self::Record) -> Result<Conversion, AdapterError> {
        convert_product(&record)
    }

    fn to_platform(&self, product: &CanonicalProduct) -> Result<Self::Record, AdapterError> {
        render_product(product)
    }
}

/// Stock read rule: an untracked product that reports `instock` with no
/// quantity counts as one sellable unit; everything else passes the
/// quantity through verbatim, including its absence.
#[must_use]
pub fn infer_inventory(stock_quantity: Option<i64>, stock_status: Option<&str>) -> Option<i64> {
    match (stock_quantity, stock_status) {
        (None, Some("instock")) => Some(1),
        (quantity, _) => quantity,
    }
}

fn convert_product(record: &WooProduct) -> Result<Conversion, AdapterError> {
    let record_id = record
        .id
        .map_or_else(|| record.name.clone(), |id| id.to_string());

    match record.product_type {
        WooProductType::Simple => convert_simple(record, &record_id),
        WooProductType::Variable => convert_variable(record, &record_id),
        WooProductType::Grouped | WooProductType::External => Ok(Conversion::Skipped {
            id: record_id,
            reason: format!(
                "unsupported product type `{}`",
                record.product_type.as_str()
            ),
        }),
        WooProductType::Variation => Ok(Conversion::Skipped {
            id: record_id,
            reason: "variation row without its parent".to_string(),
        }),
    }
}

fn convert_simple(record: &WooProduct, record_id: &str) -> Result<Conversion, AdapterError> {
    let mut meta = decode_meta_carrier(&record.meta_data, CANONICAL_META_KEY, record_id);
    let mut observed = PlatformMeta::default();
    observed.woo_mut().id = record.id;
    observed.woo_mut().product_type = Some(WooProductType::Simple.as_str().to_string());
    meta.merge_from(observed);

    let (price, compare_at_price) = read_prices(
        record.regular_price.as_deref(),
        record.sale_price.as_deref(),
        record.price.as_deref(),
        record_id,
    )?;

    // Simple products are their own single variant; identity rides on the
    // product-level meta_data.
    let mut variant_meta =
        decode_meta_carrier(&record.meta_data, CANONICAL_VARIANT_META_KEY, record_id);
    let mut observed_variant = PlatformMeta::default();
    observed_variant.woo_mut().id = record.id;
    variant_meta.merge_from(observed_variant);

    let variant = CanonicalVariant {
        canonical_id: decode_canonical_id(&record.meta_data).unwrap_or_else(Uuid::new_v4),
        title: record.name.clone(),
        price,
        compare_at_price,
        sku: record.sku.clone().unwrap_or_default(),
        inventory: infer_inventory(record.stock_quantity, record.stock_status.as_deref()),
        manage_stock: record.manage_stock,
        taxable: None,
        requires_shipping: None,
        attributes: vec![],
        image: None,
        meta: variant_meta,
    };

    Ok(Conversion::Converted(Box::new(CanonicalProduct {
        id: record_id.to_string(),
        title: record.name.clone(),
        description: record.description.clone(),
        images: canonical_images(&record.images),
        options: vec![],
        product_type: record.categories.first().map(|c| c.name.clone()),
        status: status_to_canonical(record.status.as_deref()),
        tags: record.tags.iter().map(|t| t.name.clone()).collect(),
        variants: vec![variant],
        meta,
    })))
}

fn convert_variable(record: &WooProduct, record_id: &str) -> Result<Conversion, AdapterError> {
    if record.variation_records.is_empty() {
        return Ok(Conversion::Skipped {
            id: record_id.to_string(),
            reason: "variable product has no variations".to_string(),
        });
    }

    let mut meta = decode_meta_carrier(&record.meta_data, CANONICAL_META_KEY, record_id);
    let mut observed = PlatformMeta::default();
    observed.woo_mut().id = record.id;
    observed.woo_mut().product_type = Some(WooProductType::Variable.as_str().to_string());
    meta.merge_from(observed);

    let options: Vec<CanonicalProductOption> = record
        .attributes
        .iter()
        .filter(|attribute| attribute.variation)
        .map(|attribute| CanonicalProductOption {
            name: attribute.name.clone(),
            values: attribute.options.clone(),
        })
        .collect();

    let mut variants = Vec::with_capacity(record.variation_records.len());
    for wire in &record.variation_records {
        variants.push(convert_variation(wire, record, record_id)?);
    }

    Ok(Conversion::Converted(Box::new(CanonicalProduct {
        id: record_id.to_string(),
        title: record.name.clone(),
        description: record.description.clone(),
        images: canonical_images(&record.images),
        options,
        product_type: record.categories.first().map(|c| c.name.clone()),
        status: status_to_canonical(record.status.as_deref()),
        tags: record.tags.iter().map(|t| t.name.clone()).collect(),
        variants,
        meta,
    })))
}

fn convert_variation(
    wire: &WooVariation,
    parent: &WooProduct,
    parent_id: &str,
) -> Result<CanonicalVariant, AdapterError> {
    let record_id = wire
        .id
        .map_or_else(|| format!("variation of {parent_id}"), |id| id.to_string());

    let (price, compare_at_price) = read_prices(
        wire.regular_price.as_deref(),
        wire.sale_price.as_deref(),
        wire.price.as_deref(),
        &record_id,
    )?;

    let mut meta = decode_meta_carrier(&wire.meta_data, CANONICAL_VARIANT_META_KEY, &record_id);
    let mut observed = PlatformMeta::default();
    observed.woo_mut().id = wire.id;
    meta.merge_from(observed);

    let attributes: Vec<VariantAttribute> = wire
        .attributes
        .iter()
        .map(|attribute| VariantAttribute::new(attribute.name.clone(), attribute.option.clone()))
        .collect();
    let title = if attributes.is_empty() {
        parent.name.clone()
    } else {
        attributes
            .iter()
            .map(|attribute| attribute.value.as_str())
            .collect::<Vec<_>>()
            .join(" / ")
    };

    Ok(CanonicalVariant {
        canonical_id: decode_canonical_id(&wire.meta_data).unwrap_or_else(Uuid::new_v4),
        title,
        price,
        compare_at_price,
        sku: wire.sku.clone().unwrap_or_default(),
        inventory: infer_inventory(wire.stock_quantity, wire.stock_status.as_deref()),
        manage_stock: wire.manage_stock,
        taxable: None,
        requires_shipping: None,
        attributes,
        image: wire.image.as_ref().map(canonical_variant_image),
        meta,
    })
}

fn render_product(product: &CanonicalProduct) -> Result<WooProduct, AdapterError> {
    let persisted_variable = product
        .meta
        .woo
        .as_ref()
        .and_then(|woo| woo.product_type.as_deref())
        == Some(WooProductType::Variable.as_str());

    match product.variants.as_slice() {
        [variant] if !persisted_variable => render_simple(product, variant),
        _ => render_variable(product),
    }
}

fn render_simple(
    product: &CanonicalProduct,
    variant: &CanonicalVariant,
) -> Result<WooProduct, AdapterError> {
    let mut meta = product.meta.clone();
    meta.woo_mut().product_type = Some(WooProductType::Simple.as_str().to_string());

    let (regular_price, sale_price) = write_prices(variant);
    let (manage_stock, stock_quantity, stock_status) = stock_fields(variant.inventory);

    let meta_data = vec![
        WooMetaData::new(
            CANONICAL_META_KEY,
            meta_json_string(&meta, "woo product meta_data")?,
        ),
        WooMetaData::new(
            CANONICAL_ID_KEY,
            serde_json::Value::String(variant.canonical_id.to_string()),
        ),
        WooMetaData::new(
            CANONICAL_VARIANT_META_KEY,
            meta_json_string(&variant.meta, "woo variant meta_data")?,
        ),
    ];

    Ok(WooProduct {
        id: woo_numeric_id(&product.meta),
        name: product.title.clone(),
        product_type: WooProductType::Simple,
        status: status_to_woo(product.status.as_deref()),
        description: product.description.clone(),
        sku: none_if_empty(Some(variant.sku.clone())),
        regular_price,
        sale_price,
        price: None,
        manage_stock,
        stock_quantity,
        stock_status,
        tags: wire_tags(&product.tags),
        categories: wire_categories(product.product_type.as_deref()),
        attributes: vec![],
        images: product.images.iter().map(wire_image).collect(),
        meta_data,
        variation_ids: vec![],
        variation_records: vec![],
        parent_id: None,
    })
}

fn render_variable(product: &CanonicalProduct) -> Result<WooProduct, AdapterError> {
    let mut meta = product.meta.clone();
    meta.woo_mut().product_type = Some(WooProductType::Variable.as_str().to_string());

    let attributes: Vec<WooProductAttribute> = product
        .options
        .iter()
        .map(|option| WooProductAttribute {
            id: None,
            name: option.name.clone(),
            variation: true,
            visible: true,
            options: option.values.clone(),
        })
        .collect();

    let mut variation_records = Vec::with_capacity(product.variants.len());
    for variant in &product.variants {
        variation_records.push(render_variation(variant)?);
    }

    Ok(WooProduct {
        id: woo_numeric_id(&product.meta),
        name: product.title.clone(),
        product_type: WooProductType::Variable,
        status: status_to_woo(product.status.as_deref()),
        description: product.description.clone(),
        sku: None,
        regular_price: None,
        sale_price: None,
        price: None,
        manage_stock: None,
        stock_quantity: None,
        stock_status: None,
        tags: wire_tags(&product.tags),
        categories: wire_categories(product.product_type.as_deref()),
        attributes,
        images: product.images.iter().map(wire_image).collect(),
        meta_data: vec![WooMetaData::new(
            CANONICAL_META_KEY,
            meta_json_string(&meta, "woo product meta_data")?,
        )],
        variation_ids: vec![],
        variation_records,
        parent_id: None,
    })
}

fn render_variation(variant: &CanonicalVariant) -> Result<WooVariation, AdapterError> {
    let (regular_price, sale_price) = write_prices(variant);
    let (manage_stock, stock_quantity, stock_status) = stock_fields(variant.inventory);

    Ok(WooVariation {
        id: variant.meta.woo.as_ref().and_then(|woo| woo.id),
        sku: none_if_empty(Some(variant.sku.clone())),
        regular_price,
        sale_price,
        price: None,
        manage_stock,
        stock_quantity,
        stock_status,
        attributes: variant
            .attributes
            .iter()
            .map(|attribute| WooVariationAttribute {
                id: None,
                name: attribute.name.clone(),
                option: attribute.value.clone(),
            })
            .collect(),
        image: variant.image.as_ref().map(wire_image),
        meta_data: vec![
            WooMetaData::new(
                CANONICAL_ID_KEY,
                serde_json::Value::String(variant.canonical_id.to_string()),
            ),
            WooMetaData::new(
                CANONICAL_VARIANT_META_KEY,
                meta_json_string(&variant.meta, "woo variant meta_data")?,
            ),
        ],
    })
}

/// Stock write rule, the inverse of [`infer_inventory`]: a tracked quantity
/// writes managed stock with the status derived from its sign, an untracked
/// variant writes unmanaged stock marked `outofstock` so the read side
/// recovers `None`.
fn stock_fields(inventory: Option<i64>) -> (Option<bool>, Option<i64>, Option<String>) {
    match inventory {
        Some(quantity) => {
            let status = if quantity > 0 { "instock" } else { "outofstock" };
            (Some(true), Some(quantity), Some(status.to_string()))
        }
        None => (Some(false), None, Some("outofstock".to_string())),
    }
}

/// Price read: an active sale price is the current price with the regular
/// price as compare-at; otherwise the regular price wins, falling back to
/// the computed `price` field.
fn read_prices(
    regular: Option<&str>,
    sale: Option<&str>,
    computed: Option<&str>,
    record_id: &str,
) -> Result<(Decimal, Option<Decimal>), AdapterError> {
    let regular = non_empty(regular);
    let sale = non_empty(sale);

    if let Some(sale) = sale {
        let price = parse_price(sale, record_id)?;
        let compare_at = regular
            .map(|raw| parse_price(raw, record_id))
            .transpose()?;
        return Ok((price, compare_at));
    }
    if let Some(raw) = regular.or_else(|| non_empty(computed)) {
        return Ok((parse_price(raw, record_id)?, None));
    }
    Err(AdapterError::InvalidPrice {
        platform: Platform::Woo,
        record_id: record_id.to_string(),
        value: String::new(),
    })
}

fn write_prices(variant: &CanonicalVariant) -> (Option<String>, Option<String>) {
    match variant.compare_at_price {
        Some(compare_at) => (
            Some(compare_at.to_string()),
            Some(variant.price.to_string()),
        ),
        None => (Some(variant.price.to_string()), None),
    }
}

fn parse_price(raw: &str, record_id: &str) -> Result<Decimal, AdapterError> {
    raw.trim().parse().map_err(|_| AdapterError::InvalidPrice {
        platform: Platform::Woo,
        record_id: record_id.to_string(),
        value: raw.to_string(),
    })
}

fn status_to_canonical(status: Option<&str>) -> Option<String> {
    status.map(|status| {
        match status {
            "publish" => "active",
            "private" => "archived",
            other => other,
        }
        .to_string()
    })
}

fn status_to_woo(status: Option<&str>) -> Option<String> {
    status.map(|status| {
        match status {
            "active" => "publish",
            "archived" => "private",
            other => other,
        }
        .to_string()
    })
}

fn canonical_images(images: &[WooImage]) -> Vec<CanonicalImage> {
    images
        .iter()
        .enumerate()
        .map(|(index, image)| CanonicalImage {
            id: image.id.map(|id| id.to_string()),
            src: image.src.clone(),
            alt: image.alt.clone(),
            // Ordering is positional on this side of the wire.
            position: i32::try_from(index + 1).ok(),
        })
        .collect()
}

fn canonical_variant_image(image: &WooImage) -> CanonicalImage {
    CanonicalImage {
        id: image.id.map(|id| id.to_string()),
        src: image.src.clone(),
        alt: image.alt.clone(),
        position: None,
    }
}

fn wire_image(image: &CanonicalImage) -> WooImage {
    WooImage {
        id: image.id.as_deref().and_then(|id| id.parse().ok()),
        src: image.src.clone(),
        alt: image.alt.clone(),
    }
}

fn wire_tags(tags: &[String]) -> Vec<WooTag> {
    tags.iter()
        .map(|name| WooTag {
            id: None,
            name: name.clone(),
        })
        .collect()
}

fn wire_categories(product_type: Option<&str>) -> Vec<WooCategory> {
    product_type
        .map(|name| WooCategory {
            id: None,
            name: name.to_string(),
        })
        .into_iter()
        .collect()
}

fn meta_value<'a>(meta_data: &'a [WooMetaData], key: &str) -> Option<&'a serde_json::Value> {
    meta_data
        .iter()
        .find(|entry| entry.key == key)
        .map(|entry| &entry.value)
}

fn decode_meta_carrier(meta_data: &[WooMetaData], key: &str, record_id: &str) -> PlatformMeta {
    let Some(value) = meta_value(meta_data, key) else {
        return PlatformMeta::default();
    };
    // Carriers are written as JSON strings; reads also accept an inline
    // object, which some store plugins rewrite meta values into.
    let parsed = match value {
        serde_json::Value::String(raw) => serde_json::from_str(raw),
        inline => serde_json::from_value(inline.clone()),
    };
    match parsed {
        Ok(meta) => meta,
        Err(error) => {
            tracing::warn!(
                platform = "woo",
                record_id,
                key,
                %error,
                "malformed canonical meta_data, treating as empty"
            );
            PlatformMeta::default()
        }
    }
}

fn decode_canonical_id(meta_data: &[WooMetaData]) -> Option<Uuid> {
    meta_value(meta_data, CANONICAL_ID_KEY)
        .and_then(serde_json::Value::as_str)
        .and_then(|raw| raw.parse().ok())
}

fn woo_numeric_id(meta: &PlatformMeta) -> Option<i64> {
    meta.woo.as_ref().and_then(|woo| woo.id)
}

fn meta_json_string(
    meta: &PlatformMeta,
    context: &str,
) -> Result<serde_json::Value, AdapterError> {
    let raw = serde_json::to_string(meta).map_err(|source| AdapterError::MetaEncode {
        context: context.to_string(),
        source,
    })?;
    Ok(serde_json::Value::String(raw))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "adapter_test.rs"]
mod tests;
