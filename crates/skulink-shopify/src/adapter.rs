//! Bidirectional mapping between Shopify Admin product records and the
//! canonical model.
//!
//! Canonical identity persists in metafields under the `canonical` namespace:
//! the product carries its whole meta map under the key `meta`, each variant
//! carries its canonical ID under `id` and its own meta map under `meta`.
//! A malformed carrier value degrades to an empty meta map with a warning;
//! it never fails the conversion.

use rust_decimal::Decimal;
use uuid::Uuid;

use skulink_core::adapter::{AdapterError, Conversion, PlatformAdapter};
use skulink_core::meta::{Platform, PlatformMeta};
use skulink_core::product::{
    CanonicalImage, CanonicalProduct, CanonicalProductOption, CanonicalVariant, VariantAttribute,
};

use crate::types::{
    ShopifyImage, ShopifyMetafield, ShopifyOption, ShopifyProduct, ShopifyVariant,
};

/// Metafield namespace carrying canonical identity.
pub const META_NAMESPACE: &str = "canonical";
/// Product-level key holding the serialized meta map.
pub const PRODUCT_META_KEY: &str = "meta";
/// Variant-level key holding the canonical ID.
pub const VARIANT_ID_KEY: &str = "id";
/// Variant-level key holding the serialized variant meta map.
pub const VARIANT_META_KEY: &str = "meta";

/// Shopify's placeholder option on products with no configured options.
const PLACEHOLDER_OPTION: &str = "Title";
const PLACEHOLDER_VALUE: &str = "Default Title";

#[derive(Debug, Clone, Copy, Default)]
pub struct ShopifyAdapter;

impl ShopifyAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Builds the wire variant used when appending `variant` to an existing
    /// remote product.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::MetaEncode`] if the variant's meta map cannot
    /// be serialized.
    pub fn variant_payload(
        &self,
        product: &CanonicalProduct,
        variant: &CanonicalVariant,
    ) -> Result<ShopifyVariant, AdapterError> {
        render_variant(product, variant)
    }
}

impl PlatformAdapter for ShopifyAdapter {
    type Record = ShopifyProduct;

    fn platform(&self) -> Platform {
        Platform::Shopify
    }

    fn from_platform(&self, record: Self::Record) -> Result<Conversion, AdapterError> {
        convert_product(&record)
    }

    fn to_platform(&self, product: &CanonicalProduct) -> Result<Self::Record, AdapterError> {
        render_product(product)
    }
}

fn convert_product(record: &ShopifyProduct) -> Result<Conversion, AdapterError> {
    let record_id = record
        .id
        .map_or_else(|| "unknown".to_string(), |id| id.to_string());

    if record.variants.is_empty() {
        return Ok(Conversion::Skipped {
            id: record_id,
            reason: "product has no variants".to_string(),
        });
    }

    let mut meta = decode_meta_carrier(&record.metafields, PRODUCT_META_KEY, &record_id);
    if let Some(id) = record.id {
        let mut observed = PlatformMeta::default();
        observed.shopify_mut().id = Some(id.to_string());
        meta.merge_from(observed);
    }

    let options = canonical_options(&record.options);
    let images: Vec<CanonicalImage> = record.images.iter().map(canonical_image).collect();

    let mut variants = Vec::with_capacity(record.variants.len());
    for wire in &record.variants {
        variants.push(convert_variant(wire, &record_id, &options, &images)?);
    }

    Ok(Conversion::Converted(Box::new(CanonicalProduct {
        id: record_id,
        title: record.title.clone(),
        description: record.body_html.clone(),
        images,
        options,
        product_type: none_if_empty(record.product_type.clone()),
        status: record.status.clone(),
        tags: split_tags(&record.tags),
        variants,
        meta,
    })))
}

fn convert_variant(
    wire: &ShopifyVariant,
    product_id: &str,
    options: &[CanonicalProductOption],
    images: &[CanonicalImage],
) -> Result<CanonicalVariant, AdapterError> {
    let record_id = wire
        .id
        .map_or_else(|| format!("variant of {product_id}"), |id| id.to_string());

    let price = parse_price(&wire.price, &record_id)?;
    let compare_at_price = wire
        .compare_at_price
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| parse_price(s, &record_id))
        .transpose()?;

    let tracked = wire.inventory_management.as_deref() == Some("shopify");
    let inventory = if tracked {
        Some(wire.inventory_quantity.unwrap_or(0))
    } else {
        None
    };

    let canonical_id = decode_canonical_id(&wire.metafields).unwrap_or_else(Uuid::new_v4);
    let mut meta = decode_meta_carrier(&wire.metafields, VARIANT_META_KEY, &record_id);
    if let Some(id) = wire.id {
        let mut observed = PlatformMeta::default();
        observed.shopify_mut().id = Some(id.to_string());
        meta.merge_from(observed);
    }

    let image = wire.image_id.and_then(|id| {
        let id = id.to_string();
        images.iter().find(|i| i.id.as_deref() == Some(&id)).cloned()
    });

    Ok(CanonicalVariant {
        canonical_id,
        title: wire.title.clone(),
        price,
        compare_at_price,
        sku: wire.sku.clone().unwrap_or_default(),
        inventory,
        manage_stock: Some(tracked),
        taxable: wire.taxable,
        requires_shipping: wire.requires_shipping,
        attributes: variant_attributes(wire, options),
        image,
        meta,
    })
}

fn render_product(product: &CanonicalProduct) -> Result<ShopifyProduct, AdapterError> {
    let variants = product
        .variants
        .iter()
        .map(|v| render_variant(product, v))
        .collect::<Result<Vec<_>, _>>()?;

    let meta_json = encode_meta(&product.meta, "shopify product metafield")?;

    Ok(ShopifyProduct {
        id: shopify_numeric_id(&product.meta),
        title: product.title.clone(),
        body_html: product.description.clone(),
        product_type: product.product_type.clone(),
        status: product.status.clone(),
        tags: product.tags.join(", "),
        options: render_options(&product.options),
        images: product.images.iter().map(wire_image).collect(),
        variants,
        metafields: vec![ShopifyMetafield::json(
            META_NAMESPACE,
            PRODUCT_META_KEY,
            meta_json,
        )],
    })
}

fn render_variant(
    product: &CanonicalProduct,
    variant: &CanonicalVariant,
) -> Result<ShopifyVariant, AdapterError> {
    let [option1, option2, option3] = option_slots(product, variant);
    let meta_json = encode_meta(&variant.meta, "shopify variant metafield")?;
    let tracked = variant.inventory.is_some();

    Ok(ShopifyVariant {
        id: shopify_numeric_id(&variant.meta),
        product_id: None,
        title: variant.title.clone(),
        sku: (!variant.sku.is_empty()).then(|| variant.sku.clone()),
        price: variant.price.to_string(),
        compare_at_price: variant.compare_at_price.map(|p| p.to_string()),
        position: None,
        option1,
        option2,
        option3,
        taxable: variant.taxable,
        requires_shipping: variant.requires_shipping,
        inventory_management: tracked.then(|| "shopify".to_string()),
        inventory_quantity: variant.inventory,
        image_id: variant
            .image
            .as_ref()
            .and_then(|i| i.id.as_deref())
            .and_then(|id| id.parse().ok()),
        metafields: vec![
            ShopifyMetafield::text(
                META_NAMESPACE,
                VARIANT_ID_KEY,
                variant.canonical_id.to_string(),
            ),
            ShopifyMetafield::json(META_NAMESPACE, VARIANT_META_KEY, meta_json),
        ],
    })
}

/// Maps attribute values into the `option1`..`option3` slots by the declared
/// option order. With no declared options the first attribute value falls
/// back to `option1`.
fn option_slots(product: &CanonicalProduct, variant: &CanonicalVariant) -> [Option<String>; 3] {
    let mut slots = [None, None, None];
    if product.options.is_empty() {
        slots[0] = variant.attributes.first().map(|a| a.value.clone());
        return slots;
    }
    for attribute in &variant.attributes {
        if let Some(slot) = product
            .options
            .iter()
            .take(3)
            .position(|o| o.name == attribute.name)
        {
            slots[slot] = Some(attribute.value.clone());
        }
    }
    slots
}

fn render_options(options: &[CanonicalProductOption]) -> Vec<ShopifyOption> {
    options
        .iter()
        .take(3)
        .enumerate()
        .map(|(idx, option)| ShopifyOption {
            id: None,
            name: option.name.clone(),
            position: Some(i32::try_from(idx).unwrap_or(0) + 1),
            values: option.values.clone(),
        })
        .collect()
}

fn canonical_options(options: &[ShopifyOption]) -> Vec<CanonicalProductOption> {
    options
        .iter()
        .filter(|o| !is_placeholder_option(o))
        .map(|o| CanonicalProductOption {
            name: o.name.clone(),
            values: o.values.clone(),
        })
        .collect()
}

fn is_placeholder_option(option: &ShopifyOption) -> bool {
    option.name == PLACEHOLDER_OPTION && option.values.iter().all(|v| v == PLACEHOLDER_VALUE)
}

/// Pairs `option1`..`option3` values with the declared option names, in
/// order. The placeholder `Default Title` case yields no attributes because
/// the placeholder option was filtered out of `options`.
fn variant_attributes(
    wire: &ShopifyVariant,
    options: &[CanonicalProductOption],
) -> Vec<VariantAttribute> {
    let slots = [
        wire.option1.as_deref(),
        wire.option2.as_deref(),
        wire.option3.as_deref(),
    ];
    options
        .iter()
        .zip(slots)
        .filter_map(|(option, value)| value.map(|v| VariantAttribute::new(option.name.clone(), v)))
        .collect()
}

fn canonical_image(image: &ShopifyImage) -> CanonicalImage {
    CanonicalImage {
        id: image.id.map(|id| id.to_string()),
        src: image.src.clone(),
        alt: image.alt.clone(),
        position: image.position,
    }
}

fn wire_image(image: &CanonicalImage) -> ShopifyImage {
    ShopifyImage {
        id: image.id.as_deref().and_then(|id| id.parse().ok()),
        src: image.src.clone(),
        alt: image.alt.clone(),
        position: image.position,
    }
}

fn decode_meta_carrier(fields: &[ShopifyMetafield], key: &str, record_id: &str) -> PlatformMeta {
    let Some(field) = fields
        .iter()
        .find(|f| f.namespace == META_NAMESPACE && f.key == key)
    else {
        return PlatformMeta::default();
    };
    match serde_json::from_str(&field.value) {
        Ok(meta) => meta,
        Err(error) => {
            tracing::warn!(
                platform = "shopify",
                record_id,
                %error,
                "malformed canonical metafield, treating as empty"
            );
            PlatformMeta::default()
        }
    }
}

fn decode_canonical_id(fields: &[ShopifyMetafield]) -> Option<Uuid> {
    fields
        .iter()
        .find(|f| f.namespace == META_NAMESPACE && f.key == VARIANT_ID_KEY)
        .and_then(|f| f.value.parse().ok())
}

fn shopify_numeric_id(meta: &PlatformMeta) -> Option<i64> {
    meta.shopify
        .as_ref()
        .and_then(|s| s.id.as_deref())
        .and_then(|id| id.parse().ok())
}

fn encode_meta(meta: &PlatformMeta, context: &str) -> Result<String, AdapterError> {
    serde_json::to_string(meta).map_err(|source| AdapterError::MetaEncode {
        context: context.to_string(),
        source,
    })
}

fn parse_price(raw: &str, record_id: &str) -> Result<Decimal, AdapterError> {
    raw.parse().map_err(|_| AdapterError::InvalidPrice {
        platform: Platform::Shopify,
        record_id: record_id.to_string(),
        value: raw.to_string(),
    })
}

fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

fn none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_wire_variant(id: i64, sku: &str, price: &str) -> ShopifyVariant {
        ShopifyVariant {
            id: Some(id),
            product_id: Some(42),
            title: "Large / Red".to_string(),
            sku: Some(sku.to_string()),
            price: price.to_string(),
            compare_at_price: None,
            position: Some(1),
            option1: Some("Large".to_string()),
            option2: Some("Red".to_string()),
            option3: None,
            taxable: Some(true),
            requires_shipping: Some(true),
            inventory_management: Some("shopify".to_string()),
            inventory_quantity: Some(7),
            image_id: None,
            metafields: vec![],
        }
    }

    fn make_wire_product(variants: Vec<ShopifyVariant>) -> ShopifyProduct {
        ShopifyProduct {
            id: Some(42),
            title: "Trail Jacket".to_string(),
            body_html: Some("<p>Windproof shell.</p>".to_string()),
            product_type: Some("Outerwear".to_string()),
            status: Some("active".to_string()),
            tags: "outdoor, sale".to_string(),
            options: vec![
                ShopifyOption {
                    id: Some(1),
                    name: "Size".to_string(),
                    position: Some(1),
                    values: vec!["Small".to_string(), "Large".to_string()],
                },
                ShopifyOption {
                    id: Some(2),
                    name: "Color".to_string(),
                    position: Some(2),
                    values: vec!["Red".to_string(), "Blue".to_string()],
                },
            ],
            images: vec![],
            variants,
            metafields: vec![],
        }
    }

    fn convert(record: ShopifyProduct) -> CanonicalProduct {
        ShopifyAdapter::new()
            .from_platform(record)
            .expect("conversion failed")
            .into_product()
            .expect("expected a converted product")
    }

    #[test]
    fn skips_product_with_no_variants() {
        let record = make_wire_product(vec![]);
        let conversion = ShopifyAdapter::new()
            .from_platform(record)
            .expect("conversion failed");
        match conversion {
            Conversion::Skipped { id, reason } => {
                assert_eq!(id, "42");
                assert!(reason.contains("no variants"));
            }
            Conversion::Converted(_) => panic!("expected a skip"),
        }
    }

    #[test]
    fn converts_variants_with_attributes_from_option_slots() {
        let product = convert(make_wire_product(vec![make_wire_variant(1, "TJ-L-R", "30.00")]));
        let variant = &product.variants[0];
        assert_eq!(variant.attribute("Size"), Some("Large"));
        assert_eq!(variant.attribute("Color"), Some("Red"));
        assert_eq!(variant.price, Decimal::new(3000, 2));
        assert_eq!(variant.inventory, Some(7));
    }

    #[test]
    fn placeholder_title_option_yields_no_options_or_attributes() {
        let mut record = make_wire_product(vec![make_wire_variant(1, "TJ-1", "10.00")]);
        record.options = vec![ShopifyOption {
            id: Some(1),
            name: "Title".to_string(),
            position: Some(1),
            values: vec!["Default Title".to_string()],
        }];
        record.variants[0].option1 = Some("Default Title".to_string());
        record.variants[0].option2 = None;

        let product = convert(record);
        assert!(product.options.is_empty());
        assert!(product.variants[0].attributes.is_empty());
    }

    #[test]
    fn unparseable_price_is_an_error() {
        let record = make_wire_product(vec![make_wire_variant(1, "TJ-1", "free")]);
        let result = ShopifyAdapter::new().from_platform(record);
        assert!(
            matches!(result, Err(AdapterError::InvalidPrice { ref value, .. }) if value == "free"),
            "expected InvalidPrice, got: {result:?}"
        );
    }

    #[test]
    fn untracked_inventory_reads_as_none() {
        let mut record = make_wire_product(vec![make_wire_variant(1, "TJ-1", "10.00")]);
        record.variants[0].inventory_management = None;
        record.variants[0].inventory_quantity = Some(99);

        let product = convert(record);
        assert_eq!(product.variants[0].inventory, None);
        assert_eq!(product.variants[0].manage_stock, Some(false));
    }

    #[test]
    fn tracked_inventory_with_missing_quantity_reads_zero() {
        let mut record = make_wire_product(vec![make_wire_variant(1, "TJ-1", "10.00")]);
        record.variants[0].inventory_quantity = None;

        let product = convert(record);
        assert_eq!(product.variants[0].inventory, Some(0));
    }

    #[test]
    fn fresh_variant_gets_a_generated_canonical_id() {
        let a = convert(make_wire_product(vec![make_wire_variant(1, "TJ-1", "10.00")]));
        let b = convert(make_wire_product(vec![make_wire_variant(1, "TJ-1", "10.00")]));
        assert_ne!(a.variants[0].canonical_id, b.variants[0].canonical_id);
    }

    #[test]
    fn persisted_canonical_id_is_recovered() {
        let id = Uuid::new_v4();
        let mut record = make_wire_product(vec![make_wire_variant(1, "TJ-1", "10.00")]);
        record.variants[0].metafields = vec![ShopifyMetafield::text(
            META_NAMESPACE,
            VARIANT_ID_KEY,
            id.to_string(),
        )];

        let product = convert(record);
        assert_eq!(product.variants[0].canonical_id, id);
    }

    #[test]
    fn malformed_meta_carrier_degrades_to_observed_ids_only() {
        let mut record = make_wire_product(vec![make_wire_variant(1, "TJ-1", "10.00")]);
        record.metafields = vec![ShopifyMetafield::json(
            META_NAMESPACE,
            PRODUCT_META_KEY,
            "{not json".to_string(),
        )];

        let product = convert(record);
        // The carrier is ignored; the freshly observed shopify id still lands.
        assert_eq!(
            product.meta.shopify.as_ref().and_then(|s| s.id.as_deref()),
            Some("42")
        );
        assert!(product.meta.woo.is_none());
    }

    #[test]
    fn observed_ids_merge_into_persisted_meta() {
        let persisted = r#"{"woo":{"id":7,"productType":"variable"}}"#;
        let mut record = make_wire_product(vec![make_wire_variant(1, "TJ-1", "10.00")]);
        record.metafields = vec![ShopifyMetafield::json(
            META_NAMESPACE,
            PRODUCT_META_KEY,
            persisted.to_string(),
        )];

        let product = convert(record);
        assert_eq!(product.meta.woo.as_ref().and_then(|w| w.id), Some(7));
        assert_eq!(
            product.meta.shopify.as_ref().and_then(|s| s.id.as_deref()),
            Some("42")
        );
    }

    #[test]
    fn tags_split_on_read_and_join_on_write() {
        let product = convert(make_wire_product(vec![make_wire_variant(1, "TJ-1", "10.00")]));
        assert_eq!(product.tags, vec!["outdoor", "sale"]);

        let record = ShopifyAdapter::new()
            .to_platform(&product)
            .expect("render failed");
        assert_eq!(record.tags, "outdoor, sale");
    }

    #[test]
    fn to_platform_places_attributes_in_declared_slots() {
        let product = convert(make_wire_product(vec![make_wire_variant(1, "TJ-1", "30.00")]));
        let record = ShopifyAdapter::new()
            .to_platform(&product)
            .expect("render failed");

        let variant = &record.variants[0];
        assert_eq!(variant.option1.as_deref(), Some("Large"));
        assert_eq!(variant.option2.as_deref(), Some("Red"));
        assert!(variant.option3.is_none());
        assert_eq!(record.options.len(), 2);
        assert_eq!(record.options[0].position, Some(1));
    }

    #[test]
    fn to_platform_falls_back_to_first_attribute_without_declared_options() {
        let mut product = convert(make_wire_product(vec![make_wire_variant(1, "TJ-1", "30.00")]));
        product.options.clear();

        let record = ShopifyAdapter::new()
            .to_platform(&product)
            .expect("render failed");
        assert_eq!(record.variants[0].option1.as_deref(), Some("Large"));
        assert!(record.variants[0].option2.is_none());
    }

    #[test]
    fn to_platform_writes_canonical_metafields() {
        let product = convert(make_wire_product(vec![make_wire_variant(1, "TJ-1", "30.00")]));
        let record = ShopifyAdapter::new()
            .to_platform(&product)
            .expect("render failed");

        let product_meta = record
            .metafields
            .iter()
            .find(|f| f.namespace == META_NAMESPACE && f.key == PRODUCT_META_KEY)
            .expect("product meta carrier");
        let decoded: PlatformMeta =
            serde_json::from_str(&product_meta.value).expect("carrier is valid JSON");
        assert_eq!(
            decoded.shopify.as_ref().and_then(|s| s.id.as_deref()),
            Some("42")
        );

        let id_field = record.variants[0]
            .metafields
            .iter()
            .find(|f| f.key == VARIANT_ID_KEY)
            .expect("variant id carrier");
        assert_eq!(id_field.value, product.variants[0].canonical_id.to_string());
    }

    #[test]
    fn untracked_variant_writes_no_inventory_management() {
        let mut product = convert(make_wire_product(vec![make_wire_variant(1, "TJ-1", "30.00")]));
        product.variants[0].inventory = None;

        let record = ShopifyAdapter::new()
            .to_platform(&product)
            .expect("render failed");
        assert!(record.variants[0].inventory_management.is_none());
        assert!(record.variants[0].inventory_quantity.is_none());
    }

    #[test]
    fn variant_image_resolves_through_image_id() {
        let mut record = make_wire_product(vec![make_wire_variant(1, "TJ-1", "30.00")]);
        record.images = vec![ShopifyImage {
            id: Some(900),
            src: "https://cdn.example/front.jpg".to_string(),
            alt: Some("front".to_string()),
            position: Some(1),
        }];
        record.variants[0].image_id = Some(900);

        let product = convert(record);
        let image = product.variants[0].image.as_ref().expect("variant image");
        assert_eq!(image.src, "https://cdn.example/front.jpg");

        let rendered = ShopifyAdapter::new()
            .to_platform(&product)
            .expect("render failed");
        assert_eq!(rendered.variants[0].image_id, Some(900));
    }

    #[test]
    fn round_trip_preserves_identity_fields() {
        let source = convert(make_wire_product(vec![
            make_wire_variant(1, "TJ-S-R", "28.00"),
            make_wire_variant(2, "TJ-L-R", "30.00"),
        ]));

        let wire = ShopifyAdapter::new()
            .to_platform(&source)
            .expect("render failed");
        let back = ShopifyAdapter::new()
            .from_platform(wire)
            .expect("conversion failed")
            .into_product()
            .expect("expected a converted product");

        assert_eq!(back.variants.len(), source.variants.len());
        for (a, b) in source.variants.iter().zip(&back.variants) {
            assert_eq!(a.canonical_id, b.canonical_id);
            assert_eq!(a.sku, b.sku);
            assert_eq!(a.price, b.price);
            assert_eq!(a.inventory, b.inventory);
        }
    }
}
