//! Turns the product form plus generated combinations into the payload the
//! server persists.

use crate::models::{
    DEFAULT_STOCK_NOTE, NewProduct, NewProductImage, NewStockLog, NewVariant, OptionMap,
    VARIANT_STOCK_NOTE,
};

use super::variants::Combination;

/// Base fields entered for a product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub title: String,
    pub description: String,
    pub sku: String,
    pub price: f64,
    pub stock: i64,
    /// Single image used when the product has no variants.
    pub image_url: String,
}

/// Encode one option value so a `-` inside it never reads as a separator.
///
/// Segments are percent-encoded and a literal hyphen becomes `%2D`; plain
/// alphanumeric values pass through unchanged.
pub fn encode_sku_segment(segment: &str) -> String {
    urlencoding::encode(segment.trim()).replace('-', "%2D")
}

/// `<base>-<value>-<value>...` in axis order. A blank base is left out.
///
/// Only option values are encoded; the base sku is kept as entered so it
/// matches the sku of the product and of a default variant.
pub fn variant_sku(base_sku: &str, options: &OptionMap) -> Option<String> {
    let base = base_sku.trim();
    let segments: Vec<String> = std::iter::once(base)
        .filter(|b| !b.is_empty())
        .map(str::to_string)
        .chain(options.values().map(encode_sku_segment))
        .collect();

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("-"))
    }
}

fn primary_image(url: &str, alt_text: String) -> Vec<NewProductImage> {
    let url = url.trim();
    if url.is_empty() {
        return Vec::new();
    }
    vec![NewProductImage {
        url: url.to_string(),
        alt_text,
        is_primary: true,
    }]
}

fn default_variant(form: &ProductForm) -> NewVariant {
    let sku = form.sku.trim();
    NewVariant {
        sku: (!sku.is_empty()).then(|| sku.to_string()),
        price: form.price,
        stock: form.stock,
        options: OptionMap::new(),
        images: primary_image(&form.image_url, form.title.trim().to_string()),
        stock_log: Some(NewStockLog::initial(form.stock, DEFAULT_STOCK_NOTE)),
    }
}

fn generated_variant(form: &ProductForm, combination: &Combination) -> NewVariant {
    let values: Vec<&str> = combination.options.values().collect();
    let alt_text = format!("{} - {}", form.title.trim(), values.join(" "));

    NewVariant {
        sku: variant_sku(&form.sku, &combination.options),
        price: combination.price,
        stock: combination.stock,
        options: combination.options.clone(),
        images: primary_image(&combination.image_url, alt_text),
        stock_log: Some(NewStockLog::initial(combination.stock, VARIANT_STOCK_NOTE)),
    }
}

/// Build the product-creation payload.
///
/// With no combinations the product gets exactly one default variant that
/// mirrors the base fields; otherwise one variant per combination.
pub fn assemble_product(form: &ProductForm, combinations: &[Combination]) -> NewProduct {
    let variants = if combinations.is_empty() {
        vec![default_variant(form)]
    } else {
        combinations
            .iter()
            .map(|c| generated_variant(form, c))
            .collect()
    };

    let sku = form.sku.trim();
    NewProduct {
        title: form.title.trim().to_string(),
        description: form.description.trim().to_string(),
        sku: (!sku.is_empty()).then(|| sku.to_string()),
        price: form.price,
        stock: form.stock,
        options: None,
        images: Vec::new(),
        variants,
    }
}
