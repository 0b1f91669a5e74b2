use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use crate::error::{AppError, Result};

use super::OptionMap;

pub const DEFAULT_STOCK_NOTE: &str = "Initial stock for default product";
pub const VARIANT_STOCK_NOTE: &str = "Initial stock";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum StockLogType {
    In,
    Added,
    Removed,
    Adjusted,
}

/// A stored product row. Variants are products with `parent_id` set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub sku: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub options: Option<OptionMap>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub id: i64,
    pub product_id: i64,
    pub url: String,
    pub alt_text: String,
    pub is_primary: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLog {
    pub id: i64,
    pub product_id: i64,
    #[serde(rename = "type")]
    pub kind: StockLogType,
    pub quantity: i64,
    pub note: String,
    pub created_at: i64,
}

/// A product with everything that hangs off it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTree {
    #[serde(flatten)]
    pub product: Product,
    pub images: Vec<ProductImage>,
    pub stock_logs: Vec<StockLog>,
    pub variants: Vec<ProductTree>,
}

// ============ Creation payload ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProductImage {
    pub url: String,
    #[serde(default)]
    pub alt_text: String,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStockLog {
    #[serde(rename = "type")]
    pub kind: StockLogType,
    pub quantity: i64,
    #[serde(default)]
    pub note: String,
}

impl NewStockLog {
    pub fn initial(quantity: i64, note: &str) -> Self {
        Self {
            kind: StockLogType::In,
            quantity,
            note: note.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVariant {
    #[serde(default)]
    pub sku: Option<String>,
    pub price: f64,
    pub stock: i64,
    #[serde(default)]
    pub options: OptionMap,
    #[serde(default)]
    pub images: Vec<NewProductImage>,
    #[serde(default)]
    pub stock_log: Option<NewStockLog>,
}

impl NewVariant {
    /// Title of the child product row: `"<base> - Size: M, Color: Red"`.
    pub fn title(&self, base_title: &str) -> String {
        if self.options.is_empty() {
            base_title.to_string()
        } else {
            format!("{} - {}", base_title, self.options.describe())
        }
    }

    /// The stock log to write for this variant; an `IN` entry for the
    /// variant's stock when the payload carries none.
    pub fn initial_stock_log(&self) -> NewStockLog {
        self.stock_log
            .clone()
            .unwrap_or_else(|| NewStockLog::initial(self.stock, VARIANT_STOCK_NOTE))
    }
}

/// Normalized product-creation payload (`POST /api/product`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sku: Option<String>,
    pub price: f64,
    pub stock: i64,
    #[serde(default)]
    pub options: Option<OptionMap>,
    #[serde(default)]
    pub images: Vec<NewProductImage>,
    #[serde(default)]
    pub variants: Vec<NewVariant>,
}

fn check_amounts(what: &str, price: f64, stock: i64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::BadRequest(format!(
            "{} price must be a non-negative number",
            what
        )));
    }
    if stock < 0 {
        return Err(AppError::BadRequest(format!(
            "{} stock must not be negative",
            what
        )));
    }
    Ok(())
}

fn check_images(what: &str, images: &[NewProductImage]) -> Result<()> {
    if images.iter().any(|i| i.url.trim().is_empty()) {
        return Err(AppError::BadRequest(format!("{} image url is required", what)));
    }
    Ok(())
}

impl NewProduct {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::BadRequest("Product title is required".into()));
        }
        check_amounts("Product", self.price, self.stock)?;
        check_images("Product", &self.images)?;

        for (i, variant) in self.variants.iter().enumerate() {
            let what = format!("Variant {}", i + 1);
            check_amounts(&what, variant.price, variant.stock)?;
            check_images(&what, &variant.images)?;
            if let Some(log) = &variant.stock_log
                && log.quantity < 0
            {
                return Err(AppError::BadRequest(format!(
                    "{} stock log quantity must not be negative",
                    what
                )));
            }
        }
        Ok(())
    }

    /// Blank skus are stored as NULL.
    pub fn normalized_sku(&self) -> Option<&str> {
        self.sku.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> NewProduct {
        NewProduct {
            title: "Tee".into(),
            description: String::new(),
            sku: Some("TEE".into()),
            price: 10.0,
            stock: 3,
            options: None,
            images: vec![],
            variants: vec![],
        }
    }

    #[test]
    fn variant_title_lists_options_in_order() {
        let variant = NewVariant {
            sku: None,
            price: 1.0,
            stock: 1,
            options: [("Size", "M"), ("Color", "Red")].into_iter().collect(),
            images: vec![],
            stock_log: None,
        };
        assert_eq!(variant.title("Tee"), "Tee - Size: M, Color: Red");
        assert_eq!(variant.initial_stock_log(), NewStockLog::initial(1, VARIANT_STOCK_NOTE));
    }

    #[test]
    fn validate_rejects_blank_title_and_negative_amounts() {
        let mut p = base();
        p.title = "  ".into();
        assert!(matches!(p.validate(), Err(AppError::BadRequest(_))));

        let mut p = base();
        p.price = f64::NAN;
        assert!(p.validate().is_err());

        let mut p = base();
        p.variants.push(NewVariant {
            sku: None,
            price: 1.0,
            stock: -1,
            options: OptionMap::new(),
            images: vec![],
            stock_log: None,
        });
        assert!(p.validate().is_err());
    }

    #[test]
    fn payload_uses_camel_case_and_type_tag() {
        let json = serde_json::json!({
            "title": "Tee",
            "price": 10.0,
            "stock": 2,
            "variants": [{
                "sku": "TEE-S",
                "price": 10.0,
                "stock": 2,
                "options": {"Size": "S"},
                "images": [{"url": "http://img/s.png", "altText": "Tee - S", "isPrimary": true}],
                "stockLog": {"type": "IN", "quantity": 2, "note": "Initial stock"}
            }]
        });
        let p: NewProduct = serde_json::from_value(json).unwrap();
        assert!(p.validate().is_ok());
        assert_eq!(p.variants[0].images[0].alt_text, "Tee - S");
        assert_eq!(p.variants[0].stock_log.as_ref().unwrap().kind, StockLogType::In);
        assert_eq!(p.normalized_sku(), None);
    }
}
