//! Alko catalog data models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Image CDN path template; the product number is the only variable part.
const IMAGE_URL_BASE: &str = "https://images.alko.fi/images/cs_srgb,f_auto,t_medium/cdn";

/// One decoded spreadsheet row: source column label to cell text.
///
/// Labels are in Finnish and may change between price-list releases; the
/// normalizer's column table is the single place that knows them.
pub type RawRow = BTreeMap<String, String>;

/// Canonical product record, one per price-list row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Alko's stable product number; the upsert key
    pub product_id: String,
    pub name: String,
    pub manufacturer: String,
    pub bottle_size: String,
    pub price: f64,
    pub price_per_liter: f64,
    /// True when the source row is flagged as a novelty
    pub is_new: bool,
    pub price_order_code: String,
    /// Category display label; resolves to a taxonomy entry at insert time
    pub category: String,
    pub sub_category: String,
    pub special_group: String,
    pub country: String,
    pub region: String,
    pub vintage: String,
    pub label_notes: String,
    pub notes: String,
    pub grapes: String,
    pub description: String,
    pub packaging_type: String,
    pub closure_type: String,
    pub alcohol_percentage: f64,
    pub acidity: f64,
    pub sugar: f64,
    pub energy: f64,
    pub selection: String,
    pub ean: String,
    /// Derived from `product_id`; empty when the identifier is missing
    pub image_url: String,
}

impl Product {
    /// Image URL for a product number, templated onto Alko's image CDN
    pub fn image_url_for(product_id: &str) -> String {
        format!("{}/{}/.jpg", IMAGE_URL_BASE, product_id)
    }

    /// Whether the row carries the minimum identity the catalog requires
    pub fn is_valid(&self) -> bool {
        !self.product_id.is_empty() && !self.name.is_empty()
    }
}

/// A derived category taxonomy entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Machine-friendly identifier derived from the Finnish name; the
    /// upsert key
    pub slug: String,
    /// Original-language (Finnish) name
    pub name: String,
    /// English display name; falls back to the Finnish name when no
    /// translation is known
    pub name_en: String,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[test]
    fn test_image_url_is_deterministic() {
        let first = Product::image_url_for("906458");
        let second = Product::image_url_for("906458");
        assert_eq!(first, second);
        assert_eq!(
            first,
            "https://images.alko.fi/images/cs_srgb,f_auto,t_medium/cdn/906458/.jpg"
        );
    }

    #[test]
    fn test_image_url_substitutes_identifier() {
        assert!(Product::image_url_for("123").contains("/123/"));
        assert!(Product::image_url_for("ABC-1").contains("/ABC-1/"));
    }

    #[test]
    fn test_is_valid_requires_id_and_name() {
        let mut product = sample_product();
        assert!(product.is_valid());

        product.product_id.clear();
        assert!(!product.is_valid());

        product.product_id = "906458".to_string();
        product.name.clear();
        assert!(!product.is_valid());
    }

    pub(crate) fn sample_product() -> Product {
        Product {
            product_id: "906458".to_string(),
            name: "Koskenkorva Viina".to_string(),
            manufacturer: "Anora".to_string(),
            bottle_size: "0,5 l".to_string(),
            price: 13.99,
            price_per_liter: 27.98,
            is_new: false,
            price_order_code: "600".to_string(),
            category: "Vodkat ja viinat".to_string(),
            sub_category: "Maustamattomat viinat".to_string(),
            special_group: String::new(),
            country: "Suomi".to_string(),
            region: String::new(),
            vintage: String::new(),
            label_notes: String::new(),
            notes: String::new(),
            grapes: String::new(),
            description: String::new(),
            packaging_type: "pullo".to_string(),
            closure_type: "kierrekorkki".to_string(),
            alcohol_percentage: 38.0,
            acidity: 0.0,
            sugar: 0.0,
            energy: 52.0,
            selection: "vakiovalikoima".to_string(),
            ean: "6412700021669".to_string(),
            image_url: Product::image_url_for("906458"),
        }
    }
}
