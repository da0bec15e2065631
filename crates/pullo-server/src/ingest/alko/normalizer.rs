//! Price-list row normalization
//!
//! Converts one raw Finnish-keyed spreadsheet row into a canonical
//! [`Product`]. Normalization is total: every field has a defined fallback
//! (empty string for text, 0 for numbers, false for flags), so a partial or
//! malformed row still yields a complete record. Filtering rows that lack a
//! product number or name is the pipeline's job, not this module's.

use super::models::{Product, RawRow};

/// Source column labels, as printed in the price-list header row.
///
/// This table is the single point of change when Alko shifts the file
/// format.
mod columns {
    pub const NUMBER: &str = "Numero";
    pub const NAME: &str = "Nimi";
    pub const MANUFACTURER: &str = "Valmistaja";
    pub const BOTTLE_SIZE: &str = "Pullokoko";
    pub const PRICE: &str = "Hinta";
    pub const PRICE_PER_LITER: &str = "Litrahinta";
    pub const NOVELTY: &str = "Uutuus";
    pub const PRICE_ORDER_CODE: &str = "Hinnastojärjestyskoodi";
    pub const CATEGORY: &str = "Tyyppi";
    pub const SUB_CATEGORY: &str = "Alatyyppi";
    pub const SPECIAL_GROUP: &str = "Erityisryhmä";
    pub const COUNTRY: &str = "Valmistusmaa";
    pub const REGION: &str = "Alue";
    pub const VINTAGE: &str = "Vuosikerta";
    pub const LABEL_NOTES: &str = "Etikettimerkintöjä";
    pub const NOTES: &str = "Huomautus";
    pub const GRAPES: &str = "Rypäleet";
    pub const DESCRIPTION: &str = "Luonnehdinta";
    pub const PACKAGING_TYPE: &str = "Pakkaustyyppi";
    pub const CLOSURE_TYPE: &str = "Suljentatyyppi";
    pub const ALCOHOL_PERCENTAGE: &str = "Alkoholi-%";
    pub const ACIDITY: &str = "Hapot g/l";
    pub const SUGAR: &str = "Sokeri g/l";
    pub const ENERGY: &str = "Energia kcal/100 ml";
    pub const SELECTION: &str = "Valikoima";
    pub const EAN: &str = "EAN";
}

/// Literal token in the novelty column that marks a new product.
const NOVELTY_TOKEN: &str = "uutuus";

/// Normalize one raw row into a canonical product. Never fails.
pub fn normalize(row: &RawRow) -> Product {
    let product_id = text(row, columns::NUMBER);
    let image_url = if product_id.is_empty() {
        String::new()
    } else {
        Product::image_url_for(&product_id)
    };

    Product {
        name: text(row, columns::NAME),
        manufacturer: text(row, columns::MANUFACTURER),
        bottle_size: text(row, columns::BOTTLE_SIZE),
        price: number(row, columns::PRICE),
        price_per_liter: number(row, columns::PRICE_PER_LITER),
        is_new: text(row, columns::NOVELTY) == NOVELTY_TOKEN,
        price_order_code: text(row, columns::PRICE_ORDER_CODE),
        category: capitalize(&text(row, columns::CATEGORY)),
        sub_category: text(row, columns::SUB_CATEGORY),
        special_group: text(row, columns::SPECIAL_GROUP),
        country: text(row, columns::COUNTRY),
        region: text(row, columns::REGION),
        vintage: text(row, columns::VINTAGE),
        label_notes: text(row, columns::LABEL_NOTES),
        notes: text(row, columns::NOTES),
        grapes: text(row, columns::GRAPES),
        description: text(row, columns::DESCRIPTION),
        packaging_type: text(row, columns::PACKAGING_TYPE),
        closure_type: text(row, columns::CLOSURE_TYPE),
        alcohol_percentage: number(row, columns::ALCOHOL_PERCENTAGE),
        acidity: number(row, columns::ACIDITY),
        sugar: number(row, columns::SUGAR),
        energy: number(row, columns::ENERGY),
        selection: text(row, columns::SELECTION),
        ean: text(row, columns::EAN),
        product_id,
        image_url,
    }
}

/// Text field: trimmed cell content, empty string when absent
fn text(row: &RawRow, column: &str) -> String {
    row.get(column)
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

/// Numeric field: parsed as floating point, 0 when absent or unparseable
fn number(row: &RawRow, column: &str) -> f64 {
    row.get(column)
        .and_then(|value| value.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// First letter uppercased, the rest lowercased, for display consistency
/// across category labels
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => {
            first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
        },
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_normalize_full_row() {
        let raw = row(&[
            ("Numero", "906458"),
            ("Nimi", "Koskenkorva Viina"),
            ("Valmistaja", "Anora"),
            ("Pullokoko", "0,5 l"),
            ("Hinta", "13.99"),
            ("Litrahinta", "27.98"),
            ("Uutuus", "uutuus"),
            ("Tyyppi", "vodkat ja viinat"),
            ("Valmistusmaa", "Suomi"),
            ("Alkoholi-%", "38"),
            ("EAN", "6412700021669"),
        ]);

        let product = normalize(&raw);
        assert_eq!(product.product_id, "906458");
        assert_eq!(product.name, "Koskenkorva Viina");
        assert_eq!(product.price, 13.99);
        assert_eq!(product.price_per_liter, 27.98);
        assert!(product.is_new);
        assert_eq!(product.category, "Vodkat ja viinat");
        assert_eq!(product.alcohol_percentage, 38.0);
        assert_eq!(
            product.image_url,
            "https://images.alko.fi/images/cs_srgb,f_auto,t_medium/cdn/906458/.jpg"
        );
    }

    #[test]
    fn test_normalize_empty_row_is_total() {
        let product = normalize(&RawRow::new());

        assert_eq!(product.product_id, "");
        assert_eq!(product.name, "");
        assert_eq!(product.price, 0.0);
        assert_eq!(product.alcohol_percentage, 0.0);
        assert!(!product.is_new);
        assert_eq!(product.image_url, "");
        assert!(!product.is_valid());
    }

    #[test]
    fn test_normalize_unparseable_numbers_default_to_zero() {
        let raw = row(&[
            ("Numero", "123"),
            ("Nimi", "Testi"),
            ("Hinta", "ei tiedossa"),
            ("Sokeri g/l", ""),
            ("Energia kcal/100 ml", "n/a"),
        ]);

        let product = normalize(&raw);
        assert_eq!(product.price, 0.0);
        assert_eq!(product.sugar, 0.0);
        assert_eq!(product.energy, 0.0);
        assert!(product.is_valid());
    }

    #[test]
    fn test_is_new_requires_exact_token() {
        let raw = row(&[("Numero", "1"), ("Nimi", "A"), ("Uutuus", "Uutuus!")]);
        assert!(!normalize(&raw).is_new);

        let raw = row(&[("Numero", "1"), ("Nimi", "A"), ("Uutuus", "uutuus")]);
        assert!(normalize(&raw).is_new);
    }

    #[test]
    fn test_category_is_capitalized() {
        let raw = row(&[("Numero", "1"), ("Nimi", "A"), ("Tyyppi", "PUNAVIINIT")]);
        assert_eq!(normalize(&raw).category, "Punaviinit");
    }

    #[test]
    fn test_text_fields_are_trimmed() {
        let raw = row(&[("Numero", "  42  "), ("Nimi", " Talo Viini ")]);
        let product = normalize(&raw);
        assert_eq!(product.product_id, "42");
        assert_eq!(product.name, "Talo Viini");
    }
}
