//! Category taxonomy derivation
//!
//! The taxonomy is not authoritative data: it is recomputed from the
//! category values observed in the current row set on every run. Entries
//! that stop appearing in the source are left in storage untouched.

use std::collections::BTreeSet;

use super::models::{Category, Product};

/// Finnish category name to English display name. Categories missing from
/// this table keep their Finnish name as the English one.
const CATEGORY_TRANSLATIONS: &[(&str, &str)] = &[
    ("Alkoholittomat", "Non-Alcoholic"),
    ("Brandyt, armanjakit ja calvadosit", "Brandies, Armagnacs, And Calvados"),
    ("Ginit ja maustetut viinat", "Gins And Flavored Spirits"),
    ("Hanapakkaukset", "Bag-In-Box Packages"),
    ("Juomasekoitukset", "Cocktails"),
    (
        "Jälkiruokaviinit, väkevöidyt ja muut viinit",
        "Dessert Wines, Fortified And Other Wines",
    ),
    ("Konjakit", "Cognacs"),
    ("Kuohuviinit ja samppanjat", "Sparkling Wines And Champagnes"),
    ("Lahja- ja juomatarvikkeet", "Gifts And Drink Accessories"),
    ("Liköörit ja katkerot", "Liqueurs And Bitters"),
    ("Oluet", "Beers"),
    ("Punaviinit", "Red Wines"),
    ("Rommit", "Rums"),
    ("Roseeviinit", "Rosé Wines"),
    ("Siiderit", "Ciders"),
    ("Valkoviinit", "White Wines"),
    ("Viinijuomat", "Wine Drinks"),
    ("Viskit", "Whiskies"),
    ("Vodkat ja viinat", "Vodkas And Spirits"),
];

/// Derive the category entries observed in a normalized product set.
///
/// One entry per distinct non-empty category value, deduplicated by slug so
/// the upsert never writes the same key twice in one batch. Order is not
/// significant.
pub fn derive_categories(products: &[Product]) -> Vec<Category> {
    let mut seen_slugs = BTreeSet::new();
    let mut categories = Vec::new();

    for product in products {
        let name = product.category.trim();
        if name.is_empty() {
            continue;
        }

        let slug = slug::slugify(name);
        if !seen_slugs.insert(slug.clone()) {
            continue;
        }

        categories.push(Category {
            slug,
            name: name.to_string(),
            name_en: english_name(name).to_string(),
        });
    }

    categories
}

/// English display name for a Finnish category, falling back to the input
fn english_name(name: &str) -> &str {
    CATEGORY_TRANSLATIONS
        .iter()
        .find(|(finnish, _)| *finnish == name)
        .map(|(_, english)| *english)
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::alko::models::tests::sample_product;

    fn product_with_category(category: &str) -> Product {
        let mut product = sample_product();
        product.category = category.to_string();
        product
    }

    #[test]
    fn test_derive_known_categories() {
        let products = vec![
            product_with_category("Punaviinit"),
            product_with_category("Oluet"),
        ];

        let categories = derive_categories(&products);
        assert_eq!(categories.len(), 2);

        let red = categories.iter().find(|c| c.slug == "punaviinit").unwrap();
        assert_eq!(red.name, "Punaviinit");
        assert_eq!(red.name_en, "Red Wines");

        let beer = categories.iter().find(|c| c.slug == "oluet").unwrap();
        assert_eq!(beer.name, "Oluet");
        assert_eq!(beer.name_en, "Beers");
    }

    #[test]
    fn test_slug_strips_diacritics_and_punctuation() {
        let products = vec![product_with_category(
            "Jälkiruokaviinit, väkevöidyt ja muut viinit",
        )];

        let categories = derive_categories(&products);
        assert_eq!(categories.len(), 1);
        assert_eq!(
            categories[0].slug,
            "jalkiruokaviinit-vakevoidyt-ja-muut-viinit"
        );
        assert_eq!(
            categories[0].name_en,
            "Dessert Wines, Fortified And Other Wines"
        );
    }

    #[test]
    fn test_untranslated_category_falls_back_to_finnish_name() {
        let products = vec![product_with_category("Uudet erikoisuudet")];

        let categories = derive_categories(&products);
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].slug, "uudet-erikoisuudet");
        assert_eq!(categories[0].name_en, "Uudet erikoisuudet");
    }

    #[test]
    fn test_duplicates_and_empties_are_dropped() {
        let products = vec![
            product_with_category("Oluet"),
            product_with_category("Oluet"),
            product_with_category(""),
            product_with_category("   "),
        ];

        let categories = derive_categories(&products);
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].slug, "oluet");
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let products = vec![
            product_with_category("Punaviinit"),
            product_with_category("Viskit"),
        ];

        let first = derive_categories(&products);
        let second = derive_categories(&products);
        assert_eq!(first, second);

        // Duplicating the input set changes nothing
        let doubled: Vec<_> = products.iter().chain(products.iter()).cloned().collect();
        assert_eq!(derive_categories(&doubled), first);
    }
}
