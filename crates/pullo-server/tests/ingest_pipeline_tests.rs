//! Ingestion pipeline integration tests
//!
//! These exercise the pure half of the pipeline end to end: a fixture
//! spreadsheet range through decoding, normalization, validity filtering,
//! and taxonomy derivation. No database or browser is involved.

use calamine::{Data, Range};
use pullo_server::ingest::alko::decoder::rows_from_range;
use pullo_server::ingest::alko::normalizer::normalize;
use pullo_server::ingest::alko::taxonomy::derive_categories;
use pullo_server::ingest::alko::{Category, Product};

/// Fixture shaped like the real price list: a title block, then the header
/// row, then one red wine and one beer.
fn fixture_range() -> Range<Data> {
    // Row 5 is left empty; one test writes a footer line into it
    let mut range = Range::new((0, 0), (5, 5));
    range.set_value((0, 0), Data::String("Alkon hinnasto".to_string()));

    range.set_value((2, 0), Data::String("Numero".to_string()));
    range.set_value((2, 1), Data::String("Nimi".to_string()));
    range.set_value((2, 2), Data::String("Hinta".to_string()));
    range.set_value((2, 3), Data::String("Tyyppi".to_string()));
    range.set_value((2, 4), Data::String("Pullokoko".to_string()));
    range.set_value((2, 5), Data::String("Valmistusmaa".to_string()));

    range.set_value((3, 0), Data::Float(945847.0));
    range.set_value((3, 1), Data::String("Apothic Dark".to_string()));
    range.set_value((3, 2), Data::Float(13.48));
    range.set_value((3, 3), Data::String("Punaviinit".to_string()));
    range.set_value((3, 4), Data::String("0,75 l".to_string()));
    range.set_value((3, 5), Data::String("Yhdysvallat".to_string()));

    range.set_value((4, 0), Data::Float(730027.0));
    range.set_value((4, 1), Data::String("Karhu Lager".to_string()));
    range.set_value((4, 2), Data::Float(2.98));
    range.set_value((4, 3), Data::String("Oluet".to_string()));
    range.set_value((4, 4), Data::String("0,33 l".to_string()));
    range.set_value((4, 5), Data::String("Suomi".to_string()));

    range
}

fn decode_and_normalize(range: &Range<Data>) -> Vec<Product> {
    rows_from_range(range)
        .expect("fixture should decode")
        .iter()
        .map(normalize)
        .filter(Product::is_valid)
        .collect()
}

#[test]
fn fixture_yields_two_products_and_two_categories() {
    let products = decode_and_normalize(&fixture_range());
    assert_eq!(products.len(), 2);

    let categories = derive_categories(&products);
    assert_eq!(categories.len(), 2);

    let slugs: Vec<&str> = categories.iter().map(|c| c.slug.as_str()).collect();
    assert!(slugs.contains(&"punaviinit"));
    assert!(slugs.contains(&"oluet"));
}

#[test]
fn fixture_categories_translate_to_english() {
    let products = decode_and_normalize(&fixture_range());
    let categories = derive_categories(&products);

    let by_slug = |slug: &str| -> &Category {
        categories.iter().find(|c| c.slug == slug).unwrap()
    };

    assert_eq!(by_slug("punaviinit").name, "Punaviinit");
    assert_eq!(by_slug("punaviinit").name_en, "Red Wines");
    assert_eq!(by_slug("oluet").name, "Oluet");
    assert_eq!(by_slug("oluet").name_en, "Beers");
}

#[test]
fn fixture_products_carry_derived_image_urls() {
    let products = decode_and_normalize(&fixture_range());

    let wine = products.iter().find(|p| p.product_id == "945847").unwrap();
    assert_eq!(wine.name, "Apothic Dark");
    assert_eq!(wine.price, 13.48);
    assert_eq!(wine.category, "Punaviinit");
    assert_eq!(
        wine.image_url,
        "https://images.alko.fi/images/cs_srgb,f_auto,t_medium/cdn/945847/.jpg"
    );

    let beer = products.iter().find(|p| p.product_id == "730027").unwrap();
    assert_eq!(beer.image_url, Product::image_url_for("730027"));
}

#[test]
fn rows_without_identity_are_filtered_not_fatal() {
    let mut range = fixture_range();
    // A footer line with no product number and no name
    range.set_value((5, 2), Data::String("Yhteensä".to_string()));

    let products = decode_and_normalize(&range);
    assert_eq!(products.len(), 2);
}

#[test]
fn normalization_is_total_over_sparse_rows() {
    let mut range = Range::new((0, 0), (1, 3));
    range.set_value((0, 0), Data::String("Numero".to_string()));
    range.set_value((0, 1), Data::String("Nimi".to_string()));
    range.set_value((0, 2), Data::String("Hinta".to_string()));
    range.set_value((0, 3), Data::String("Alkoholi-%".to_string()));

    range.set_value((1, 0), Data::String("42".to_string()));
    range.set_value((1, 1), Data::String("Vajaa rivi".to_string()));
    // Hinta and Alkoholi-% left empty

    let rows = rows_from_range(&range).unwrap();
    assert_eq!(rows.len(), 1);

    let product = normalize(&rows[0]);
    assert!(product.is_valid());
    assert_eq!(product.price, 0.0);
    assert_eq!(product.alcohol_percentage, 0.0);
    assert_eq!(product.manufacturer, "");
    assert!(!product.is_new);
}

#[test]
fn taxonomy_is_stable_across_repeated_derivation() {
    let products = decode_and_normalize(&fixture_range());

    let first = derive_categories(&products);
    let second = derive_categories(&products);
    assert_eq!(first, second);

    let doubled: Vec<Product> = products
        .iter()
        .chain(products.iter())
        .cloned()
        .collect();
    assert_eq!(derive_categories(&doubled), first);
}
