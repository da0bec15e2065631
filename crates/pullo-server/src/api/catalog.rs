//! Read-only catalog queries
//!
//! The query surface the game frontend consumes. Filtering is plain
//! parameter-to-predicate translation; products come back in random order so
//! every game round sees a fresh draw. Rows upserted by the pipeline are
//! visible here as soon as their batch transaction commits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::debug;

/// Default number of products returned per query
pub const DEFAULT_PRODUCTS_QUERY_LIMIT: i64 = 10;

/// Maximum number of products that can be returned in a single query
pub const MAX_PRODUCTS_QUERY_LIMIT: i64 = 100;

/// Filters for product retrieval
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    /// Category display name (Finnish)
    pub category: Option<String>,
    /// Category slug
    pub category_slug: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub bottle_size: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ProductQuery {
    fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PRODUCTS_QUERY_LIMIT)
            .clamp(1, MAX_PRODUCTS_QUERY_LIMIT)
    }

    fn effective_offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// One catalog product joined with its category
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductRecord {
    pub id: i32,
    pub product_id: String,
    pub name: String,
    pub manufacturer: String,
    pub bottle_size: String,
    pub price: f64,
    pub price_per_liter: f64,
    pub is_new: bool,
    pub price_order_code: String,
    pub category: String,
    pub category_slug: String,
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
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One category entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CategoryRecord {
    pub id: i32,
    pub slug: String,
    pub name: String,
    pub name_en: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fetch products matching the given filters, in random order.
///
/// Only categorized products are returned; the join against the category
/// table also supplies the display name and slug.
pub async fn list_products(
    pool: &PgPool,
    query: &ProductQuery,
) -> Result<Vec<ProductRecord>, sqlx::Error> {
    let mut sql = String::from(
        r#"
        SELECT
            p.id, p.product_id, p.name, p.manufacturer, p.bottle_size,
            p.price, p.price_per_liter, p.is_new, p.price_order_code,
            c.name AS category, c.slug AS category_slug,
            p.sub_category, p.special_group, p.country, p.region, p.vintage,
            p.label_notes, p.notes, p.grapes, p.description,
            p.packaging_type, p.closure_type,
            p.alcohol_percentage, p.acidity, p.sugar, p.energy,
            p.selection, p.ean, p.image_url, p.created_at, p.updated_at
        FROM products p
        INNER JOIN categories c ON p.category_id = c.id
        WHERE 1=1
        "#,
    );

    let mut bind_count = 1;
    let mut conditions = Vec::new();

    if query.category.is_some() {
        conditions.push(format!("c.name = ${}", bind_count));
        bind_count += 1;
    }
    if query.category_slug.is_some() {
        conditions.push(format!("c.slug = ${}", bind_count));
        bind_count += 1;
    }
    if query.price_min.is_some() {
        conditions.push(format!("p.price >= ${}", bind_count));
        bind_count += 1;
    }
    if query.price_max.is_some() {
        conditions.push(format!("p.price <= ${}", bind_count));
        bind_count += 1;
    }
    if query.bottle_size.is_some() {
        conditions.push(format!("p.bottle_size = ${}", bind_count));
        bind_count += 1;
    }

    for condition in conditions {
        sql.push_str(" AND ");
        sql.push_str(&condition);
    }

    sql.push_str(" ORDER BY RANDOM()");
    sql.push_str(&format!(" LIMIT ${}", bind_count));
    bind_count += 1;
    sql.push_str(&format!(" OFFSET ${}", bind_count));

    let mut query_builder = sqlx::query_as::<_, ProductRecord>(&sql);

    if let Some(category) = &query.category {
        query_builder = query_builder.bind(category);
    }
    if let Some(slug) = &query.category_slug {
        query_builder = query_builder.bind(slug);
    }
    if let Some(price_min) = query.price_min {
        query_builder = query_builder.bind(price_min);
    }
    if let Some(price_max) = query.price_max {
        query_builder = query_builder.bind(price_max);
    }
    if let Some(bottle_size) = &query.bottle_size {
        query_builder = query_builder.bind(bottle_size);
    }

    query_builder = query_builder
        .bind(query.effective_limit())
        .bind(query.effective_offset());

    let records = query_builder.fetch_all(pool).await?;

    debug!(count = records.len(), "Queried products");

    Ok(records)
}

/// List the categories that currently have products, by name
pub async fn list_categories(pool: &PgPool) -> Result<Vec<CategoryRecord>, sqlx::Error> {
    sqlx::query_as::<_, CategoryRecord>(
        r#"
        SELECT c.id, c.slug, c.name, c.name_en, c.created_at, c.updated_at
        FROM categories c
        INNER JOIN products p ON p.category_id = c.id
        WHERE c.name <> ''
        GROUP BY c.id
        ORDER BY c.name ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// List the distinct non-empty bottle sizes in the catalog
pub async fn list_bottle_sizes(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT DISTINCT bottle_size
        FROM products
        WHERE bottle_size <> ''
        ORDER BY bottle_size ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_defaults_and_clamps() {
        let query = ProductQuery::default();
        assert_eq!(query.effective_limit(), DEFAULT_PRODUCTS_QUERY_LIMIT);

        let query = ProductQuery {
            limit: Some(10_000),
            ..Default::default()
        };
        assert_eq!(query.effective_limit(), MAX_PRODUCTS_QUERY_LIMIT);

        let query = ProductQuery {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(query.effective_limit(), 1);
    }

    #[test]
    fn test_offset_never_negative() {
        let query = ProductQuery {
            offset: Some(-5),
            ..Default::default()
        };
        assert_eq!(query.effective_offset(), 0);
    }
}
