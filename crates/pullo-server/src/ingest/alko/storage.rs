//! Batched catalog upserts
//!
//! Rows are written in fixed-size chunks, one transaction per chunk: a chunk
//! either fully commits or fully rolls back, and a failure in chunk N leaves
//! chunks before it committed. Upserts are keyed by the natural identifiers
//! (`slug` for categories, `product_id` for products) and stamp `updated_at`
//! on conflict. Categories must be upserted before products: each product row
//! resolves its category reference by name at insert time.

use sqlx::PgPool;
use tracing::{debug, info};

use super::models::{Category, Product};

/// Rows per transaction
pub const BATCH_SIZE: usize = 100;

/// Catalog storage operations for the Alko integration
#[derive(Clone)]
pub struct AlkoStorage {
    db: PgPool,
}

impl AlkoStorage {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Upsert category entries keyed by slug. Returns the row count written.
    pub async fn upsert_categories(
        &self,
        categories: &[Category],
    ) -> Result<usize, sqlx::Error> {
        if categories.is_empty() {
            return Ok(0);
        }

        for (index, chunk) in categories.chunks(BATCH_SIZE).enumerate() {
            let mut tx = self.db.begin().await?;

            for category in chunk {
                sqlx::query(
                    r#"
                    INSERT INTO categories (slug, name, name_en)
                    VALUES ($1, $2, $3)
                    ON CONFLICT (slug) DO UPDATE
                    SET
                        name = EXCLUDED.name,
                        name_en = EXCLUDED.name_en,
                        updated_at = NOW()
                    "#,
                )
                .bind(&category.slug)
                .bind(&category.name)
                .bind(&category.name_en)
                .execute(&mut *tx)
                .await?;
            }

            tx.commit().await?;

            debug!(chunk = index + 1, rows = chunk.len(), "Committed category chunk");
        }

        info!(count = categories.len(), "Upserted categories");

        Ok(categories.len())
    }

    /// Upsert product rows keyed by product number. Returns the row count
    /// written.
    ///
    /// The category reference is resolved by a sub-select against the
    /// categories table; a product whose category has no entry gets a null
    /// reference rather than failing the chunk.
    pub async fn upsert_products(&self, products: &[Product]) -> Result<usize, sqlx::Error> {
        if products.is_empty() {
            return Ok(0);
        }

        let chunk_count = products.len().div_ceil(BATCH_SIZE);

        for (index, chunk) in products.chunks(BATCH_SIZE).enumerate() {
            let mut tx = self.db.begin().await?;

            for product in chunk {
                sqlx::query(
                    r#"
                    INSERT INTO products (
                        product_id, name, manufacturer, bottle_size,
                        price, price_per_liter, is_new, price_order_code,
                        category_id, sub_category, special_group, country,
                        region, vintage, label_notes, notes, grapes,
                        description, packaging_type, closure_type,
                        alcohol_percentage, acidity, sugar, energy,
                        selection, ean, image_url
                    )
                    VALUES (
                        $1, $2, $3, $4, $5, $6, $7, $8,
                        (SELECT id FROM categories WHERE name = $9),
                        $10, $11, $12, $13, $14, $15, $16, $17, $18,
                        $19, $20, $21, $22, $23, $24, $25, $26, $27
                    )
                    ON CONFLICT (product_id) DO UPDATE
                    SET
                        name = EXCLUDED.name,
                        manufacturer = EXCLUDED.manufacturer,
                        bottle_size = EXCLUDED.bottle_size,
                        price = EXCLUDED.price,
                        price_per_liter = EXCLUDED.price_per_liter,
                        is_new = EXCLUDED.is_new,
                        price_order_code = EXCLUDED.price_order_code,
                        category_id = EXCLUDED.category_id,
                        sub_category = EXCLUDED.sub_category,
                        special_group = EXCLUDED.special_group,
                        country = EXCLUDED.country,
                        region = EXCLUDED.region,
                        vintage = EXCLUDED.vintage,
                        label_notes = EXCLUDED.label_notes,
                        notes = EXCLUDED.notes,
                        grapes = EXCLUDED.grapes,
                        description = EXCLUDED.description,
                        packaging_type = EXCLUDED.packaging_type,
                        closure_type = EXCLUDED.closure_type,
                        alcohol_percentage = EXCLUDED.alcohol_percentage,
                        acidity = EXCLUDED.acidity,
                        sugar = EXCLUDED.sugar,
                        energy = EXCLUDED.energy,
                        selection = EXCLUDED.selection,
                        ean = EXCLUDED.ean,
                        image_url = EXCLUDED.image_url,
                        updated_at = NOW()
                    "#,
                )
                .bind(&product.product_id)
                .bind(&product.name)
                .bind(&product.manufacturer)
                .bind(&product.bottle_size)
                .bind(product.price)
                .bind(product.price_per_liter)
                .bind(product.is_new)
                .bind(&product.price_order_code)
                .bind(&product.category)
                .bind(&product.sub_category)
                .bind(&product.special_group)
                .bind(&product.country)
                .bind(&product.region)
                .bind(&product.vintage)
                .bind(&product.label_notes)
                .bind(&product.notes)
                .bind(&product.grapes)
                .bind(&product.description)
                .bind(&product.packaging_type)
                .bind(&product.closure_type)
                .bind(product.alcohol_percentage)
                .bind(product.acidity)
                .bind(product.sugar)
                .bind(product.energy)
                .bind(&product.selection)
                .bind(&product.ean)
                .bind(&product.image_url)
                .execute(&mut *tx)
                .await?;
            }

            tx.commit().await?;

            debug!(
                chunk = index + 1,
                chunks = chunk_count,
                rows = chunk.len(),
                "Committed product chunk"
            );
        }

        info!(count = products.len(), "Upserted products");

        Ok(products.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_size_constant() {
        assert_eq!(BATCH_SIZE, 100);
    }

    #[test]
    fn test_chunk_partitioning() {
        let rows = vec![(); 250];
        let chunks: Vec<_> = rows.chunks(BATCH_SIZE).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 100);
        assert_eq!(chunks[2].len(), 50);
    }
}
