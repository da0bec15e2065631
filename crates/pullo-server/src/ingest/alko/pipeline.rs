//! Alko ingestion pipeline
//!
//! Drives one full run: retrieve the price-list file, decode it, normalize
//! and filter the rows, derive the category taxonomy, and upsert categories
//! then products. A run is strictly linear and one-shot; retry is the
//! external scheduler's concern.
//!
//! [`AlkoPipeline::run`] never returns an error. Every failure is caught,
//! logged, recorded in the `ingestion_runs` audit table, and surfaced as a
//! [`RunOutcome`] with `success = false`.

use sqlx::PgPool;
use thiserror::Error;
use tracing::{error, info, warn};

use super::config::AlkoSourceConfig;
use super::decoder::decode_price_list;
use super::models::{Product, RawRow};
use super::normalizer::normalize;
use super::retriever::{fetch_price_list, RetrieveError};
use super::storage::AlkoStorage;
use super::taxonomy::derive_categories;
use crate::audit;

/// Integration name recorded in the audit trail
pub const INTEGRATION_NAME: &str = "Alko Products Update";

/// Failures that abort an ingestion run
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Retrieval failed: {0}")]
    Retrieve(#[from] RetrieveError),

    #[error("Failed to decode price list: {0}")]
    Decode(anyhow::Error),

    #[error("Database error: {0}")]
    Persist(#[from] sqlx::Error),
}

/// Structured summary of one pipeline run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub success: bool,
    pub products_processed: usize,
    pub error: Option<String>,
}

impl RunOutcome {
    fn succeeded(products_processed: usize) -> Self {
        Self {
            success: true,
            products_processed,
            error: None,
        }
    }

    fn failed(error: &IngestError) -> Self {
        Self {
            success: false,
            products_processed: 0,
            error: Some(error.to_string()),
        }
    }

    /// Human-readable detail string, as recorded in the audit trail
    pub fn details(&self) -> String {
        match &self.error {
            None => format!(
                "{} products processed from Alko data.",
                self.products_processed
            ),
            Some(error) => format!("Error: {}", error),
        }
    }
}

/// One-shot ingestion pipeline for the Alko price list
pub struct AlkoPipeline {
    config: AlkoSourceConfig,
    db: PgPool,
}

impl AlkoPipeline {
    pub fn new(config: AlkoSourceConfig, db: PgPool) -> Self {
        Self { config, db }
    }

    /// Run the full pipeline and record the outcome.
    ///
    /// `domain` names where the run was triggered from (request hostname,
    /// "cli", ...) and ends up in the audit row.
    pub async fn run(&self, domain: &str) -> RunOutcome {
        info!("Starting Alko price-list ingestion");

        let outcome = match self.run_inner().await {
            Ok(count) => RunOutcome::succeeded(count),
            Err(e) => {
                error!(error = %e, "Alko ingestion failed");
                RunOutcome::failed(&e)
            },
        };

        // The audit row is best-effort: a failure to record must not turn a
        // completed ingestion into a failed one.
        if let Err(e) = audit::record_run(
            &self.db,
            INTEGRATION_NAME,
            &outcome.details(),
            outcome.success,
            domain,
        )
        .await
        {
            error!(error = %e, "Failed to record ingestion run");
        }

        info!(
            success = outcome.success,
            products = outcome.products_processed,
            "Alko ingestion finished"
        );

        outcome
    }

    async fn run_inner(&self) -> Result<usize, IngestError> {
        self.config
            .validate()
            .map_err(IngestError::Config)?;

        info!("Phase 1: Retrieving price-list file");
        let bytes = fetch_price_list(&self.config).await?;

        info!("Phase 2: Decoding spreadsheet");
        let rows = decode_price_list(&bytes).map_err(IngestError::Decode)?;
        info!(rows = rows.len(), "Decoded price-list rows");

        info!("Phase 3: Normalizing rows");
        let products = valid_products(&rows);

        info!("Phase 4: Deriving category taxonomy");
        let categories = derive_categories(&products);
        info!(categories = categories.len(), "Derived categories");

        info!("Phase 5: Upserting categories and products");
        let storage = AlkoStorage::new(self.db.clone());
        storage.upsert_categories(&categories).await?;
        let count = storage.upsert_products(&products).await?;

        Ok(count)
    }
}

/// Normalize every row and keep the ones with the minimum identity the
/// catalog requires. Rows missing a product number or name are skipped,
/// not fatal.
fn valid_products(rows: &[RawRow]) -> Vec<Product> {
    let mut products = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;

    for row in rows {
        let product = normalize(row);
        if product.is_valid() {
            products.push(product);
        } else {
            skipped += 1;
        }
    }

    if skipped > 0 {
        warn!(
            skipped,
            kept = products.len(),
            "Skipped rows without a product number or name"
        );
    }

    products
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
    fn test_valid_products_filters_incomplete_rows() {
        let rows = vec![
            row(&[("Numero", "906458"), ("Nimi", "Koskenkorva Viina")]),
            row(&[("Numero", "123")]),
            row(&[("Nimi", "Nimetön tuote")]),
            row(&[]),
        ];

        let products = valid_products(&rows);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].product_id, "906458");
    }

    #[test]
    fn test_valid_products_keeps_rows_with_zero_price() {
        let rows = vec![row(&[
            ("Numero", "1"),
            ("Nimi", "Hinnaton"),
            ("Hinta", "ei saatavilla"),
        ])];

        let products = valid_products(&rows);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].price, 0.0);
    }

    #[test]
    fn test_outcome_details_success() {
        let outcome = RunOutcome::succeeded(1234);
        assert!(outcome.success);
        assert_eq!(outcome.details(), "1234 products processed from Alko data.");
    }

    #[test]
    fn test_outcome_details_failure() {
        let outcome =
            RunOutcome::failed(&IngestError::Config("ALKO_PRODUCTS_URL is not defined".into()));
        assert!(!outcome.success);
        assert_eq!(outcome.products_processed, 0);
        assert_eq!(
            outcome.details(),
            "Error: Configuration error: ALKO_PRODUCTS_URL is not defined"
        );
    }
}
