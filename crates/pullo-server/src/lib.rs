//! Pullo Server Library
//!
//! Backend for a trivia game over the Alko product catalog.
//!
//! # Overview
//!
//! The server has two halves:
//!
//! - **Ingestion** (`ingest::alko`): a pipeline that downloads Alko's
//!   price-list spreadsheet through a headless browser, normalizes the rows
//!   into canonical products, derives a category taxonomy, and upserts
//!   everything into PostgreSQL in batched transactions. Triggered by an
//!   external scheduler through a shared-secret HTTP endpoint.
//! - **Catalog API** (`api::catalog`): read-only product/category queries
//!   consumed by the game frontend. Upserted rows are visible to these reads
//!   as soon as their batch transaction commits.
//!
//! Every ingestion run appends one row to the `ingestion_runs` audit table,
//! success or failure.
//!
//! ## Framework Stack
//!
//! - **Axum**: HTTP routing and extraction
//! - **SQLx**: PostgreSQL access and migrations
//! - **headless_chrome + calamine**: price-list retrieval and decoding

use std::sync::Arc;

pub mod api;
pub mod audit;
pub mod config;
pub mod error;
pub mod ingest;
pub mod middleware;

pub use error::{AppError, ServerResult};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<config::Config>,
}
