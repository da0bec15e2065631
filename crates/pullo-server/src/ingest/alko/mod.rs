//! Alko price-list ingestion
//!
//! Alko publishes its full product price list as an Excel spreadsheet behind
//! a dynamic, bot-resistant web page. This module turns that file into
//! catalog rows:
//!
//! - Drive a headless browser to the page and capture the file download
//! - Decode the first worksheet into raw Finnish-keyed rows
//! - Normalize each row into a canonical [`models::Product`]
//! - Derive the category taxonomy observed in the data
//! - Upsert categories, then products, in batched transactions
//!
//! # Example
//! ```no_run
//! use pullo_server::ingest::alko::{AlkoPipeline, AlkoSourceConfig};
//!
//! # async fn example(db: sqlx::PgPool) {
//! let config = AlkoSourceConfig::from_env();
//! let pipeline = AlkoPipeline::new(config, db);
//! let outcome = pipeline.run("localhost").await;
//! println!("{}", outcome.details());
//! # }
//! ```

pub mod config;
pub mod decoder;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod retriever;
pub mod storage;
pub mod taxonomy;

// Re-export commonly used types
pub use config::AlkoSourceConfig;
pub use models::{Category, Product, RawRow};
pub use pipeline::{AlkoPipeline, IngestError, RunOutcome};
pub use retriever::RetrieveError;
pub use storage::AlkoStorage;
