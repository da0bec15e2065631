//! Catalog ingestion
//!
//! One integration lives here today: the Alko price list. Each integration
//! owns its retrieval, decoding, normalization, and storage under its own
//! submodule and exposes a pipeline type that drives a full run.

pub mod alko;

pub use alko::{AlkoPipeline, AlkoSourceConfig, RunOutcome};
