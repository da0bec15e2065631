//! Shared infrastructure for Pullo components
//!
//! This crate carries the pieces both the server and the CLI need:
//!
//! - **logging**: tracing subscriber setup (console/file targets, text/JSON
//!   formats, daily rotation, environment overrides)
//! - **error**: the shared [`PulloError`] type

pub mod error;
pub mod logging;

pub use error::{PulloError, Result};
