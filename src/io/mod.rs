//! Input/output helpers.
//!
//! - survey CSV ingest + type coercion (`ingest`)

pub mod ingest;

pub use ingest::*;
