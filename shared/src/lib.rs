//! Shared types and computations for the Inventory MRP client
//!
//! This crate contains the view models, the wire-format normalizer and the
//! reporting aggregations used by the native client and the front end (via
//! WASM).

pub mod aggregation;
pub mod models;
pub mod reports;
pub mod validation;

pub use aggregation::*;
pub use models::*;
pub use reports::*;
pub use validation::*;
