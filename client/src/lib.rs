//! Inventory MRP client
//!
//! Typed access to the inventory backend, a query cache with invalidation
//! after mutations, and the reporting views built from the item list.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod services;

pub use api::{ApiClient, RequestOptions, RetryPolicy};
pub use cache::{QueryCache, QueryKey};
pub use config::Config;
pub use error::{ClientError, ClientResult};
pub use services::{InventoryStore, ReportingService};
