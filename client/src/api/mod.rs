//! Inventory backend API

mod dashboard;
mod http;
mod items;
mod movements;
mod retry;

pub use dashboard::HealthStatus;
pub use http::{error_message, ApiClient, RequestOptions};
pub use retry::RetryPolicy;
