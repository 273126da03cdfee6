//! Services built on top of the inventory API

mod reporting;
mod store;

pub use reporting::{AbcCsvRow, ReportingService};
pub use store::InventoryStore;
