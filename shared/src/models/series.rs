//! Time series points for the dashboard charts

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Total inventory value right after a movement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryPoint {
    pub timestamp: DateTime<Utc>,
    pub total_value: Decimal,
}

/// Quantity of a single item right after one of its movements
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemQuantityPoint {
    pub timestamp: DateTime<Utc>,
    pub quantity: Decimal,
}
