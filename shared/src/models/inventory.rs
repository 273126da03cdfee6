//! Inventory item models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{validate_non_negative, validate_not_blank};

/// A stock-keeping unit as shown to the presentation layer
///
/// `total_value` and `low_stock` come from the backend and are never
/// recomputed here, so aggregated figures match the backend's rounding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total_value: Decimal,
    pub low_stock: bool,
}

/// Input for creating an item
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemInput {
    #[validate(custom = "validate_not_blank")]
    pub name: String,
    #[validate(custom = "validate_not_blank")]
    pub category: String,
    #[validate(custom = "validate_not_blank")]
    pub unit: String,
    #[validate(custom = "validate_non_negative")]
    pub quantity: Decimal,
    #[validate(custom = "validate_non_negative")]
    pub unit_price: Decimal,
}

/// Wire body for `POST /items`
#[derive(Debug, Clone, Serialize)]
pub struct CreateItemRequest {
    pub name: String,
    pub category: String,
    pub unit: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

impl From<&CreateItemInput> for CreateItemRequest {
    fn from(input: &CreateItemInput) -> Self {
        Self {
            name: input.name.trim().to_string(),
            category: input.category.trim().to_string(),
            unit: input.unit.trim().to_string(),
            quantity: input.quantity,
            unit_price: input.unit_price,
        }
    }
}
