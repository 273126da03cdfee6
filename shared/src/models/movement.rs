//! Stock movement models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::validation::{validate_non_negative, validate_positive};

/// An immutable ledger entry recording a stock change for one item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: i64,
    pub item_id: i64,
    pub movement_type: MovementKind,
    pub quantity: Decimal,
    pub unit_price: Option<Decimal>,
    pub timestamp: DateTime<Utc>,
    pub quantity_after: Decimal,
    pub total_value_after: Decimal,
}

/// Kind of stock movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Opening balance recorded when the item is created
    Init,
    Entry,
    Exit,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Init => "init",
            MovementKind::Entry => "entry",
            MovementKind::Exit => "exit",
        }
    }

    /// Whether the movement adds stock. The opening balance counts as an entry.
    pub fn is_inbound(&self) -> bool {
        matches!(self, MovementKind::Init | MovementKind::Entry)
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovementKind::Init => write!(f, "Opening balance"),
            MovementKind::Entry => write!(f, "Entry"),
            MovementKind::Exit => write!(f, "Exit"),
        }
    }
}

impl std::str::FromStr for MovementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "init" => Ok(MovementKind::Init),
            "entry" => Ok(MovementKind::Entry),
            "exit" => Ok(MovementKind::Exit),
            other => Err(format!("unknown movement type: {}", other)),
        }
    }
}

/// Input for recording a movement
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovementInput {
    pub item_id: i64,
    #[validate(custom = "validate_submittable_kind")]
    pub movement_type: MovementKind,
    #[validate(custom = "validate_positive")]
    pub quantity: Decimal,
    /// Leave empty to keep the item's current price
    #[validate(custom = "validate_non_negative")]
    pub unit_price: Option<Decimal>,
}

/// Wire body for `POST /movements`
#[derive(Debug, Clone, Serialize)]
pub struct CreateMovementRequest {
    pub item_id: i64,
    pub movement_type: MovementKind,
    pub quantity: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,
}

impl From<&CreateMovementInput> for CreateMovementRequest {
    fn from(input: &CreateMovementInput) -> Self {
        Self {
            item_id: input.item_id,
            movement_type: input.movement_type,
            quantity: input.quantity,
            unit_price: input.unit_price,
        }
    }
}

/// Opening balances are written by the backend on item creation only
fn validate_submittable_kind(kind: &MovementKind) -> Result<(), ValidationError> {
    if *kind == MovementKind::Init {
        let mut error = ValidationError::new("movement_type");
        error.message = Some("movement type must be entry or exit".into());
        return Err(error);
    }
    Ok(())
}
