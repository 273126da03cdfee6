//! Wire-format records as sent by the inventory backend
//!
//! Field names follow the backend's snake_case convention. Normalization into
//! the view models is a straight rename: no validation and no unit conversion.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{InventoryPoint, Item, ItemQuantityPoint, Movement, MovementKind};

/// Item record (`GET /items`, `GET /items/{id}`, `POST /items`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemDto {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total_value: Decimal,
    pub low_stock: bool,
}

/// Movement record (`GET /movements`, `POST /movements`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovementDto {
    pub id: i64,
    pub item_id: i64,
    pub movement_type: MovementKind,
    pub quantity: Decimal,
    #[serde(default)]
    pub unit_price: Option<Decimal>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
    pub quantity_after: Decimal,
    pub total_value_after: Decimal,
}

/// Point of `GET /dashboard/total`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryPointDto {
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
    pub total_value: Decimal,
}

/// Point of `GET /dashboard/items/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemQuantityPointDto {
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
    pub quantity: Decimal,
}

pub fn normalize_item(dto: ItemDto) -> Item {
    Item {
        id: dto.id,
        name: dto.name,
        category: dto.category,
        unit: dto.unit,
        quantity: dto.quantity,
        unit_price: dto.unit_price,
        total_value: dto.total_value,
        low_stock: dto.low_stock,
    }
}

pub fn normalize_movement(dto: MovementDto) -> Movement {
    Movement {
        id: dto.id,
        item_id: dto.item_id,
        movement_type: dto.movement_type,
        quantity: dto.quantity,
        unit_price: dto.unit_price,
        timestamp: dto.timestamp,
        quantity_after: dto.quantity_after,
        total_value_after: dto.total_value_after,
    }
}

pub fn normalize_inventory_point(dto: InventoryPointDto) -> InventoryPoint {
    InventoryPoint {
        timestamp: dto.timestamp,
        total_value: dto.total_value,
    }
}

pub fn normalize_item_quantity_point(dto: ItemQuantityPointDto) -> ItemQuantityPoint {
    ItemQuantityPoint {
        timestamp: dto.timestamp,
        quantity: dto.quantity,
    }
}

impl From<ItemDto> for Item {
    fn from(dto: ItemDto) -> Self {
        normalize_item(dto)
    }
}

impl From<MovementDto> for Movement {
    fn from(dto: MovementDto) -> Self {
        normalize_movement(dto)
    }
}

impl From<InventoryPointDto> for InventoryPoint {
    fn from(dto: InventoryPointDto) -> Self {
        normalize_inventory_point(dto)
    }
}

impl From<ItemQuantityPointDto> for ItemQuantityPoint {
    fn from(dto: ItemQuantityPointDto) -> Self {
        normalize_item_quantity_point(dto)
    }
}

/// ISO-8601 timestamps, with or without an offset. Naive values are UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw)))
    }
}
