//! Domain models for the inventory client

pub mod dto;
mod inventory;
mod movement;
mod series;

pub use dto::{
    normalize_inventory_point, normalize_item, normalize_item_quantity_point, normalize_movement,
    InventoryPointDto, ItemDto, ItemQuantityPointDto, MovementDto,
};
pub use inventory::*;
pub use movement::*;
pub use series::*;
