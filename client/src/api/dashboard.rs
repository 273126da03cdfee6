//! Dashboard series and health endpoints

use serde::{Deserialize, Serialize};
use shared::{InventoryPoint, InventoryPointDto, ItemQuantityPoint, ItemQuantityPointDto};

use super::{ApiClient, RequestOptions};
use crate::error::ClientResult;

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
}

impl ApiClient {
    /// `GET /dashboard/total`
    pub async fn inventory_total_series(&self) -> ClientResult<Vec<InventoryPoint>> {
        let points: Vec<InventoryPointDto> = self
            .request("/dashboard/total", RequestOptions::get())
            .await?;
        Ok(points.into_iter().map(InventoryPoint::from).collect())
    }

    /// `GET /dashboard/items/{id}`
    pub async fn item_quantity_series(&self, id: i64) -> ClientResult<Vec<ItemQuantityPoint>> {
        let points: Vec<ItemQuantityPointDto> = self
            .request(&format!("/dashboard/items/{}", id), RequestOptions::get())
            .await?;
        Ok(points.into_iter().map(ItemQuantityPoint::from).collect())
    }

    /// `GET /health`
    pub async fn health(&self) -> ClientResult<HealthStatus> {
        self.request("/health", RequestOptions::get()).await
    }
}
