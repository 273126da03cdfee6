//! Stock movement endpoints

use shared::{CreateMovementInput, CreateMovementRequest, Movement, MovementDto};
use validator::Validate;

use super::{ApiClient, RequestOptions};
use crate::error::ClientResult;

impl ApiClient {
    /// `POST /movements`
    pub async fn create_movement(&self, input: &CreateMovementInput) -> ClientResult<Movement> {
        input.validate()?;

        let body = CreateMovementRequest::from(input);
        let movement: MovementDto = self
            .request("/movements", RequestOptions::post(&body)?)
            .await?;
        tracing::info!(
            item_id = movement.item_id,
            movement_type = movement.movement_type.as_str(),
            quantity = %movement.quantity,
            "Movement recorded"
        );
        Ok(movement.into())
    }

    /// `GET /movements?item_id=&limit=`
    pub async fn list_movements(&self, item_id: i64, limit: Option<u32>) -> ClientResult<Vec<Movement>> {
        let mut options = RequestOptions::get().query("item_id", item_id);
        if let Some(limit) = limit {
            options = options.query("limit", limit);
        }

        let movements: Vec<MovementDto> = self.request("/movements", options).await?;
        Ok(movements.into_iter().map(Movement::from).collect())
    }
}
