//! Item endpoints

use shared::{CreateItemInput, CreateItemRequest, Item, ItemDto};
use validator::Validate;

use super::{ApiClient, RequestOptions};
use crate::error::ClientResult;

impl ApiClient {
    /// `GET /items`
    pub async fn list_items(&self) -> ClientResult<Vec<Item>> {
        let items: Vec<ItemDto> = self.request("/items", RequestOptions::get()).await?;
        Ok(items.into_iter().map(Item::from).collect())
    }

    /// `GET /items/{id}`
    pub async fn get_item(&self, id: i64) -> ClientResult<Item> {
        let item: ItemDto = self
            .request(&format!("/items/{}", id), RequestOptions::get())
            .await?;
        Ok(item.into())
    }

    /// `GET /items/search?term=`
    pub async fn search_items(&self, term: &str) -> ClientResult<Vec<Item>> {
        let items: Vec<ItemDto> = self
            .request("/items/search", RequestOptions::get().query("term", term))
            .await?;
        Ok(items.into_iter().map(Item::from).collect())
    }

    /// `POST /items`
    pub async fn create_item(&self, input: &CreateItemInput) -> ClientResult<Item> {
        input.validate()?;

        let body = CreateItemRequest::from(input);
        let item: ItemDto = self.request("/items", RequestOptions::post(&body)?).await?;
        tracing::info!(item_id = item.id, name = %item.name, "Item created");
        Ok(item.into())
    }

    /// `DELETE /items/{id}`
    pub async fn delete_item(&self, id: i64) -> ClientResult<()> {
        self.send(&format!("/items/{}", id), RequestOptions::delete())
            .await?;
        tracing::info!(item_id = id, "Item deleted");
        Ok(())
    }
}
