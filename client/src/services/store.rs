//! Cached access to the inventory backend
//!
//! Reads are served from the [`QueryCache`] while fresh and fetched
//! otherwise. Mutations never patch cached data; they invalidate the queries
//! that depend on them so the next read goes back to the backend.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Mutex;

use shared::{
    CreateItemInput, CreateMovementInput, InventoryPoint, Item, ItemQuantityPoint, Movement,
};

use crate::api::{ApiClient, RetryPolicy};
use crate::cache::{Cacheable, QueryCache, QueryKey};
use crate::error::{ClientError, ClientResult};

/// Refetches allowed when a response keeps arriving after an invalidation
const MAX_OUTDATED_REFETCHES: usize = 3;

pub struct InventoryStore {
    api: ApiClient,
    cache: QueryCache,
    list_retry: RetryPolicy,
    movements_limit: Option<u32>,
    deleting: Mutex<HashSet<i64>>,
}

/// Clears the in-flight delete marker however the delete ends
struct DeletingGuard<'a> {
    deleting: &'a Mutex<HashSet<i64>>,
    id: i64,
}

impl Drop for DeletingGuard<'_> {
    fn drop(&mut self) {
        self.deleting
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&self.id);
    }
}

impl InventoryStore {
    pub fn new(api: ApiClient, list_retry: RetryPolicy) -> Self {
        Self {
            api,
            cache: QueryCache::new(),
            list_retry,
            movements_limit: None,
            deleting: Mutex::new(HashSet::new()),
        }
    }

    /// Cap the number of movements fetched per item
    pub fn with_movements_limit(mut self, limit: u32) -> Self {
        self.movements_limit = Some(limit);
        self
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub async fn items(&self) -> ClientResult<Vec<Item>> {
        if let Some(items) = self.cache.get(&QueryKey::Items) {
            return Ok(items);
        }
        self.refresh_items().await
    }

    /// Fetch the item list even if a fresh copy is cached
    pub async fn refresh_items(&self) -> ClientResult<Vec<Item>> {
        let policy = self.list_retry;
        self.fetch(QueryKey::Items, move || {
            policy.run("list items", move || self.api.list_items())
        })
        .await
    }

    /// Single-item reads do not retry
    pub async fn item(&self, id: i64) -> ClientResult<Item> {
        let key = QueryKey::Item(id);
        if let Some(item) = self.cache.get(&key) {
            return Ok(item);
        }
        self.fetch(key, move || self.api.get_item(id)).await
    }

    pub async fn movements(&self, item_id: i64) -> ClientResult<Vec<Movement>> {
        let key = QueryKey::Movements(item_id);
        if let Some(movements) = self.cache.get(&key) {
            return Ok(movements);
        }
        let policy = self.list_retry;
        let limit = self.movements_limit;
        self.fetch(key, move || {
            policy.run("list movements", move || self.api.list_movements(item_id, limit))
        })
        .await
    }

    /// Item and its movements, fetched concurrently
    pub async fn product_detail(&self, id: i64) -> (ClientResult<Item>, ClientResult<Vec<Movement>>) {
        tokio::join!(self.item(id), self.movements(id))
    }

    pub async fn inventory_series(&self) -> ClientResult<Vec<InventoryPoint>> {
        if let Some(points) = self.cache.get(&QueryKey::InventorySeries) {
            return Ok(points);
        }
        let policy = self.list_retry.with_max_retries(1);
        self.fetch(QueryKey::InventorySeries, move || {
            policy.run("inventory series", move || self.api.inventory_total_series())
        })
        .await
    }

    pub async fn item_series(&self, id: i64) -> ClientResult<Vec<ItemQuantityPoint>> {
        let key = QueryKey::ItemSeries(id);
        if let Some(points) = self.cache.get(&key) {
            return Ok(points);
        }
        let policy = self.list_retry.with_max_retries(1);
        self.fetch(key, move || {
            policy.run("item series", move || self.api.item_quantity_series(id))
        })
        .await
    }

    /// Run `fetch` under a ticket for `key` and cache the result.
    ///
    /// A result that was outdated by an invalidation while in flight is not
    /// cached; the fetch is repeated so the caller sees post-mutation data.
    /// Outdated results are never returned, even once the refetches run out.
    async fn fetch<T, F, Fut>(&self, key: QueryKey, fetch: F) -> ClientResult<T>
    where
        T: Cacheable,
        F: Fn() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        let mut refetches = 0;
        loop {
            let ticket = self.cache.begin_fetch(key);
            let value = fetch().await?;
            if self.cache.complete_fetch(ticket, value.clone()) {
                return Ok(value);
            }

            refetches += 1;
            if refetches > MAX_OUTDATED_REFETCHES {
                tracing::warn!(?key, "Query kept being invalidated while in flight");
                return Err(ClientError::Outdated);
            }
            tracing::debug!(?key, refetches, "Refetching outdated query");
        }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    pub async fn create_item(&self, input: &CreateItemInput) -> ClientResult<Item> {
        let item = self.api.create_item(input).await?;
        self.cache.invalidate(QueryKey::Items);
        self.cache.invalidate(QueryKey::InventorySeries);
        Ok(item)
    }

    pub async fn delete_item(&self, id: i64) -> ClientResult<()> {
        let _guard = self.mark_deleting(id);

        self.api.delete_item(id).await?;

        self.cache.invalidate(QueryKey::Items);
        self.cache.invalidate(QueryKey::InventorySeries);
        self.cache.remove(QueryKey::Item(id));
        self.cache.remove(QueryKey::Movements(id));
        self.cache.remove(QueryKey::ItemSeries(id));
        Ok(())
    }

    pub async fn create_movement(&self, input: &CreateMovementInput) -> ClientResult<Movement> {
        let movement = self.api.create_movement(input).await?;

        self.cache.invalidate(QueryKey::Items);
        self.cache.invalidate(QueryKey::Item(input.item_id));
        self.cache.invalidate(QueryKey::Movements(input.item_id));
        self.cache.invalidate(QueryKey::ItemSeries(input.item_id));
        self.cache.invalidate(QueryKey::InventorySeries);
        Ok(movement)
    }

    /// Whether a delete of `id` is in flight
    pub fn is_deleting(&self, id: i64) -> bool {
        self.deleting
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(&id)
    }

    fn mark_deleting(&self, id: i64) -> DeletingGuard<'_> {
        self.deleting
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(id);
        DeletingGuard {
            deleting: &self.deleting,
            id,
        }
    }
}
