//! Query cache keyed by request signature
//!
//! Each key carries an epoch that moves forward on every invalidation or
//! removal. A fetch remembers the epoch it started under and may only write
//! its result back if the epoch is unchanged, so a response that was already
//! in flight when a mutation succeeded can never overwrite the refreshed view.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use shared::{InventoryPoint, Item, ItemQuantityPoint, Movement};

/// Request signature of a cached read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Items,
    Item(i64),
    Movements(i64),
    InventorySeries,
    ItemSeries(i64),
}

/// Decoded result of a read
#[derive(Debug, Clone, PartialEq)]
pub enum QueryData {
    Items(Vec<Item>),
    Item(Item),
    Movements(Vec<Movement>),
    InventorySeries(Vec<InventoryPoint>),
    ItemSeries(Vec<ItemQuantityPoint>),
}

/// Conversion between a typed value and its cache slot
pub trait Cacheable: Clone + Sized {
    fn into_data(self) -> QueryData;
    fn from_data(data: QueryData) -> Option<Self>;
}

macro_rules! cacheable {
    ($ty:ty, $variant:ident) => {
        impl Cacheable for $ty {
            fn into_data(self) -> QueryData {
                QueryData::$variant(self)
            }

            fn from_data(data: QueryData) -> Option<Self> {
                match data {
                    QueryData::$variant(value) => Some(value),
                    _ => None,
                }
            }
        }
    };
}

cacheable!(Vec<Item>, Items);
cacheable!(Item, Item);
cacheable!(Vec<Movement>, Movements);
cacheable!(Vec<InventoryPoint>, InventorySeries);
cacheable!(Vec<ItemQuantityPoint>, ItemSeries);

/// Proof that a fetch started under a given epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    key: QueryKey,
    epoch: u64,
}

#[derive(Debug)]
struct Entry {
    data: QueryData,
    stale: bool,
}

#[derive(Debug, Default)]
struct State {
    entries: HashMap<QueryKey, Entry>,
    // Never removed, so removal cannot reset a key's epoch
    epochs: HashMap<QueryKey, u64>,
}

impl State {
    fn epoch(&self, key: &QueryKey) -> u64 {
        self.epochs.get(key).copied().unwrap_or(0)
    }

    fn bump(&mut self, key: QueryKey) {
        *self.epochs.entry(key).or_insert(0) += 1;
    }
}

#[derive(Debug, Default)]
pub struct QueryCache {
    state: Mutex<State>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Fresh value for `key`
    pub fn get<T: Cacheable>(&self, key: &QueryKey) -> Option<T> {
        let state = self.lock();
        state
            .entries
            .get(key)
            .filter(|entry| !entry.stale)
            .and_then(|entry| T::from_data(entry.data.clone()))
    }

    /// Last known value for `key`, fresh or stale
    pub fn peek<T: Cacheable>(&self, key: &QueryKey) -> Option<T> {
        let state = self.lock();
        state
            .entries
            .get(key)
            .and_then(|entry| T::from_data(entry.data.clone()))
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.lock().entries.contains_key(key)
    }

    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.lock()
            .entries
            .get(key)
            .map(|entry| entry.stale)
            .unwrap_or(false)
    }

    pub fn begin_fetch(&self, key: QueryKey) -> FetchTicket {
        let state = self.lock();
        FetchTicket {
            key,
            epoch: state.epoch(&key),
        }
    }

    /// Store a fetched value. Returns `false`, leaving the cache untouched,
    /// when the key was invalidated or removed after the ticket was issued.
    pub fn complete_fetch<T: Cacheable>(&self, ticket: FetchTicket, value: T) -> bool {
        let mut state = self.lock();
        if state.epoch(&ticket.key) != ticket.epoch {
            tracing::debug!(key = ?ticket.key, "Discarding response of an outdated fetch");
            return false;
        }

        state.entries.insert(
            ticket.key,
            Entry {
                data: value.into_data(),
                stale: false,
            },
        );
        true
    }

    /// Mark `key` stale and outdate every fetch in flight for it
    pub fn invalidate(&self, key: QueryKey) {
        let mut state = self.lock();
        state.bump(key);
        if let Some(entry) = state.entries.get_mut(&key) {
            entry.stale = true;
        }
        tracing::debug!(?key, "Query invalidated");
    }

    /// Drop `key` and outdate every fetch in flight for it
    pub fn remove(&self, key: QueryKey) {
        let mut state = self.lock();
        state.bump(key);
        state.entries.remove(&key);
        tracing::debug!(?key, "Query removed");
    }
}
