//! Inventory keys and the single conditional mutation applied to them.
//!
//! A decrement only applies if the counter stays non-negative; a failed
//! decrement changes nothing, which is what makes retries safe. Persistent
//! stores express the same rule as one guarded update statement.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use musafir_core::StoreError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item::{CatalogItem, ItemKind};
use crate::repository::CatalogStore;

/// The sub-resource within a catalog item that a booking holds units of:
/// a room type for hotels, a calendar date for experiences.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InventoryKey {
    Room(String),
    Slot(NaiveDate),
}

impl InventoryKey {
    pub fn room(room_type: &str) -> Self {
        InventoryKey::Room(room_type.to_string())
    }

    pub fn slot(date: NaiveDate) -> Self {
        InventoryKey::Slot(date)
    }
}

impl fmt::Display for InventoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryKey::Room(room_type) => write!(f, "room:{room_type}"),
            InventoryKey::Slot(date) => write!(f, "slot:{date}"),
        }
    }
}

/// Apply a signed availability delta to an item in place.
///
/// Negative deltas consume inventory and are conditional: the counter must
/// stay non-negative or the call fails without touching anything. Positive
/// deltas release previously held units.
pub fn adjust(item: &mut CatalogItem, key: &InventoryKey, delta: i64) -> Result<(), StoreError> {
    match (item, key) {
        (CatalogItem::Hotel(hotel), InventoryKey::Room(room_type)) => {
            let room = hotel
                .rooms
                .iter_mut()
                .find(|r| r.room_type == *room_type)
                .ok_or(StoreError::NotFound)?;

            let updated = i64::from(room.available) + delta;
            if updated < 0 {
                return Err(StoreError::InsufficientInventory {
                    key: key.to_string(),
                    requested: -delta,
                });
            }
            room.available = updated as u32;
            Ok(())
        }
        (CatalogItem::Experience(experience), InventoryKey::Slot(date)) => {
            let entry = experience
                .schedule
                .iter_mut()
                .find(|s| s.date == *date)
                .ok_or(StoreError::NotFound)?;

            if delta < 0 {
                let units = (-delta) as u32;
                if entry.spots() < units {
                    return Err(StoreError::InsufficientInventory {
                        key: key.to_string(),
                        requested: -delta,
                    });
                }
                entry.booked_slots += units;
            } else {
                entry.booked_slots = entry.booked_slots.saturating_sub(delta as u32);
            }
            Ok(())
        }
        _ => Err(StoreError::NotFound),
    }
}

/// In-memory catalog store. Used by the test suites and local runs;
/// production wires the Postgres-backed store instead. Mutations happen
/// under one lock, which gives the same atomicity the persistent store
/// gets from conditional updates.
pub struct MemoryCatalog {
    items: Mutex<HashMap<Uuid, CatalogItem>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
        }
    }

    pub fn insert(&self, item: CatalogItem) {
        let mut items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        items.insert(item.id(), item);
    }
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn find_item(&self, kind: ItemKind, id: Uuid) -> Result<Option<CatalogItem>, StoreError> {
        let items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        Ok(items.get(&id).filter(|item| item.kind() == kind).cloned())
    }

    async fn adjust_inventory(
        &self,
        item_id: Uuid,
        key: &InventoryKey,
        delta: i64,
    ) -> Result<(), StoreError> {
        let mut items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        let item = items.get_mut(&item_id).ok_or(StoreError::NotFound)?;
        adjust(item, key, delta)
    }
}
