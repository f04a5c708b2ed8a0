use async_trait::async_trait;
use musafir_core::StoreError;
use uuid::Uuid;

use crate::inventory::InventoryKey;
use crate::item::{CatalogItem, ItemKind};

/// Storage capability for catalog items and their shared inventory.
///
/// `adjust_inventory` is the only write path for inventory counters and
/// must be atomic with respect to concurrent callers: a decrement applies
/// only if the counter stays non-negative, otherwise the call fails with
/// [`StoreError::InsufficientInventory`] and nothing changes. Implementors
/// must express this as a single conditional update, never as a
/// read-modify-write pair.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_item(&self, kind: ItemKind, id: Uuid) -> Result<Option<CatalogItem>, StoreError>;

    async fn adjust_inventory(
        &self,
        item_id: Uuid,
        key: &InventoryKey,
        delta: i64,
    ) -> Result<(), StoreError>;
}
