pub mod availability;
pub mod inventory;
pub mod item;
pub mod pricing;
pub mod repository;

pub use inventory::{InventoryKey, MemoryCatalog};
pub use item::{
    CatalogItem, Experience, GuestCount, Hotel, ItemKind, RoomInventory, RoomSelection,
    ScheduleEntry,
};
pub use repository::CatalogStore;
