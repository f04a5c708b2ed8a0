use async_trait::async_trait;
use chrono::NaiveDate;
use musafir_catalog::{
    CatalogItem, CatalogStore, Experience, Hotel, InventoryKey, ItemKind, RoomInventory,
    ScheduleEntry,
};
use musafir_core::StoreError;
use musafir_shared::money::Money;
use sqlx::PgPool;
use uuid::Uuid;

/// Postgres-backed catalog store. Inventory counters live in single rows,
/// so every mutation is one conditional UPDATE and concurrent decrements
/// serialize at the row without ever driving a counter negative.
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

#[derive(sqlx::FromRow)]
struct HotelRow {
    id: Uuid,
    name: String,
    city: Option<String>,
}

#[derive(sqlx::FromRow)]
struct RoomRow {
    room_type: String,
    price_amount: f64,
    currency: String,
    available: i32,
    total_rooms: i32,
}

#[derive(sqlx::FromRow)]
struct ExperienceRow {
    id: Uuid,
    title: String,
    price_amount: f64,
    currency: String,
    max_capacity: i32,
}

#[derive(sqlx::FromRow)]
struct ScheduleRow {
    date: NaiveDate,
    total_slots: i32,
    booked_slots: i32,
}

impl PgCatalogStore {
    async fn find_hotel(&self, id: Uuid) -> Result<Option<CatalogItem>, StoreError> {
        let row = sqlx::query_as::<_, HotelRow>("SELECT id, name, city FROM hotels WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;

        let Some(hotel) = row else {
            return Ok(None);
        };

        let rooms = sqlx::query_as::<_, RoomRow>(
            "SELECT room_type, price_amount, currency, available, total_rooms \
             FROM hotel_rooms WHERE hotel_id = $1 ORDER BY room_type",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(Some(CatalogItem::Hotel(Hotel {
            id: hotel.id,
            name: hotel.name,
            city: hotel.city,
            rooms: rooms
                .into_iter()
                .map(|r| RoomInventory {
                    room_type: r.room_type,
                    price: Money::new(r.price_amount, &r.currency),
                    available: r.available.max(0) as u32,
                    total: r.total_rooms.max(0) as u32,
                })
                .collect(),
        })))
    }

    async fn find_experience(&self, id: Uuid) -> Result<Option<CatalogItem>, StoreError> {
        let row = sqlx::query_as::<_, ExperienceRow>(
            "SELECT id, title, price_amount, currency, max_capacity FROM experiences WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        let Some(experience) = row else {
            return Ok(None);
        };

        let schedule = sqlx::query_as::<_, ScheduleRow>(
            "SELECT date, total_slots, booked_slots \
             FROM experience_schedule WHERE experience_id = $1 ORDER BY date",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(Some(CatalogItem::Experience(Experience {
            id: experience.id,
            title: experience.title,
            price: Money::new(experience.price_amount, &experience.currency),
            max_capacity: experience.max_capacity.max(0) as u32,
            schedule: schedule
                .into_iter()
                .map(|s| ScheduleEntry {
                    date: s.date,
                    total_slots: s.total_slots.max(0) as u32,
                    booked_slots: s.booked_slots.max(0) as u32,
                })
                .collect(),
        })))
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn find_item(&self, kind: ItemKind, id: Uuid) -> Result<Option<CatalogItem>, StoreError> {
        match kind {
            ItemKind::Hotel => self.find_hotel(id).await,
            ItemKind::Experience => self.find_experience(id).await,
        }
    }

    async fn adjust_inventory(
        &self,
        item_id: Uuid,
        key: &InventoryKey,
        delta: i64,
    ) -> Result<(), StoreError> {
        let units = delta.unsigned_abs().min(i32::MAX as u64) as i32;

        let result = match (key, delta < 0) {
            (InventoryKey::Room(room_type), true) => {
                sqlx::query(
                    "UPDATE hotel_rooms SET available = available - $3 \
                     WHERE hotel_id = $1 AND room_type = $2 AND available >= $3",
                )
                .bind(item_id)
                .bind(room_type)
                .bind(units)
                .execute(&self.pool)
                .await
            }
            (InventoryKey::Room(room_type), false) => {
                sqlx::query(
                    "UPDATE hotel_rooms SET available = available + $3 \
                     WHERE hotel_id = $1 AND room_type = $2",
                )
                .bind(item_id)
                .bind(room_type)
                .bind(units)
                .execute(&self.pool)
                .await
            }
            (InventoryKey::Slot(date), true) => {
                sqlx::query(
                    "UPDATE experience_schedule SET booked_slots = booked_slots + $3 \
                     WHERE experience_id = $1 AND date = $2 \
                     AND total_slots - booked_slots >= $3",
                )
                .bind(item_id)
                .bind(date)
                .bind(units)
                .execute(&self.pool)
                .await
            }
            (InventoryKey::Slot(date), false) => {
                sqlx::query(
                    "UPDATE experience_schedule \
                     SET booked_slots = GREATEST(booked_slots - $3, 0) \
                     WHERE experience_id = $1 AND date = $2",
                )
                .bind(item_id)
                .bind(date)
                .bind(units)
                .execute(&self.pool)
                .await
            }
        };

        let affected = result.map_err(backend)?.rows_affected();
        if affected == 0 {
            if delta < 0 {
                return Err(StoreError::InsufficientInventory {
                    key: key.to_string(),
                    requested: -delta,
                });
            }
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
