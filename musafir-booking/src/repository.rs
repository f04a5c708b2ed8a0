use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use musafir_core::StoreError;
use uuid::Uuid;

use crate::models::Booking;

/// Durable storage for booking records. No contract beyond durability;
/// bookings are never deleted, only saved with a new status.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn create(&self, booking: &Booking) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, StoreError>;

    /// The user's bookings, newest first.
    async fn find_for_user(&self, user_id: &str) -> Result<Vec<Booking>, StoreError>;

    async fn save(&self, booking: &Booking) -> Result<(), StoreError>;
}

/// In-memory booking store for tests and local runs.
pub struct MemoryBookingStore {
    bookings: Mutex<HashMap<Uuid, Booking>>,
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self {
            bookings: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryBookingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn create(&self, booking: &Booking) -> Result<(), StoreError> {
        let mut bookings = self.bookings.lock().unwrap_or_else(|e| e.into_inner());
        bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        let bookings = self.bookings.lock().unwrap_or_else(|e| e.into_inner());
        Ok(bookings.get(&id).cloned())
    }

    async fn find_for_user(&self, user_id: &str) -> Result<Vec<Booking>, StoreError> {
        let bookings = self.bookings.lock().unwrap_or_else(|e| e.into_inner());
        let mut found: Vec<Booking> = bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn save(&self, booking: &Booking) -> Result<(), StoreError> {
        let mut bookings = self.bookings.lock().unwrap_or_else(|e| e.into_inner());
        if !bookings.contains_key(&booking.id) {
            return Err(StoreError::NotFound);
        }
        bookings.insert(booking.id, booking.clone());
        Ok(())
    }
}
