use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Published when a booking is created and its inventory is held.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreatedEvent {
    pub booking_id: Uuid,
    pub user_email: String,
    pub item_type: String,
    pub item_id: Uuid,
    pub total: f64,
    pub currency: String,
    pub timestamp: i64,
}

/// Published when a booking is cancelled and its inventory released.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCancelledEvent {
    pub booking_id: Uuid,
    pub user_email: String,
    pub refund_amount: f64,
    pub reason: Option<String>,
    pub timestamp: i64,
}
