use std::fmt;

use chrono::{DateTime, Utc};
use musafir_catalog::{GuestCount, InventoryKey, ItemKind, RoomSelection};
use musafir_core::BookingError;
use musafir_shared::money::Amount;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle states for a booking. `Cancelled` and `Completed` are
/// terminal; a booking is never deleted, only transitioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        };
        write!(f, "{label}")
    }
}

/// Payment state, tracked independently of the booking lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
    Failed,
}

/// Recorded once a booking is cancelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cancellation {
    pub date: DateTime<Utc>,
    pub reason: Option<String>,
    pub refund_amount: f64,
}

/// A reservation of inventory units by a user, carrying a computed price
/// and two status axes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: String,
    #[serde(rename = "type")]
    pub item_type: ItemKind,
    pub item_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub guests: GuestCount,
    #[serde(default)]
    pub rooms: Vec<RoomSelection>,
    pub amount: Amount,
    pub payment_status: PaymentStatus,
    pub booking_status: BookingStatus,
    pub cancellation: Option<Cancellation>,
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Build a booking from a validated request and its computed amount.
    /// The explicit factory: the price is always derived here, never taken
    /// from the caller, and new bookings always start `pending`.
    pub fn from_request(request: &CreateBookingRequest, user_id: &str, amount: Amount) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            item_type: request.item_type,
            item_id: request.item_id,
            start_date: request.start_date,
            end_date: request.end_date,
            guests: request.guests,
            rooms: request.rooms.clone(),
            amount,
            payment_status: PaymentStatus::Pending,
            booking_status: BookingStatus::Pending,
            cancellation: None,
            special_requests: request.special_requests.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Inventory keys and unit counts this booking holds: one per room
    /// line for hotels, one dated slot entry for experiences.
    pub fn inventory_holds(&self) -> Vec<(InventoryKey, i64)> {
        match self.item_type {
            ItemKind::Hotel => self
                .rooms
                .iter()
                .map(|r| (InventoryKey::room(&r.room_type), i64::from(r.quantity)))
                .collect(),
            ItemKind::Experience => vec![(
                InventoryKey::slot(self.start_date.date_naive()),
                i64::from(self.guests.total()),
            )],
        }
    }
}

/// Client payload for `POST /bookings`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    #[serde(rename = "type")]
    pub item_type: ItemKind,
    pub item_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub guests: GuestCount,
    #[serde(default)]
    pub rooms: Vec<RoomSelection>,
    pub special_requests: Option<String>,
}

impl CreateBookingRequest {
    /// Structural validation before any store is consulted.
    pub fn validate(&self) -> Result<(), BookingError> {
        if self.guests.adults < 1 {
            return Err(BookingError::Validation(
                "at least one adult is required".to_string(),
            ));
        }

        if self.item_type == ItemKind::Hotel {
            if self.end_date.is_none() {
                return Err(BookingError::Validation(
                    "end_date is required for hotel bookings".to_string(),
                ));
            }
            if self.rooms.is_empty() {
                return Err(BookingError::Validation(
                    "at least one room must be selected".to_string(),
                ));
            }
            if self.rooms.iter().any(|r| r.quantity == 0) {
                return Err(BookingError::Validation(
                    "room quantity must be at least 1".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// The owner-mutable subset of a booking. Everything else is managed by
/// the lifecycle manager.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingPatch {
    pub special_requests: Option<String>,
}
