use thiserror::Error;

/// Failures surfaced by the storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A conditional decrement could not be applied without the counter
    /// going negative.
    #[error("insufficient inventory for {key}: requested {requested}")]
    InsufficientInventory { key: String, requested: i64 },

    #[error("record not found")]
    NotFound,

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Failure while dispatching a notification. Logged and swallowed by the
/// booking core, never surfaced to callers.
#[derive(Debug, Error)]
#[error("notification dispatch failed: {0}")]
pub struct NotifyError(pub String);

/// Domain error taxonomy for the booking core. Every variant maps to a
/// client-visible response at the request boundary; `Store` maps to a
/// generic server error.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Item not found")]
    ItemNotFound,

    #[error("Booking not found")]
    BookingNotFound,

    #[error("Not authorized")]
    Forbidden,

    #[error("Room type {room_type} is not available in requested quantity")]
    InventoryUnavailable { room_type: String },

    #[error("Experience is not available on selected date")]
    NotAvailable,

    #[error("Guest count exceeds experience capacity")]
    CapacityExceeded,

    #[error("Check-out date must be after check-in date")]
    InvalidDateRange,

    #[error("Invalid updates")]
    InvalidUpdate,

    #[error("Booking is already cancelled")]
    AlreadyCancelled,

    #[error("Cannot modify a completed booking")]
    Immutable,

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}
