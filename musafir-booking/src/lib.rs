pub mod manager;
pub mod models;
pub mod notify;
pub mod policy;
pub mod repository;

pub use manager::BookingManager;
pub use models::{
    Booking, BookingPatch, BookingStatus, Cancellation, CreateBookingRequest, PaymentStatus,
};
pub use notify::{LogNotifier, NotificationDispatcher};
pub use repository::{BookingStore, MemoryBookingStore};
