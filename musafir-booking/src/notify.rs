use async_trait::async_trait;
use musafir_core::NotifyError;
use tracing::info;

use crate::models::Booking;

/// Best-effort delivery of booking lifecycle notifications.
///
/// Dispatch is fire-and-forget: the manager spawns the call, logs failures
/// and never lets them affect the booking result.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn booking_created(&self, user_email: &str, booking: &Booking)
        -> Result<(), NotifyError>;

    async fn booking_cancelled(
        &self,
        user_email: &str,
        booking: &Booking,
    ) -> Result<(), NotifyError>;
}

/// Dispatcher that only writes to the log. Used by tests and local runs;
/// production wires the Kafka-backed producer instead.
pub struct LogNotifier;

#[async_trait]
impl NotificationDispatcher for LogNotifier {
    async fn booking_created(
        &self,
        user_email: &str,
        booking: &Booking,
    ) -> Result<(), NotifyError> {
        info!(booking_id = %booking.id, %user_email, "booking confirmation notification");
        Ok(())
    }

    async fn booking_cancelled(
        &self,
        user_email: &str,
        booking: &Booking,
    ) -> Result<(), NotifyError> {
        info!(booking_id = %booking.id, %user_email, "booking cancellation notification");
        Ok(())
    }
}
