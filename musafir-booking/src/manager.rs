use std::sync::Arc;

use chrono::Utc;
use musafir_catalog::{availability, pricing, CatalogItem, CatalogStore, InventoryKey};
use musafir_core::{AuthenticatedUser, BookingError, StoreError};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::{
    Booking, BookingPatch, BookingStatus, Cancellation, CreateBookingRequest, PaymentStatus,
};
use crate::notify::NotificationDispatcher;
use crate::policy;
use crate::repository::BookingStore;

/// Orchestrates the booking lifecycle: availability check, pricing,
/// inventory holds, persistence, and cancellation refunds.
///
/// Inventory is decremented before the booking record is persisted, and a
/// cancellation is persisted before its units are released. In both
/// directions held units are at least the persisted live bookings, so the
/// engine can never oversell; the residual failure mode is a leaked hold,
/// which is logged.
pub struct BookingManager {
    catalog: Arc<dyn CatalogStore>,
    bookings: Arc<dyn BookingStore>,
    notifier: Arc<dyn NotificationDispatcher>,
}

impl BookingManager {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        bookings: Arc<dyn BookingStore>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            catalog,
            bookings,
            notifier,
        }
    }

    pub async fn create_booking(
        &self,
        request: CreateBookingRequest,
        user: &AuthenticatedUser,
    ) -> Result<Booking, BookingError> {
        request.validate()?;

        // 1. Resolve the target item.
        let item = self
            .catalog
            .find_item(request.item_type, request.item_id)
            .await?
            .ok_or(BookingError::ItemNotFound)?;

        // 2. Read-only availability check against the current snapshot,
        //    then price the stay. Concurrent requests can still race past
        //    the check; the conditional decrement below is the gate.
        let amount = match &item {
            CatalogItem::Hotel(hotel) => {
                availability::check_hotel(hotel, &request.rooms)?;
                let end = request.end_date.ok_or(BookingError::InvalidDateRange)?;
                pricing::price_hotel(hotel, &request.rooms, request.start_date, end)?
            }
            CatalogItem::Experience(experience) => {
                availability::check_experience(
                    experience,
                    request.start_date.date_naive(),
                    request.guests.total(),
                )?;
                pricing::price_experience(experience, &request.guests)
            }
        };

        let booking = Booking::from_request(&request, &user.id, amount);

        // 3. Take the holds first, then persist. If persistence fails the
        //    holds are rolled back, so a stored booking always has a
        //    matching inventory hold.
        let holds = booking.inventory_holds();
        self.take_holds(&booking, &holds).await?;

        if let Err(err) = self.bookings.create(&booking).await {
            error!(booking_id = %booking.id, "failed to persist booking, releasing holds: {err}");
            self.release_holds(booking.item_id, &holds).await;
            return Err(err.into());
        }

        info!(booking_id = %booking.id, user_id = %user.id, total = booking.amount.total,
            "booking created");
        self.dispatch_created(user.email.clone(), booking.clone());
        Ok(booking)
    }

    pub async fn get_booking(
        &self,
        id: Uuid,
        user: &AuthenticatedUser,
    ) -> Result<Booking, BookingError> {
        let booking = self
            .bookings
            .find_by_id(id)
            .await?
            .ok_or(BookingError::BookingNotFound)?;

        if booking.user_id != user.id && !user.role.is_privileged() {
            return Err(BookingError::Forbidden);
        }
        Ok(booking)
    }

    pub async fn list_bookings(&self, user: &AuthenticatedUser) -> Result<Vec<Booking>, BookingError> {
        Ok(self.bookings.find_for_user(&user.id).await?)
    }

    /// Apply an owner patch. Only the allow-listed fields in
    /// [`BookingPatch`] can change; the request boundary rejects anything
    /// else before it gets here.
    pub async fn update_booking(
        &self,
        id: Uuid,
        user: &AuthenticatedUser,
        patch: BookingPatch,
    ) -> Result<Booking, BookingError> {
        let mut booking = self
            .bookings
            .find_by_id(id)
            .await?
            .ok_or(BookingError::BookingNotFound)?;

        if booking.user_id != user.id {
            return Err(BookingError::Forbidden);
        }
        if booking.booking_status.is_terminal() {
            return Err(BookingError::Immutable);
        }

        if let Some(requests) = patch.special_requests {
            booking.special_requests = Some(requests);
        }
        booking.updated_at = Utc::now();

        self.bookings.save(&booking).await?;
        Ok(booking)
    }

    pub async fn cancel_booking(
        &self,
        id: Uuid,
        user: &AuthenticatedUser,
        reason: Option<String>,
    ) -> Result<Booking, BookingError> {
        let mut booking = self
            .bookings
            .find_by_id(id)
            .await?
            .ok_or(BookingError::BookingNotFound)?;

        if booking.user_id != user.id {
            return Err(BookingError::Forbidden);
        }
        match booking.booking_status {
            BookingStatus::Cancelled => return Err(BookingError::AlreadyCancelled),
            BookingStatus::Completed => return Err(BookingError::Immutable),
            BookingStatus::Pending | BookingStatus::Confirmed => {}
        }

        let now = Utc::now();
        let refund = policy::refund_amount(booking.amount.total, booking.start_date, now);

        booking.booking_status = BookingStatus::Cancelled;
        if booking.payment_status == PaymentStatus::Paid && refund > 0.0 {
            booking.payment_status = PaymentStatus::Refunded;
        }
        booking.cancellation = Some(Cancellation {
            date: now,
            reason,
            refund_amount: refund,
        });
        booking.updated_at = now;

        // Persist the terminal state first, then hand the units back, so
        // released inventory is never backed by a live booking.
        self.bookings.save(&booking).await?;
        self.release_holds(booking.item_id, &booking.inventory_holds())
            .await;

        info!(booking_id = %booking.id, refund, "booking cancelled");
        self.dispatch_cancelled(user.email.clone(), booking.clone());
        Ok(booking)
    }

    /// Transition `pending -> confirmed`. Idempotent on an already
    /// confirmed booking.
    pub async fn confirm_booking(&self, id: Uuid) -> Result<Booking, BookingError> {
        self.transition(id, BookingStatus::Confirmed, |status| {
            matches!(status, BookingStatus::Pending | BookingStatus::Confirmed)
        })
        .await
    }

    /// Transition `confirmed -> completed`.
    pub async fn complete_booking(&self, id: Uuid) -> Result<Booking, BookingError> {
        self.transition(id, BookingStatus::Completed, |status| {
            matches!(status, BookingStatus::Confirmed)
        })
        .await
    }

    async fn transition(
        &self,
        id: Uuid,
        to: BookingStatus,
        allowed_from: impl Fn(BookingStatus) -> bool,
    ) -> Result<Booking, BookingError> {
        let mut booking = self
            .bookings
            .find_by_id(id)
            .await?
            .ok_or(BookingError::BookingNotFound)?;

        if booking.booking_status == to {
            return Ok(booking);
        }
        if !allowed_from(booking.booking_status) {
            return Err(BookingError::InvalidTransition {
                from: booking.booking_status.to_string(),
                to: to.to_string(),
            });
        }

        booking.booking_status = to;
        booking.updated_at = Utc::now();
        self.bookings.save(&booking).await?;
        Ok(booking)
    }

    async fn take_holds(
        &self,
        booking: &Booking,
        holds: &[(InventoryKey, i64)],
    ) -> Result<(), BookingError> {
        for (taken, (key, units)) in holds.iter().enumerate() {
            if let Err(err) = self
                .catalog
                .adjust_inventory(booking.item_id, key, -units)
                .await
            {
                // Roll back the holds taken so far before reporting.
                self.release_holds(booking.item_id, &holds[..taken]).await;
                return Err(match err {
                    StoreError::InsufficientInventory { .. } | StoreError::NotFound => match key {
                        InventoryKey::Room(room_type) => BookingError::InventoryUnavailable {
                            room_type: room_type.clone(),
                        },
                        InventoryKey::Slot(_) => BookingError::NotAvailable,
                    },
                    other => other.into(),
                });
            }
        }
        Ok(())
    }

    async fn release_holds(&self, item_id: Uuid, holds: &[(InventoryKey, i64)]) {
        for (key, units) in holds {
            if let Err(err) = self.catalog.adjust_inventory(item_id, key, *units).await {
                error!(%item_id, key = %key, "failed to release inventory hold: {err}");
            }
        }
    }

    fn dispatch_created(&self, email: String, booking: Booking) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(err) = notifier.booking_created(&email, &booking).await {
                warn!(booking_id = %booking.id, "booking confirmation notification failed: {err}");
            }
        });
    }

    fn dispatch_cancelled(&self, email: String, booking: Booking) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(err) = notifier.booking_cancelled(&email, &booking).await {
                warn!(booking_id = %booking.id, "booking cancellation notification failed: {err}");
            }
        });
    }
}
