use async_trait::async_trait;
use chrono::{DateTime, Utc};
use musafir_booking::models::{Booking, BookingStatus, Cancellation, PaymentStatus};
use musafir_booking::repository::BookingStore;
use musafir_catalog::{GuestCount, ItemKind};
use musafir_core::StoreError;
use musafir_shared::money::Amount;
use sqlx::PgPool;
use uuid::Uuid;

/// Postgres-backed booking store. Side collections (room lines, the
/// cancellation record) are JSONB fields on the row; counters are not kept
/// here, the catalog store owns them.
pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn decode<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|e| StoreError::Backend(e.to_string()))
}

fn item_type_label(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Hotel => "hotel",
        ItemKind::Experience => "experience",
    }
}

fn parse_item_type(label: &str) -> Result<ItemKind, StoreError> {
    match label {
        "hotel" => Ok(ItemKind::Hotel),
        "experience" => Ok(ItemKind::Experience),
        other => Err(StoreError::Backend(format!("unknown item type: {other}"))),
    }
}

fn booking_status_label(status: BookingStatus) -> &'static str {
    match status {
        BookingStatus::Pending => "pending",
        BookingStatus::Confirmed => "confirmed",
        BookingStatus::Cancelled => "cancelled",
        BookingStatus::Completed => "completed",
    }
}

fn parse_booking_status(label: &str) -> Result<BookingStatus, StoreError> {
    match label {
        "pending" => Ok(BookingStatus::Pending),
        "confirmed" => Ok(BookingStatus::Confirmed),
        "cancelled" => Ok(BookingStatus::Cancelled),
        "completed" => Ok(BookingStatus::Completed),
        other => Err(StoreError::Backend(format!("unknown booking status: {other}"))),
    }
}

fn payment_status_label(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Pending => "pending",
        PaymentStatus::Paid => "paid",
        PaymentStatus::Refunded => "refunded",
        PaymentStatus::Failed => "failed",
    }
}

fn parse_payment_status(label: &str) -> Result<PaymentStatus, StoreError> {
    match label {
        "pending" => Ok(PaymentStatus::Pending),
        "paid" => Ok(PaymentStatus::Paid),
        "refunded" => Ok(PaymentStatus::Refunded),
        "failed" => Ok(PaymentStatus::Failed),
        other => Err(StoreError::Backend(format!("unknown payment status: {other}"))),
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    user_id: String,
    item_type: String,
    item_id: Uuid,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    adults: i32,
    children: i32,
    rooms: serde_json::Value,
    subtotal: f64,
    taxes: f64,
    total: f64,
    currency: String,
    payment_status: String,
    booking_status: String,
    cancellation: Option<serde_json::Value>,
    special_requests: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BookingRow {
    fn into_booking(self) -> Result<Booking, StoreError> {
        let cancellation = match self.cancellation {
            Some(value) => Some(decode::<Cancellation>(value)?),
            None => None,
        };

        Ok(Booking {
            id: self.id,
            user_id: self.user_id,
            item_type: parse_item_type(&self.item_type)?,
            item_id: self.item_id,
            start_date: self.start_date,
            end_date: self.end_date,
            guests: GuestCount {
                adults: self.adults.max(0) as u32,
                children: self.children.max(0) as u32,
            },
            rooms: decode(self.rooms)?,
            amount: Amount {
                subtotal: self.subtotal,
                taxes: self.taxes,
                total: self.total,
                currency: self.currency,
            },
            payment_status: parse_payment_status(&self.payment_status)?,
            booking_status: parse_booking_status(&self.booking_status)?,
            cancellation,
            special_requests: self.special_requests,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const BOOKING_COLUMNS: &str = "id, user_id, item_type, item_id, start_date, end_date, \
    adults, children, rooms, subtotal, taxes, total, currency, \
    payment_status, booking_status, cancellation, special_requests, \
    created_at, updated_at";

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn create(&self, booking: &Booking) -> Result<(), StoreError> {
        let rooms =
            serde_json::to_value(&booking.rooms).map_err(|e| StoreError::Backend(e.to_string()))?;
        let cancellation = booking
            .cancellation
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        sqlx::query(
            "INSERT INTO bookings (id, user_id, item_type, item_id, start_date, end_date, \
             adults, children, rooms, subtotal, taxes, total, currency, \
             payment_status, booking_status, cancellation, special_requests, \
             created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)",
        )
        .bind(booking.id)
        .bind(&booking.user_id)
        .bind(item_type_label(booking.item_type))
        .bind(booking.item_id)
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(booking.guests.adults as i32)
        .bind(booking.guests.children as i32)
        .bind(rooms)
        .bind(booking.amount.subtotal)
        .bind(booking.amount.taxes)
        .bind(booking.amount.total)
        .bind(&booking.amount.currency)
        .bind(payment_status_label(booking.payment_status))
        .bind(booking_status_label(booking.booking_status))
        .bind(cancellation)
        .bind(&booking.special_requests)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(BookingRow::into_booking).transpose()
    }

    async fn find_for_user(&self, user_id: &str) -> Result<Vec<Booking>, StoreError> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        rows.into_iter().map(BookingRow::into_booking).collect()
    }

    async fn save(&self, booking: &Booking) -> Result<(), StoreError> {
        let cancellation = booking
            .cancellation
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let affected = sqlx::query(
            "UPDATE bookings SET booking_status = $2, payment_status = $3, \
             cancellation = $4, special_requests = $5, updated_at = $6 \
             WHERE id = $1",
        )
        .bind(booking.id)
        .bind(booking_status_label(booking.booking_status))
        .bind(payment_status_label(booking.payment_status))
        .bind(cancellation)
        .bind(&booking.special_requests)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await
        .map_err(backend)?
        .rows_affected();

        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
