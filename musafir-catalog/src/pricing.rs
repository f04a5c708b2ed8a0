//! Pure price computation. Amounts flow one way: catalog item in,
//! [`Amount`] out. Callers must recompute whenever guests or rooms change;
//! nothing here is cached.

use chrono::{DateTime, Utc};
use musafir_core::BookingError;
use musafir_shared::money::Amount;

use crate::item::{Experience, GuestCount, Hotel, RoomSelection};

/// Flat GST applied to every subtotal. A domain constant, not a per-item
/// setting.
pub const TAX_RATE: f64 = 0.18;

/// Children are billed at half the adult rate for experiences.
const CHILD_RATE: f64 = 0.5;

const SECONDS_PER_DAY: i64 = 86_400;

/// Chargeable nights between check-in and check-out, partial days rounded
/// up. The range must cover at least part of one night.
pub fn nights(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64, BookingError> {
    let seconds = (end - start).num_seconds();
    if seconds <= 0 {
        return Err(BookingError::InvalidDateRange);
    }
    Ok((seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY)
}

/// Price a hotel stay: sum of room price x quantity x nights, plus tax.
pub fn price_hotel(
    hotel: &Hotel,
    rooms: &[RoomSelection],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Amount, BookingError> {
    let nights = nights(start, end)?;

    let mut subtotal = 0.0;
    for selection in rooms {
        let room = hotel.room(&selection.room_type).ok_or_else(|| {
            BookingError::InventoryUnavailable {
                room_type: selection.room_type.clone(),
            }
        })?;
        subtotal += room.price.amount * f64::from(selection.quantity) * nights as f64;
    }

    Ok(with_taxes(subtotal, hotel.currency()))
}

/// Price an experience: per-adult rate, children at half rate.
pub fn price_experience(experience: &Experience, guests: &GuestCount) -> Amount {
    let subtotal = experience.price.amount
        * (f64::from(guests.adults) + f64::from(guests.children) * CHILD_RATE);
    with_taxes(subtotal, &experience.price.currency)
}

fn with_taxes(subtotal: f64, currency: &str) -> Amount {
    let taxes = subtotal * TAX_RATE;
    Amount {
        subtotal,
        taxes,
        total: subtotal + taxes,
        currency: currency.to_string(),
    }
}
