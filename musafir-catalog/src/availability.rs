//! Read-only validation of a requested booking against the current
//! inventory snapshot. Passing a check does not reserve anything; the
//! conditional decrement in the storage layer is the authoritative gate.

use chrono::NaiveDate;
use musafir_core::BookingError;

use crate::item::{Experience, Hotel, RoomSelection};

/// Every requested room type must exist on the hotel and have at least the
/// requested quantity available.
pub fn check_hotel(hotel: &Hotel, rooms: &[RoomSelection]) -> Result<(), BookingError> {
    for selection in rooms {
        match hotel.room(&selection.room_type) {
            Some(room) if room.available >= selection.quantity => {}
            _ => {
                return Err(BookingError::InventoryUnavailable {
                    room_type: selection.room_type.clone(),
                })
            }
        }
    }
    Ok(())
}

/// Total guests must fit the experience's capacity cap, and a schedule
/// entry must exist on the requested calendar day with enough open spots.
pub fn check_experience(
    experience: &Experience,
    date: NaiveDate,
    total_guests: u32,
) -> Result<(), BookingError> {
    if total_guests > experience.max_capacity {
        return Err(BookingError::CapacityExceeded);
    }

    match experience.schedule_for(date) {
        Some(entry) if entry.spots() >= total_guests => Ok(()),
        _ => Err(BookingError::NotAvailable),
    }
}
