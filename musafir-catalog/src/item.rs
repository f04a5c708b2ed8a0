use std::collections::BTreeMap;
use std::fmt;

use chrono::{Duration, NaiveDate};
use musafir_shared::money::{Money, DEFAULT_CURRENCY};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discriminator for the two bookable item families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Hotel,
    Experience,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Hotel => write!(f, "hotel"),
            ItemKind::Experience => write!(f, "experience"),
        }
    }
}

/// Guests on a booking. At least one adult; children billed at a reduced
/// rate for experiences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestCount {
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
}

impl GuestCount {
    pub fn total(&self) -> u32 {
        self.adults + self.children
    }
}

/// A requested room line on a hotel booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSelection {
    pub room_type: String,
    pub quantity: u32,
}

/// Per-type room inventory owned by a hotel. `available` is the shared
/// counter concurrent bookings contend over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomInventory {
    pub room_type: String,
    pub price: Money,
    pub available: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotel {
    pub id: Uuid,
    pub name: String,
    pub city: Option<String>,
    pub rooms: Vec<RoomInventory>,
}

/// Per-date availability snapshot derived from current room counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub available_rooms: BTreeMap<String, u32>,
}

impl Hotel {
    pub fn room(&self, room_type: &str) -> Option<&RoomInventory> {
        self.rooms.iter().find(|r| r.room_type == room_type)
    }

    pub fn currency(&self) -> &str {
        self.rooms
            .first()
            .map(|r| r.price.currency.as_str())
            .unwrap_or(DEFAULT_CURRENCY)
    }

    /// Availability table for the next `days` calendar days, derived from
    /// the current counters. A cache for search layers; never stored.
    pub fn availability_window(&self, from: NaiveDate, days: u32) -> Vec<DayAvailability> {
        let counts: BTreeMap<String, u32> = self
            .rooms
            .iter()
            .map(|r| (r.room_type.clone(), r.available))
            .collect();

        (0..days)
            .map(|offset| DayAvailability {
                date: from + Duration::days(i64::from(offset)),
                available_rooms: counts.clone(),
            })
            .collect()
    }
}

/// A dated departure with finite capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub date: NaiveDate,
    pub total_slots: u32,
    pub booked_slots: u32,
}

impl ScheduleEntry {
    /// Seats still open on this date.
    pub fn spots(&self) -> u32 {
        self.total_slots.saturating_sub(self.booked_slots)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub id: Uuid,
    pub title: String,
    /// Per-adult rate; children are billed at half.
    pub price: Money,
    pub max_capacity: u32,
    pub schedule: Vec<ScheduleEntry>,
}

impl Experience {
    /// Schedule entry for a calendar day, if one exists.
    pub fn schedule_for(&self, date: NaiveDate) -> Option<&ScheduleEntry> {
        self.schedule.iter().find(|entry| entry.date == date)
    }
}

/// A bookable catalog entity. Bookings reference exactly one of these,
/// discriminated by [`ItemKind`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CatalogItem {
    Hotel(Hotel),
    Experience(Experience),
}

impl CatalogItem {
    pub fn id(&self) -> Uuid {
        match self {
            CatalogItem::Hotel(h) => h.id,
            CatalogItem::Experience(e) => e.id,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            CatalogItem::Hotel(_) => ItemKind::Hotel,
            CatalogItem::Experience(_) => ItemKind::Experience,
        }
    }

    pub fn currency(&self) -> &str {
        match self {
            CatalogItem::Hotel(h) => h.currency(),
            CatalogItem::Experience(e) => e.price.currency.as_str(),
        }
    }
}
