use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::models::{Customer, Slot, Vehicle};

/// Bookings are only ever recorded once confirmed; there is no cancel path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
        }
    }
}

/// A confirmed test drive: one customer, one slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub car_id: Uuid,
    pub slot_id: Uuid,
    pub status: BookingStatus,
    pub booked_at: DateTime<Utc>,
}

impl Booking {
    pub fn confirmed(customer_id: Uuid, car_id: Uuid, slot_id: Uuid, booked_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            car_id,
            slot_id,
            status: BookingStatus::Confirmed,
            booked_at,
        }
    }
}

/// A booking as shown in the customer lounge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingHistoryEntry {
    #[serde(flatten)]
    pub booking: Booking,
    pub car_details: Option<Vehicle>,
    pub slot_details: Option<Slot>,
}

impl BookingHistoryEntry {
    pub fn slot_start(&self) -> Option<DateTime<Utc>> {
        self.slot_details.as_ref().map(|slot| slot.start_time)
    }
}

/// A booking joined with everything known about it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingOverview {
    #[serde(flatten)]
    pub entry: BookingHistoryEntry,
    pub customer_details: Option<Customer>,
}
