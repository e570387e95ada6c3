pub mod models;
pub mod pii;

pub use models::{
    Booking, BookingHistoryEntry, BookingOverview, BookingStatus, Customer, ServiceAlert,
    ServiceRecord, Slot, SlotBookedEvent, SlotStatus, Vehicle, VehicleSpecs,
};
pub use pii::Masked;
