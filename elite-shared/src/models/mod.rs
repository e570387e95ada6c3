pub mod vehicle;
pub mod customer;
pub mod schedule;
pub mod booking;
pub mod service;
pub mod events;

pub use vehicle::{Vehicle, VehicleSpecs};
pub use customer::Customer;
pub use schedule::{Slot, SlotStatus};
pub use booking::{Booking, BookingHistoryEntry, BookingOverview, BookingStatus};
pub use service::{ServiceAlert, ServiceRecord};
pub use events::SlotBookedEvent;
