pub mod request;
pub mod coordinator;
pub mod history;

pub use request::{BookingRequest, TestDriveRequest, parse_id};
pub use coordinator::{BookingCoordinator, BookingError};
pub use history::BookingHistory;
