pub mod repository;
pub mod search;

use uuid::Uuid;

pub use repository::{BookingLedger, CustomerDirectory, ServiceHistory, SlotStore, VehicleCatalog};
pub use search::VehicleQuery;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("Slot {0} is already booked")]
    AlreadyBooked(Uuid),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Storage backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
