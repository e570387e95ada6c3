use async_trait::async_trait;
use uuid::Uuid;
use elite_shared::{Booking, Customer, ServiceRecord, Slot, Vehicle};
use crate::StoreResult;

/// Read access to the vehicle catalog
#[async_trait]
pub trait VehicleCatalog: Send + Sync {
    /// Owned snapshot of every vehicle, in catalog order
    async fn list_vehicles(&self) -> StoreResult<Vec<Vehicle>>;

    async fn get_vehicle(&self, id: Uuid) -> StoreResult<Option<Vehicle>>;
}

/// Read access to customers
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn list_customers(&self) -> StoreResult<Vec<Customer>>;

    async fn get_customer(&self, id: Uuid) -> StoreResult<Option<Customer>>;
}

/// Viewing slots per vehicle
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Open slots for a vehicle, ascending by start time (ties by slot id)
    async fn list_open_slots(&self, car_id: Uuid) -> StoreResult<Vec<Slot>>;

    /// Every open slot in the store, same ordering
    async fn list_all_open_slots(&self) -> StoreResult<Vec<Slot>>;

    async fn get_slot(&self, id: Uuid) -> StoreResult<Option<Slot>>;

    /// Atomically transition a slot of `car_id` from open to booked.
    ///
    /// Fails with `AlreadyBooked` when the slot is not open at call time and
    /// with `NotFound` when no such slot exists for that vehicle. The check
    /// and the write happen in one step.
    async fn mark_booked(&self, slot_id: Uuid, car_id: Uuid) -> StoreResult<Slot>;

    /// Mark `booking.slot_id` booked and append `booking` to the ledger as
    /// one atomic step: either both are visible or neither is.
    ///
    /// Errors are those of `mark_booked`, plus `Conflict` when the ledger
    /// refuses the booking. On any error the slot stays open.
    async fn book(&self, booking: &Booking) -> StoreResult<Slot>;
}

/// Append-only record of confirmed bookings
#[async_trait]
pub trait BookingLedger: Send + Sync {
    /// Record a booking. Never overwrites: a duplicate id is a `Conflict`.
    async fn append(&self, booking: &Booking) -> StoreResult<()>;

    async fn bookings_for(&self, customer_id: Uuid) -> StoreResult<Vec<Booking>>;

    async fn all(&self) -> StoreResult<Vec<Booking>>;
}

/// Maintenance records per vehicle
#[async_trait]
pub trait ServiceHistory: Send + Sync {
    /// Records flagged `next_service_due`, oldest first
    async fn due_services(&self) -> StoreResult<Vec<ServiceRecord>>;
}
