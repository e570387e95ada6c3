use std::collections::HashMap;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;
use elite_core::{
    BookingLedger, CustomerDirectory, ServiceHistory, SlotStore, StoreError, StoreResult,
    VehicleCatalog,
};
use elite_shared::{Booking, Customer, ServiceRecord, Slot, SlotStatus, Vehicle};
use crate::seed::SeedData;

/// In-process backend. Catalog, customers and service records are fixed at
/// construction; slots and the ledger sit behind their own locks.
pub struct MemoryStore {
    vehicles: Vec<Vehicle>,
    customers: Vec<Customer>,
    services: Vec<ServiceRecord>,
    slots: RwLock<HashMap<Uuid, Slot>>,
    bookings: RwLock<Vec<Booking>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::from_seed(SeedData::default())
    }

    pub fn from_seed(seed: SeedData) -> Self {
        let slots = seed.slots.into_iter().map(|s| (s.id, s)).collect();
        Self {
            vehicles: seed.vehicles,
            customers: seed.customers,
            services: seed.services,
            slots: RwLock::new(slots),
            bookings: RwLock::new(seed.bookings),
        }
    }

    /// Every slot regardless of status, in listing order
    pub async fn all_slots(&self) -> Vec<Slot> {
        let slots = self.slots.read().await;
        let mut all: Vec<Slot> = slots.values().cloned().collect();
        sort_slots(&mut all);
        all
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn sort_slots(slots: &mut [Slot]) {
    slots.sort_by_key(|s| (s.start_time, s.id));
}

#[async_trait]
impl VehicleCatalog for MemoryStore {
    async fn list_vehicles(&self) -> StoreResult<Vec<Vehicle>> {
        Ok(self.vehicles.clone())
    }

    async fn get_vehicle(&self, id: Uuid) -> StoreResult<Option<Vehicle>> {
        Ok(self.vehicles.iter().find(|v| v.id == id).cloned())
    }
}

#[async_trait]
impl CustomerDirectory for MemoryStore {
    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        Ok(self.customers.clone())
    }

    async fn get_customer(&self, id: Uuid) -> StoreResult<Option<Customer>> {
        Ok(self.customers.iter().find(|c| c.id == id).cloned())
    }
}

#[async_trait]
impl SlotStore for MemoryStore {
    async fn list_open_slots(&self, car_id: Uuid) -> StoreResult<Vec<Slot>> {
        let slots = self.slots.read().await;
        let mut open: Vec<Slot> = slots
            .values()
            .filter(|s| s.car_id == car_id && s.is_open())
            .cloned()
            .collect();
        sort_slots(&mut open);
        Ok(open)
    }

    async fn list_all_open_slots(&self) -> StoreResult<Vec<Slot>> {
        let slots = self.slots.read().await;
        let mut open: Vec<Slot> = slots.values().filter(|s| s.is_open()).cloned().collect();
        sort_slots(&mut open);
        Ok(open)
    }

    async fn get_slot(&self, id: Uuid) -> StoreResult<Option<Slot>> {
        Ok(self.slots.read().await.get(&id).cloned())
    }

    async fn mark_booked(&self, slot_id: Uuid, car_id: Uuid) -> StoreResult<Slot> {
        // Check and write under one write guard
        let mut slots = self.slots.write().await;
        let slot = open_slot(&mut slots, slot_id, car_id)?;
        slot.status = SlotStatus::Booked;
        debug!(%slot_id, "Slot marked booked");
        Ok(slot.clone())
    }

    async fn book(&self, booking: &Booking) -> StoreResult<Slot> {
        // Lock order: slots, then bookings
        let mut slots = self.slots.write().await;
        let mut bookings = self.bookings.write().await;

        let slot = open_slot(&mut slots, booking.slot_id, booking.car_id)?;
        if bookings.iter().any(|b| b.id == booking.id) {
            return Err(duplicate(booking));
        }

        slot.status = SlotStatus::Booked;
        bookings.push(booking.clone());
        debug!(slot_id = %booking.slot_id, booking_id = %booking.id, "Slot booked");
        Ok(slot.clone())
    }
}

/// The slot `slot_id` of `car_id`, provided it is still open
fn open_slot(slots: &mut HashMap<Uuid, Slot>, slot_id: Uuid, car_id: Uuid) -> StoreResult<&mut Slot> {
    let slot = slots
        .get_mut(&slot_id)
        .filter(|s| s.car_id == car_id)
        .ok_or_else(|| StoreError::NotFound(format!("Slot {} of vehicle {}", slot_id, car_id)))?;

    if slot.status != SlotStatus::Open {
        return Err(StoreError::AlreadyBooked(slot_id));
    }
    Ok(slot)
}

fn duplicate(booking: &Booking) -> StoreError {
    StoreError::Conflict(format!("Booking {} already recorded", booking.id))
}

#[async_trait]
impl BookingLedger for MemoryStore {
    async fn append(&self, booking: &Booking) -> StoreResult<()> {
        let mut bookings = self.bookings.write().await;
        if bookings.iter().any(|b| b.id == booking.id) {
            return Err(duplicate(booking));
        }
        bookings.push(booking.clone());
        Ok(())
    }

    async fn bookings_for(&self, customer_id: Uuid) -> StoreResult<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings.iter().filter(|b| b.customer_id == customer_id).cloned().collect())
    }

    async fn all(&self) -> StoreResult<Vec<Booking>> {
        Ok(self.bookings.read().await.clone())
    }
}

#[async_trait]
impl ServiceHistory for MemoryStore {
    async fn due_services(&self) -> StoreResult<Vec<ServiceRecord>> {
        let mut due: Vec<ServiceRecord> =
            self.services.iter().filter(|s| s.next_service_due).cloned().collect();
        due.sort_by_key(|s| (s.date, s.id));
        Ok(due)
    }
}
