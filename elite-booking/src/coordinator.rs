use std::sync::Arc;
use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use uuid::Uuid;
use elite_core::{CustomerDirectory, SlotStore, StoreError, VehicleCatalog};
use elite_shared::{Booking, SlotBookedEvent};
use crate::request::BookingRequest;

/// Single entry point for turning an open slot into a confirmed booking.
///
/// The slot transition and the ledger append are one `SlotStore::book` call,
/// an atomic compare-and-set, so of any number of concurrent attempts on one
/// slot exactly one succeeds.
pub struct BookingCoordinator {
    customers: Arc<dyn CustomerDirectory>,
    catalog: Arc<dyn VehicleCatalog>,
    slots: Arc<dyn SlotStore>,
    events: Option<broadcast::Sender<SlotBookedEvent>>,
}

impl BookingCoordinator {
    pub fn new(
        customers: Arc<dyn CustomerDirectory>,
        catalog: Arc<dyn VehicleCatalog>,
        slots: Arc<dyn SlotStore>,
    ) -> Self {
        Self {
            customers,
            catalog,
            slots,
            events: None,
        }
    }

    /// Broadcast a `SlotBookedEvent` for every confirmed booking
    pub fn with_events(mut self, events: broadcast::Sender<SlotBookedEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Try to book `slot_id` of `car_id` for `customer_id`.
    ///
    /// A rejected attempt leaves both the slot and the ledger untouched.
    pub async fn attempt_book(&self, request: BookingRequest) -> Result<Booking, BookingError> {
        let BookingRequest { customer_id, car_id, slot_id } = request;

        if self.customers.get_customer(customer_id).await?.is_none() {
            warn!(%customer_id, "Booking rejected: unknown customer");
            return Err(BookingError::UnknownCustomer(customer_id));
        }

        let Some(vehicle) = self.catalog.get_vehicle(car_id).await? else {
            warn!(%car_id, "Booking rejected: unknown vehicle");
            return Err(BookingError::UnknownVehicle(car_id));
        };

        let booking = Booking::confirmed(customer_id, car_id, slot_id, Utc::now());

        let slot = match self.slots.book(&booking).await {
            Ok(slot) => slot,
            Err(StoreError::AlreadyBooked(_)) | Err(StoreError::NotFound(_)) => {
                warn!(%slot_id, %car_id, "Booking rejected: slot unavailable");
                return Err(BookingError::SlotUnavailable(slot_id));
            }
            Err(e) => {
                error!(%slot_id, "Failed to record booking: {}", e);
                return Err(e.into());
            }
        };

        if let Some(events) = &self.events {
            // No subscribers is fine
            let _ = events.send(SlotBookedEvent {
                slot_id: slot.id,
                car_id,
                booking_id: booking.id,
                booked_at: booking.booked_at.timestamp(),
            });
        }

        info!(
            "Booking confirmed: {} ({}, slot {}, customer {})",
            booking.id,
            vehicle.display_name(),
            slot.id,
            customer_id
        );
        Ok(booking)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Slot not available")]
    SlotUnavailable(Uuid),

    #[error("Customer not found: {0}")]
    UnknownCustomer(Uuid),

    #[error("Vehicle not found: {0}")]
    UnknownVehicle(Uuid),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration as StdDuration;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use elite_core::{BookingLedger, StoreResult};
    use elite_shared::{Customer, Slot, SlotStatus, Vehicle, VehicleSpecs};
    use elite_store::{MemoryStore, SeedData};

    struct Fixture {
        store: Arc<MemoryStore>,
        coordinator: BookingCoordinator,
        customer: Customer,
        other_customer: Customer,
        car: Vehicle,
        other_car: Vehicle,
        slot: Slot,
        foreign_slot: Slot,
    }

    fn fixture() -> Fixture {
        let customer = Customer::new("Avi Levi", "+972-50-1234567", "VIP");
        let other_customer = Customer::new("Noa Mizrahi", "+972-52-7654321", "Platinum");
        let car = Vehicle::new("Ferrari", "SF90 Stradale", 2024, "Supercar", 625_000,
            VehicleSpecs { hp: 986, engine: "V8 Hybrid".into() });
        let other_car = Vehicle::new("Tesla", "Model S Plaid", 2024, "Sedan", 108_990,
            VehicleSpecs { hp: 1020, engine: "Electric Tri-Motor".into() });
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
        let slot = Slot::open(car.id, start, Duration::hours(1));
        let foreign_slot = Slot::open(other_car.id, start, Duration::hours(1));

        let store = Arc::new(MemoryStore::from_seed(SeedData {
            vehicles: vec![car.clone(), other_car.clone()],
            customers: vec![customer.clone(), other_customer.clone()],
            slots: vec![slot.clone(), foreign_slot.clone()],
            ..SeedData::default()
        }));
        let coordinator = BookingCoordinator::new(store.clone(), store.clone(), store.clone());

        Fixture { store, coordinator, customer, other_customer, car, other_car, slot, foreign_slot }
    }

    async fn snapshot(store: &MemoryStore) -> (Vec<u8>, Vec<u8>) {
        let slots = serde_json::to_vec(&store.all_slots().await).unwrap();
        let ledger = serde_json::to_vec(&store.all().await.unwrap()).unwrap();
        (slots, ledger)
    }

    #[tokio::test]
    async fn test_book_then_second_attempt_is_unavailable() {
        let f = fixture();

        let booking = f.coordinator
            .attempt_book(BookingRequest::new(f.customer.id, f.car.id, f.slot.id))
            .await
            .unwrap();
        assert_eq!(booking.customer_id, f.customer.id);
        assert_eq!(booking.slot_id, f.slot.id);
        assert_eq!(booking.car_id, f.car.id);

        let slot = f.store.get_slot(f.slot.id).await.unwrap().unwrap();
        assert_eq!(slot.status, SlotStatus::Booked);
        assert!(f.store.list_open_slots(f.car.id).await.unwrap().is_empty());

        let second = f.coordinator
            .attempt_book(BookingRequest::new(f.other_customer.id, f.car.id, f.slot.id))
            .await;
        assert!(matches!(second, Err(BookingError::SlotUnavailable(id)) if id == f.slot.id));
        assert_eq!(f.store.all().await.unwrap(), vec![booking]);
    }

    #[tokio::test]
    async fn test_nonexistent_slot_is_unavailable() {
        let f = fixture();
        let result = f.coordinator
            .attempt_book(BookingRequest::new(f.customer.id, f.car.id, Uuid::new_v4()))
            .await;
        assert!(matches!(result, Err(BookingError::SlotUnavailable(_))));
    }

    #[tokio::test]
    async fn test_slot_of_another_vehicle_is_unavailable() {
        let f = fixture();
        let before = snapshot(&f.store).await;

        let result = f.coordinator
            .attempt_book(BookingRequest::new(f.customer.id, f.car.id, f.foreign_slot.id))
            .await;
        assert!(matches!(result, Err(BookingError::SlotUnavailable(_))));
        assert_eq!(snapshot(&f.store).await, before);
        assert!(f.store.get_slot(f.foreign_slot.id).await.unwrap().unwrap().is_open());
        assert_eq!(f.store.list_open_slots(f.other_car.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_customer_and_vehicle() {
        let f = fixture();
        let before = snapshot(&f.store).await;

        let ghost = Uuid::new_v4();
        let result = f.coordinator
            .attempt_book(BookingRequest::new(ghost, f.car.id, f.slot.id))
            .await;
        assert!(matches!(result, Err(BookingError::UnknownCustomer(id)) if id == ghost));

        let result = f.coordinator
            .attempt_book(BookingRequest::new(f.customer.id, ghost, f.slot.id))
            .await;
        assert!(matches!(result, Err(BookingError::UnknownVehicle(id)) if id == ghost));

        assert_eq!(snapshot(&f.store).await, before);
    }

    #[tokio::test]
    async fn test_rejection_leaves_store_unchanged() {
        let f = fixture();
        f.coordinator
            .attempt_book(BookingRequest::new(f.customer.id, f.car.id, f.slot.id))
            .await
            .unwrap();
        let before = snapshot(&f.store).await;

        let result = f.coordinator
            .attempt_book(BookingRequest::new(f.other_customer.id, f.car.id, f.slot.id))
            .await;
        assert!(result.is_err());
        assert_eq!(snapshot(&f.store).await, before);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_attempts_single_winner() {
        let f = fixture();
        let coordinator = Arc::new(f.coordinator);
        let request = BookingRequest::new(f.customer.id, f.car.id, f.slot.id);

        let attempts: Vec<_> = (0..32)
            .map(|_| {
                let coordinator = coordinator.clone();
                tokio::spawn(async move { coordinator.attempt_book(request).await })
            })
            .collect();

        let mut wins = 0;
        let mut unavailable = 0;
        for attempt in attempts {
            match attempt.await.unwrap() {
                Ok(_) => wins += 1,
                Err(BookingError::SlotUnavailable(_)) => unavailable += 1,
                Err(other) => panic!("Unexpected error: {:?}", other),
            }
        }

        assert_eq!(wins, 1);
        assert_eq!(unavailable, 31);
        let ledger = f.store.all().await.unwrap();
        assert_eq!(ledger.iter().filter(|b| b.slot_id == f.slot.id).count(), 1);
    }

    #[tokio::test]
    async fn test_booking_event_published() {
        let f = fixture();
        let (tx, mut rx) = broadcast::channel(8);
        let coordinator = f.coordinator.with_events(tx);

        let booking = coordinator
            .attempt_book(BookingRequest::new(f.customer.id, f.car.id, f.slot.id))
            .await
            .unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.booking_id, booking.id);
        assert_eq!(event.slot_id, f.slot.id);
        assert_eq!(event.car_id, f.car.id);
    }

    /// Delegates to a `MemoryStore`, except that the first `book` stalls and
    /// then fails without touching anything.
    struct FlakyStore {
        inner: Arc<MemoryStore>,
        stalled: AtomicBool,
    }

    #[async_trait]
    impl SlotStore for FlakyStore {
        async fn list_open_slots(&self, car_id: Uuid) -> StoreResult<Vec<Slot>> {
            self.inner.list_open_slots(car_id).await
        }

        async fn list_all_open_slots(&self) -> StoreResult<Vec<Slot>> {
            self.inner.list_all_open_slots().await
        }

        async fn get_slot(&self, id: Uuid) -> StoreResult<Option<Slot>> {
            self.inner.get_slot(id).await
        }

        async fn mark_booked(&self, slot_id: Uuid, car_id: Uuid) -> StoreResult<Slot> {
            self.inner.mark_booked(slot_id, car_id).await
        }

        async fn book(&self, booking: &Booking) -> StoreResult<Slot> {
            if !self.stalled.swap(true, Ordering::SeqCst) {
                tokio::time::sleep(StdDuration::from_millis(100)).await;
                return Err(StoreError::Backend("transient".to_string()));
            }
            self.inner.book(booking).await
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_failed_attempt_does_not_block_concurrent_one() {
        let f = fixture();
        let flaky = Arc::new(FlakyStore { inner: f.store.clone(), stalled: AtomicBool::new(false) });
        let coordinator = Arc::new(BookingCoordinator::new(f.store.clone(), f.store.clone(), flaky));

        let first = {
            let coordinator = coordinator.clone();
            let request = BookingRequest::new(f.customer.id, f.car.id, f.slot.id);
            tokio::spawn(async move { coordinator.attempt_book(request).await })
        };
        tokio::time::sleep(StdDuration::from_millis(20)).await;

        // While the first attempt is pending the slot is still open
        assert!(f.store.get_slot(f.slot.id).await.unwrap().unwrap().is_open());
        assert!(f.store.all().await.unwrap().is_empty());

        let second = coordinator
            .attempt_book(BookingRequest::new(f.other_customer.id, f.car.id, f.slot.id))
            .await
            .unwrap();

        let first = first.await.unwrap();
        assert!(matches!(first, Err(BookingError::Store(StoreError::Backend(_)))));

        assert_eq!(second.customer_id, f.other_customer.id);
        assert!(!f.store.get_slot(f.slot.id).await.unwrap().unwrap().is_open());
        assert_eq!(f.store.all().await.unwrap(), vec![second]);
    }

    #[tokio::test]
    async fn test_store_failure_leaves_slot_open() {
        let f = fixture();
        let flaky = Arc::new(FlakyStore { inner: f.store.clone(), stalled: AtomicBool::new(false) });
        let coordinator = BookingCoordinator::new(f.store.clone(), f.store.clone(), flaky);
        let before = snapshot(&f.store).await;

        let result = coordinator
            .attempt_book(BookingRequest::new(f.customer.id, f.car.id, f.slot.id))
            .await;
        assert!(matches!(result, Err(BookingError::Store(StoreError::Backend(_)))));
        assert_eq!(snapshot(&f.store).await, before);
    }
}
