use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use elite_core::{BookingLedger, CustomerDirectory, SlotStore, StoreResult, VehicleCatalog};
use elite_shared::{Booking, BookingHistoryEntry, BookingOverview, Customer, Vehicle};
use crate::coordinator::BookingError;

/// Read side of the ledger: bookings joined with vehicle, slot and customer
pub struct BookingHistory {
    customers: Arc<dyn CustomerDirectory>,
    catalog: Arc<dyn VehicleCatalog>,
    slots: Arc<dyn SlotStore>,
    ledger: Arc<dyn BookingLedger>,
}

impl BookingHistory {
    pub fn new(
        customers: Arc<dyn CustomerDirectory>,
        catalog: Arc<dyn VehicleCatalog>,
        slots: Arc<dyn SlotStore>,
        ledger: Arc<dyn BookingLedger>,
    ) -> Self {
        Self { customers, catalog, slots, ledger }
    }

    /// A customer's bookings, ascending by slot start time
    pub async fn history_for(&self, customer_id: Uuid) -> Result<Vec<BookingHistoryEntry>, BookingError> {
        if self.customers.get_customer(customer_id).await?.is_none() {
            return Err(BookingError::UnknownCustomer(customer_id));
        }

        let bookings = self.ledger.bookings_for(customer_id).await?;
        let mut entries = self.join(bookings).await?;
        sort_by_slot_start(&mut entries);
        Ok(entries)
    }

    /// Every booking in the ledger with customer details, same ordering
    pub async fn all_bookings(&self) -> Result<Vec<BookingOverview>, BookingError> {
        let bookings = self.ledger.all().await?;
        let mut entries = self.join(bookings).await?;
        sort_by_slot_start(&mut entries);

        let customers: HashMap<Uuid, Customer> = self
            .customers
            .list_customers()
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(entries
            .into_iter()
            .map(|entry| {
                let customer_details = customers.get(&entry.booking.customer_id).cloned();
                BookingOverview { entry, customer_details }
            })
            .collect())
    }

    async fn join(&self, bookings: Vec<Booking>) -> StoreResult<Vec<BookingHistoryEntry>> {
        let vehicles: HashMap<Uuid, Vehicle> = self
            .catalog
            .list_vehicles()
            .await?
            .into_iter()
            .map(|v| (v.id, v))
            .collect();

        let mut entries = Vec::with_capacity(bookings.len());
        for booking in bookings {
            let slot_details = self.slots.get_slot(booking.slot_id).await?;
            let car_details = vehicles.get(&booking.car_id).cloned();
            entries.push(BookingHistoryEntry { booking, car_details, slot_details });
        }
        Ok(entries)
    }
}

/// Unresolvable slots sort last; ties fall back to booking time.
fn sort_by_slot_start(entries: &mut [BookingHistoryEntry]) {
    entries.sort_by_key(|entry| {
        let start = entry.slot_start();
        (start.is_none(), start, entry.booking.booked_at)
    });
}
