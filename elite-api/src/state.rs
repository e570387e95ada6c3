use std::sync::Arc;
use tokio::sync::broadcast;
use elite_booking::{BookingCoordinator, BookingHistory};
use elite_core::{BookingLedger, CustomerDirectory, ServiceHistory, SlotStore, VehicleCatalog};
use elite_shared::SlotBookedEvent;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn VehicleCatalog>,
    pub customers: Arc<dyn CustomerDirectory>,
    pub slots: Arc<dyn SlotStore>,
    pub services: Arc<dyn ServiceHistory>,
    pub coordinator: Arc<BookingCoordinator>,
    pub history: Arc<BookingHistory>,
    pub sse_tx: broadcast::Sender<SlotBookedEvent>,
}

impl AppState {
    /// Wire every component to one backend
    pub fn new<S>(store: Arc<S>, sse_tx: broadcast::Sender<SlotBookedEvent>) -> Self
    where
        S: VehicleCatalog + CustomerDirectory + SlotStore + BookingLedger + ServiceHistory + 'static,
    {
        let coordinator = BookingCoordinator::new(store.clone(), store.clone(), store.clone())
            .with_events(sse_tx.clone());
        let history = BookingHistory::new(store.clone(), store.clone(), store.clone(), store.clone());

        Self {
            catalog: store.clone(),
            customers: store.clone(),
            slots: store.clone(),
            services: store,
            coordinator: Arc::new(coordinator),
            history: Arc::new(history),
            sse_tx,
        }
    }
}
