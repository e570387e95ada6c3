use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;
use elite_shared::{Booking, Customer, ServiceRecord, Slot, SlotStatus, Vehicle, VehicleSpecs};
use crate::app_config::SeedConfig;

/// Initial contents of a store
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub vehicles: Vec<Vehicle>,
    pub customers: Vec<Customer>,
    pub slots: Vec<Slot>,
    pub services: Vec<ServiceRecord>,
    pub bookings: Vec<Booking>,
}

impl SeedData {
    /// The demo showroom: catalog, customers, a week of slots, service records
    /// and three test drives already booked for the first customer.
    pub fn showroom(config: &SeedConfig, now: DateTime<Utc>) -> Self {
        let vehicles = showroom_vehicles();
        let customers = showroom_customers();
        let mut slots = daily_slots(&vehicles, config, now);
        let services = service_records(&vehicles, now);

        let mut bookings = Vec::new();
        if let Some(regular) = customers.first() {
            for slot in slots.iter_mut().take(3) {
                slot.status = SlotStatus::Booked;
                bookings.push(Booking::confirmed(regular.id, slot.car_id, slot.id, now));
            }
        }

        Self { vehicles, customers, slots, services, bookings }
    }
}

fn car(brand: &str, model: &str, year: i32, price: i64, hp: i32, engine: &str, category: &str) -> Vehicle {
    Vehicle::new(brand, model, year, category, price, VehicleSpecs { hp, engine: engine.to_string() })
}

fn showroom_vehicles() -> Vec<Vehicle> {
    vec![
        car("Ferrari", "SF90 Stradale", 2024, 625_000, 986, "V8 Hybrid", "Supercar"),
        car("Lamborghini", "Revuelto", 2024, 608_000, 1001, "V12 Hybrid", "Supercar"),
        car("Porsche", "911 GT3 RS", 2024, 241_300, 518, "4.0L Flat-6", "GT"),
        car("Aston Martin", "Valhalla", 2025, 800_000, 937, "V8 Hybrid", "Supercar"),
        car("Tesla", "Model S Plaid", 2024, 108_990, 1020, "Electric Tri-Motor", "Sedan"),
        car("Rolls-Royce", "Spectre", 2024, 420_000, 577, "Electric", "Luxury"),
        car("Bentley", "Continental GT Speed", 2024, 302_000, 650, "W12", "GT"),
        car("Mercedes-AMG", "ONE", 2023, 2_720_000, 1049, "V6 Hybrid F1", "Hypercar"),
        car("Bugatti", "Chiron Super Sport", 2023, 3_825_000, 1578, "W16 Quad-Turbo", "Hypercar"),
        car("Pagani", "Utopia", 2024, 2_190_000, 852, "V12 Twin-Turbo", "Hypercar"),
    ]
}

fn showroom_customers() -> Vec<Customer> {
    vec![
        Customer::new("Avi Levi", "+972-50-1234567", "VIP"),
        Customer::new("Noa Mizrahi", "+972-52-7654321", "Platinum"),
        Customer::new("Eyal Biton", "+972-54-1112223", "Gold"),
        Customer::new("Yael Ashkenazi", "+972-50-9988776", "VIP"),
        Customer::new("Omer Cohen", "+972-53-4455667", "Platinum"),
    ]
}

fn daily_slots(vehicles: &[Vehicle], config: &SeedConfig, now: DateTime<Utc>) -> Vec<Slot> {
    let today = now.date_naive();
    let length = Duration::minutes(config.slot_minutes);
    let mut slots = Vec::new();

    for vehicle in vehicles {
        for day in 0..config.days {
            let date = today + Duration::days(i64::from(day));
            // Hours outside 0..24 are skipped
            let starts = config
                .hours
                .iter()
                .filter_map(|&hour| date.and_hms_opt(hour, 0, 0))
                .map(|start| start.and_utc());
            for start in starts {
                slots.push(Slot::open(vehicle.id, start, length));
            }
        }
    }
    slots
}

fn service_records(vehicles: &[Vehicle], now: DateTime<Utc>) -> Vec<ServiceRecord> {
    if vehicles.is_empty() {
        return Vec::new();
    }

    (0..5usize)
        .map(|i| ServiceRecord {
            id: Uuid::new_v4(),
            car_id: vehicles[(i * 3) % vehicles.len()].id,
            date: now - Duration::days(30 + 60 * i as i64),
            description: "Routine Maintenance".to_string(),
            cost: 1_000 + 800 * i as i64,
            next_service_due: i % 2 == 0,
        })
        .collect()
}
