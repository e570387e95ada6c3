use serde::Deserialize;
use elite_shared::{Slot, Vehicle};

/// Gallery filter: free-text search plus an optional brand
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleQuery {
    pub q: Option<String>,
    pub brand: Option<String>,
}

impl VehicleQuery {
    fn search_term(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }

    fn brand_filter(&self) -> Option<&str> {
        self.brand
            .as_deref()
            .map(str::trim)
            .filter(|brand| !brand.is_empty() && !brand.eq_ignore_ascii_case("all"))
    }

    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        let matches_search = match self.search_term() {
            Some(term) => {
                vehicle.brand.to_lowercase().contains(&term)
                    || vehicle.model.to_lowercase().contains(&term)
            }
            None => true,
        };
        let matches_brand = match self.brand_filter() {
            Some(brand) => vehicle.brand.eq_ignore_ascii_case(brand),
            None => true,
        };
        matches_search && matches_brand
    }
}

/// Filter a catalog snapshot. Order is preserved.
pub fn filter_vehicles(vehicles: Vec<Vehicle>, query: &VehicleQuery) -> Vec<Vehicle> {
    vehicles.into_iter().filter(|v| query.matches(v)).collect()
}

/// Distinct brands in first-seen order
pub fn brands(vehicles: &[Vehicle]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for vehicle in vehicles {
        if !seen.iter().any(|b| b == &vehicle.brand) {
            seen.push(vehicle.brand.clone());
        }
    }
    seen
}

/// Vehicles with at least one open slot, in catalog order
pub fn with_open_slots(vehicles: Vec<Vehicle>, open_slots: &[Slot]) -> Vec<Vehicle> {
    vehicles
        .into_iter()
        .filter(|v| open_slots.iter().any(|s| s.car_id == v.id && s.is_open()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use elite_shared::VehicleSpecs;

    fn car(brand: &str, model: &str) -> Vehicle {
        Vehicle::new(brand, model, 2024, "GT", 100_000, VehicleSpecs { hp: 500, engine: "V8".into() })
    }

    fn catalog() -> Vec<Vehicle> {
        vec![
            car("Ferrari", "SF90 Stradale"),
            car("Porsche", "911 GT3 RS"),
            car("Bentley", "Continental GT Speed"),
            car("Ferrari", "Purosangue"),
        ]
    }

    #[test]
    fn test_search_matches_brand_or_model_case_insensitive() {
        let query = VehicleQuery { q: Some("gt".into()), brand: None };
        let found = filter_vehicles(catalog(), &query);
        let models: Vec<&str> = found.iter().map(|v| v.model.as_str()).collect();
        assert_eq!(models, vec!["911 GT3 RS", "Continental GT Speed"]);

        let query = VehicleQuery { q: Some("FERR".into()), brand: None };
        assert_eq!(filter_vehicles(catalog(), &query).len(), 2);
    }

    #[test]
    fn test_brand_filter_and_all() {
        let query = VehicleQuery { q: None, brand: Some("ferrari".into()) };
        assert_eq!(filter_vehicles(catalog(), &query).len(), 2);

        let query = VehicleQuery { q: None, brand: Some("All".into()) };
        assert_eq!(filter_vehicles(catalog(), &query).len(), 4);

        let query = VehicleQuery { q: Some("sf90".into()), brand: Some("Porsche".into()) };
        assert!(filter_vehicles(catalog(), &query).is_empty());
    }

    #[test]
    fn test_empty_query_keeps_everything() {
        let cars = catalog();
        let query = VehicleQuery { q: Some("   ".into()), brand: Some(String::new()) };
        assert_eq!(filter_vehicles(cars.clone(), &query), cars);
    }

    #[test]
    fn test_brands_first_seen_order() {
        assert_eq!(brands(&catalog()), vec!["Ferrari", "Porsche", "Bentley"]);
    }

    #[test]
    fn test_with_open_slots() {
        let cars = catalog();
        let mut booked = Slot::open(cars[0].id, Utc::now(), Duration::hours(1));
        booked.status = elite_shared::SlotStatus::Booked;
        let open = Slot::open(cars[2].id, Utc::now(), Duration::hours(1));

        let available = with_open_slots(cars.clone(), &[booked, open]);
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, cars[2].id);
    }

    #[test]
    fn test_query_deserializes_from_params() {
        let query: VehicleQuery = serde_json::from_str(r#"{"q": "plaid"}"#).unwrap();
        assert_eq!(query.q.as_deref(), Some("plaid"));
        assert!(query.brand.is_none());
    }
}
