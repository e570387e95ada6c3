use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use elite_booking::parse_id;
use elite_core::search::{filter_vehicles, with_open_slots, VehicleQuery};
use elite_shared::Vehicle;
use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cars", get(list_cars))
        .route("/cars/availability", get(available_cars))
        .route("/cars/brand/{brand}", get(cars_by_brand))
        .route("/cars/{id}", get(get_car))
}

/// GET /api/cars?q=&brand=
async fn list_cars(
    State(state): State<AppState>,
    Query(query): Query<VehicleQuery>,
) -> Result<Json<Vec<Vehicle>>, AppError> {
    let vehicles = state.catalog.list_vehicles().await?;
    Ok(Json(filter_vehicles(vehicles, &query)))
}

/// GET /api/cars/{id}
async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vehicle>, AppError> {
    let car_id = parse_id("car_id", &id)?;
    let vehicle = state
        .catalog
        .get_vehicle(car_id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("Vehicle not found: {}", car_id)))?;
    Ok(Json(vehicle))
}

/// GET /api/cars/brand/{brand}
/// Exact brand match, ignoring case
async fn cars_by_brand(
    State(state): State<AppState>,
    Path(brand): Path<String>,
) -> Result<Json<Vec<Vehicle>>, AppError> {
    let vehicles = state.catalog.list_vehicles().await?;
    Ok(Json(
        vehicles
            .into_iter()
            .filter(|v| v.brand.eq_ignore_ascii_case(&brand))
            .collect(),
    ))
}

/// GET /api/cars/availability
/// Vehicles that still have at least one open slot
async fn available_cars(State(state): State<AppState>) -> Result<Json<Vec<Vehicle>>, AppError> {
    let vehicles = state.catalog.list_vehicles().await?;
    let open_slots = state.slots.list_all_open_slots().await?;
    Ok(Json(with_open_slots(vehicles, &open_slots)))
}
