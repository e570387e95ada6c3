use std::collections::HashMap;
use axum::{extract::State, routing::get, Json, Router};
use uuid::Uuid;
use elite_shared::{ServiceAlert, Vehicle};
use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/services/due", get(due_services))
}

/// GET /api/services/due
async fn due_services(State(state): State<AppState>) -> Result<Json<Vec<ServiceAlert>>, AppError> {
    let records = state.services.due_services().await?;
    let vehicles: HashMap<Uuid, Vehicle> = state
        .catalog
        .list_vehicles()
        .await?
        .into_iter()
        .map(|v| (v.id, v))
        .collect();

    let alerts = records
        .into_iter()
        .map(|record| {
            let car_details = vehicles.get(&record.car_id).cloned();
            ServiceAlert { record, car_details }
        })
        .collect();

    Ok(Json(alerts))
}
