use std::convert::Infallible;
use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Json, Router,
};
use futures_util::stream::{Stream, StreamExt};
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;
use elite_booking::parse_id;
use elite_shared::Slot;
use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/schedules/car/{id}", get(car_schedule))
        .route("/schedules/car/{id}/stream", get(car_schedule_stream))
}

async fn known_car(state: &AppState, id: &str) -> Result<Uuid, AppError> {
    let car_id = parse_id("car_id", id)?;
    if state.catalog.get_vehicle(car_id).await?.is_none() {
        return Err(AppError::NotFoundError(format!("Vehicle not found: {}", car_id)));
    }
    Ok(car_id)
}

/// GET /api/schedules/car/{id}
/// Open viewing slots, earliest first
async fn car_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Slot>>, AppError> {
    let car_id = known_car(&state, &id).await?;
    Ok(Json(state.slots.list_open_slots(car_id).await?))
}

/// GET /api/schedules/car/{id}/stream
/// Server-sent `slot_booked` events for one vehicle
async fn car_schedule_stream(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let car_id = known_car(&state, &id).await?;
    let rx = state.sse_tx.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(move |result| async move {
        match result {
            Ok(event) if event.car_id == car_id => Event::default()
                .event("slot_booked")
                .json_data(&event)
                .ok()
                .map(Ok),
            // Other vehicles, or a lagging receiver
            _ => None,
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
