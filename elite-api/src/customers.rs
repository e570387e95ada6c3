use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use elite_booking::parse_id;
use elite_shared::{BookingHistoryEntry, Customer};
use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers))
        .route("/customers/{id}/history", get(customer_history))
}

async fn list_customers(State(state): State<AppState>) -> Result<Json<Vec<Customer>>, AppError> {
    Ok(Json(state.customers.list_customers().await?))
}

/// GET /api/customers/{id}/history
/// Bookings with car and slot details, earliest slot first
async fn customer_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<BookingHistoryEntry>>, AppError> {
    let customer_id = parse_id("customer_id", &id)?;
    Ok(Json(state.history.history_for(customer_id).await?))
}
