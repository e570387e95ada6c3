use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;
use elite_booking::{BookingRequest, TestDriveRequest};
use elite_shared::{Booking, BookingOverview};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BookingConfirmation {
    pub message: String,
    pub booking_id: Uuid,
    pub booking: Booking,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/book-test-drive", post(book_test_drive))
        .route("/bookings", get(list_bookings))
}

/// POST /api/book-test-drive
async fn book_test_drive(
    State(state): State<AppState>,
    payload: Result<Json<TestDriveRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingConfirmation>), AppError> {
    let Json(raw) = payload?;
    let request = BookingRequest::try_from(raw)?;

    let booking = state.coordinator.attempt_book(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(BookingConfirmation {
            message: "Booking confirmed".to_string(),
            booking_id: booking.id,
            booking,
        }),
    ))
}

/// GET /api/bookings
async fn list_bookings(State(state): State<AppState>) -> Result<Json<Vec<BookingOverview>>, AppError> {
    Ok(Json(state.history.all_bookings().await?))
}
