use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use seatwise_core::payment::CardDetails;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct BookingData {
    booking_id: Uuid,
    flight_id: Uuid,
    seat_id: Uuid,
    message: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/flight/{flight_id}/book/{seat_id}", post(book_seat))
        .route(
            "/flight/{flight_id}/book/{seat_id}/card",
            post(book_seat_with_card),
        )
}

/// Book with the default gateway charge (no card data in the request).
async fn book_seat(
    State(state): State<AppState>,
    Path((flight_id, seat_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<BookingData>>, ApiError> {
    let confirmation = state.coordinator.book(flight_id, seat_id, None).await?;

    info!("Booking confirmed: {}", confirmation.booking_id);
    Ok(Json(ApiResponse::success(BookingData {
        booking_id: confirmation.booking_id,
        flight_id: confirmation.flight_id,
        seat_id: confirmation.seat_id,
        message: format!("Seat {} booked successfully", seat_id),
    })))
}

/// Book with the buyer's card details passed through to the provider.
async fn book_seat_with_card(
    State(state): State<AppState>,
    Path((flight_id, seat_id)): Path<(Uuid, Uuid)>,
    Json(card): Json<CardDetails>,
) -> Result<Json<ApiResponse<BookingData>>, ApiError> {
    let confirmation = state
        .coordinator
        .book(flight_id, seat_id, Some(card))
        .await?;

    info!("Booking confirmed: {}", confirmation.booking_id);
    Ok(Json(ApiResponse::success(BookingData {
        booking_id: confirmation.booking_id,
        flight_id: confirmation.flight_id,
        seat_id: confirmation.seat_id,
        message: format!("Seat {} booked successfully", seat_id),
    })))
}
