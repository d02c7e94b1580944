use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use seatwise_booking::{FlightDetails, FlightRequest, SeatRequest};

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct FlightCreatedData {
    flight_id: Uuid,
    message: String,
}

#[derive(Debug, Serialize)]
struct SeatAddedData {
    seat_id: Uuid,
    message: String,
}

#[derive(Debug, Serialize)]
struct MessageData {
    message: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/flight/create", post(create_flight))
        .route("/flight/all", get(all_flights))
        .route("/flight/{flight_id}", put(update_flight).delete(delete_flight))
        .route("/flight/add/seat/{flight_id}", post(add_seat))
        .route(
            "/flight/{flight_id}/seat/{seat_id}",
            put(update_seat).delete(delete_seat),
        )
}

async fn create_flight(
    State(state): State<AppState>,
    Json(request): Json<FlightRequest>,
) -> Result<Json<ApiResponse<FlightCreatedData>>, ApiError> {
    let flight = state.flights.create_flight(&request).await?;
    Ok(Json(ApiResponse::success(FlightCreatedData {
        flight_id: flight.id,
        message: "Flight created successfully".to_string(),
    })))
}

async fn update_flight(
    State(state): State<AppState>,
    Path(flight_id): Path<Uuid>,
    Json(request): Json<FlightRequest>,
) -> Result<Json<ApiResponse<MessageData>>, ApiError> {
    state.flights.update_flight(flight_id, &request).await?;
    Ok(Json(ApiResponse::success(MessageData {
        message: format!("Flight {} updated successfully", flight_id),
    })))
}

async fn delete_flight(
    State(state): State<AppState>,
    Path(flight_id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageData>>, ApiError> {
    state.flights.delete_flight(flight_id).await?;
    Ok(Json(ApiResponse::success(MessageData {
        message: "Flight deleted successfully".to_string(),
    })))
}

async fn add_seat(
    State(state): State<AppState>,
    Path(flight_id): Path<Uuid>,
    Json(request): Json<SeatRequest>,
) -> Result<Json<ApiResponse<SeatAddedData>>, ApiError> {
    let seat = state.flights.add_seat(flight_id, &request).await?;
    Ok(Json(ApiResponse::success(SeatAddedData {
        seat_id: seat.id,
        message: format!("Seat added to flight {} successfully", flight_id),
    })))
}

async fn update_seat(
    State(state): State<AppState>,
    Path((flight_id, seat_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<SeatRequest>,
) -> Result<Json<ApiResponse<MessageData>>, ApiError> {
    state.flights.update_seat(flight_id, seat_id, &request).await?;
    Ok(Json(ApiResponse::success(MessageData {
        message: format!("Seat {} updated for flight {} successfully", seat_id, flight_id),
    })))
}

async fn delete_seat(
    State(state): State<AppState>,
    Path((flight_id, seat_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<MessageData>>, ApiError> {
    state.flights.delete_seat(flight_id, seat_id).await?;
    Ok(Json(ApiResponse::success(MessageData {
        message: format!("Seat {} deleted successfully", seat_id),
    })))
}

async fn all_flights(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<FlightDetails>>>, ApiError> {
    let flights = state.flights.list_flights().await?;
    Ok(Json(ApiResponse::success(flights)))
}
