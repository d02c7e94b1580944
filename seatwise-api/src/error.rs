use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use seatwise_core::{BookingError, TransactionCode};

use crate::response::ApiResponse;

/// Boundary wrapper around [`BookingError`]. Taxonomy failures map to
/// their stable code and HTTP status; storage faults are logged and
/// masked as a plain internal error.
#[derive(Debug)]
pub struct ApiError(pub BookingError);

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0.code() {
            Some(code) => {
                let status = match code {
                    TransactionCode::FlightNotFound | TransactionCode::SeatNotFound => {
                        StatusCode::NOT_FOUND
                    }
                    TransactionCode::PaymentError => StatusCode::INTERNAL_SERVER_ERROR,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, Json(ApiResponse::failure(code))).into_response()
            }
            None => {
                tracing::error!("Internal Server Error: {}", self.0);
                let body = Json(json!({
                    "error": "Internal Server Error",
                }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}
