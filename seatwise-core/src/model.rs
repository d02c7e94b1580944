use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scheduled flight. Owns its seats; `flight_name` is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub id: Uuid,
    pub flight_name: String,
    pub origin: String,
    pub destination: String,
    // Wall-clock schedule times, no timezone attached
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A bookable seat on a flight. `is_reserved` is a cache of booking
/// state; the booked_seats ledger is the source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    pub id: Uuid,
    pub flight_id: Uuid,
    pub seat_name: String,
    pub is_reserved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Authoritative booking record. At most one row may exist per
/// (seat_id, flight_id) pair; the storage layer enforces this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedSeat {
    pub id: Uuid,
    pub seat_id: Uuid,
    pub flight_id: Uuid,
    pub booked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub booking_id: Uuid,
    pub flight_id: Uuid,
    pub seat_id: Uuid,
}
