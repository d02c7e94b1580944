use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{BookedSeat, Flight, Seat};

/// Repository trait for flight data access
#[async_trait]
pub trait FlightStore: Send + Sync {
    async fn find_flight(
        &self,
        flight_id: Uuid,
    ) -> Result<Option<Flight>, Box<dyn std::error::Error + Send + Sync>>;

    async fn find_by_name(
        &self,
        flight_name: &str,
    ) -> Result<Option<Flight>, Box<dyn std::error::Error + Send + Sync>>;

    async fn save_flight(
        &self,
        flight: &Flight,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn update_flight(
        &self,
        flight: &Flight,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn delete_flight(
        &self,
        flight_id: Uuid,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn list_flights(
        &self,
    ) -> Result<Vec<Flight>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for seat data access
#[async_trait]
pub trait SeatStore: Send + Sync {
    /// Composite lookup: the seat must belong to the given flight.
    async fn find_seat(
        &self,
        seat_id: Uuid,
        flight_id: Uuid,
    ) -> Result<Option<Seat>, Box<dyn std::error::Error + Send + Sync>>;

    async fn find_by_name(
        &self,
        seat_name: &str,
        flight_id: Uuid,
    ) -> Result<Option<Seat>, Box<dyn std::error::Error + Send + Sync>>;

    async fn save_seat(
        &self,
        seat: &Seat,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn update_seat(
        &self,
        seat: &Seat,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn delete_seat(
        &self,
        seat_id: Uuid,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Flip the cached reservation flag to true. Idempotent; safe to
    /// apply redundantly.
    async fn set_reserved(
        &self,
        seat_id: Uuid,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn list_available(
        &self,
        flight_id: Uuid,
    ) -> Result<Vec<Seat>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Ledger insert failure. `Duplicate` is detected by error identity
/// (unique-violation kind), never by message text.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("booking already exists for this seat")]
    Duplicate,

    #[error("ledger storage failure: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Durable booking ledger keyed by (seat, flight). The insert must be
/// atomic with respect to the uniqueness invariant under arbitrary
/// concurrent callers: of N racing inserts for the same pair, exactly
/// one succeeds and the rest fail with `Duplicate`.
#[async_trait]
pub trait BookingLedger: Send + Sync {
    async fn insert(&self, seat_id: Uuid, flight_id: Uuid) -> Result<Uuid, LedgerError>;

    async fn find(
        &self,
        seat_id: Uuid,
        flight_id: Uuid,
    ) -> Result<Option<BookedSeat>, LedgerError>;
}
