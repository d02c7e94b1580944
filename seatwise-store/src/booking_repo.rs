use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use seatwise_core::model::BookedSeat;
use seatwise_core::repository::{BookingLedger, LedgerError};

/// Ledger backed by the booked_seats table. The UNIQUE (seat_id,
/// flight_id) constraint makes the insert the serialization point: of N
/// concurrent inserts for the same pair, exactly one commits.
pub struct PostgresBookingLedger {
    pool: PgPool,
}

impl PostgresBookingLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct BookedSeatRow {
    id: Uuid,
    seat_id: Uuid,
    flight_id: Uuid,
    booked_at: DateTime<Utc>,
}

impl From<BookedSeatRow> for BookedSeat {
    fn from(row: BookedSeatRow) -> Self {
        BookedSeat {
            id: row.id,
            seat_id: row.seat_id,
            flight_id: row.flight_id,
            booked_at: row.booked_at,
        }
    }
}

#[async_trait]
impl BookingLedger for PostgresBookingLedger {
    async fn insert(&self, seat_id: Uuid, flight_id: Uuid) -> Result<Uuid, LedgerError> {
        let booking_id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO booked_seats (id, seat_id, flight_id, booked_at)
            VALUES ($1, $2, $3, NOW())
            "#,
        )
        .bind(booking_id)
        .bind(seat_id)
        .bind(flight_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // Classify by error identity, not message text
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return LedgerError::Duplicate;
                }
            }
            LedgerError::Storage(Box::new(e))
        })?;

        Ok(booking_id)
    }

    async fn find(
        &self,
        seat_id: Uuid,
        flight_id: Uuid,
    ) -> Result<Option<BookedSeat>, LedgerError> {
        let row = sqlx::query_as::<_, BookedSeatRow>(
            "SELECT id, seat_id, flight_id, booked_at FROM booked_seats WHERE seat_id = $1 AND flight_id = $2",
        )
        .bind(seat_id)
        .bind(flight_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LedgerError::Storage(Box::new(e)))?;

        Ok(row.map(BookedSeat::from))
    }
}
