use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use seatwise_core::model::Seat;
use seatwise_core::repository::SeatStore;

pub struct PostgresSeatStore {
    pool: PgPool,
}

impl PostgresSeatStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct SeatRow {
    id: Uuid,
    flight_id: Uuid,
    seat_name: String,
    is_reserved: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SeatRow> for Seat {
    fn from(row: SeatRow) -> Self {
        Seat {
            id: row.id,
            flight_id: row.flight_id,
            seat_name: row.seat_name,
            is_reserved: row.is_reserved,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SEAT_COLUMNS: &str = "id, flight_id, seat_name, is_reserved, created_at, updated_at";

#[async_trait]
impl SeatStore for PostgresSeatStore {
    async fn find_seat(
        &self,
        seat_id: Uuid,
        flight_id: Uuid,
    ) -> Result<Option<Seat>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, SeatRow>(&format!(
            "SELECT {SEAT_COLUMNS} FROM seats WHERE id = $1 AND flight_id = $2"
        ))
        .bind(seat_id)
        .bind(flight_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Seat::from))
    }

    async fn find_by_name(
        &self,
        seat_name: &str,
        flight_id: Uuid,
    ) -> Result<Option<Seat>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, SeatRow>(&format!(
            "SELECT {SEAT_COLUMNS} FROM seats WHERE seat_name = $1 AND flight_id = $2"
        ))
        .bind(seat_name)
        .bind(flight_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Seat::from))
    }

    async fn save_seat(
        &self,
        seat: &Seat,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            INSERT INTO seats (id, flight_id, seat_name, is_reserved, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(seat.id)
        .bind(seat.flight_id)
        .bind(&seat.seat_name)
        .bind(seat.is_reserved)
        .bind(seat.created_at)
        .bind(seat.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_seat(
        &self,
        seat: &Seat,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query("UPDATE seats SET seat_name = $1, updated_at = NOW() WHERE id = $2")
            .bind(&seat.seat_name)
            .bind(seat.id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_seat(
        &self,
        seat_id: Uuid,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query("DELETE FROM seats WHERE id = $1")
            .bind(seat_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn set_reserved(
        &self,
        seat_id: Uuid,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query("UPDATE seats SET is_reserved = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(seat_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_available(
        &self,
        flight_id: Uuid,
    ) -> Result<Vec<Seat>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = sqlx::query_as::<_, SeatRow>(&format!(
            "SELECT {SEAT_COLUMNS} FROM seats WHERE flight_id = $1 AND is_reserved = FALSE ORDER BY seat_name"
        ))
        .bind(flight_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Seat::from).collect())
    }
}
