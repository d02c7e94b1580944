use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use seatwise_core::error::BookingError;
use seatwise_core::model::{Flight, Seat};
use seatwise_core::repository::{FlightStore, SeatStore};

/// Wall-clock schedule format accepted at the boundary: dd-MM-yyyy HH:mm
const SCHEDULE_FORMAT: &str = "%d-%m-%Y %H:%M";

#[derive(Debug, Clone, Deserialize)]
pub struct FlightRequest {
    pub flight_name: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeatRequest {
    pub seat_name: String,
}

/// A flight together with its currently unreserved seats.
#[derive(Debug, Serialize)]
pub struct FlightDetails {
    pub flight: Flight,
    pub available_seats: Vec<Seat>,
}

/// Flight and seat management. No concurrency hazard here; booking goes
/// through the coordinator.
pub struct FlightManager {
    flights: Arc<dyn FlightStore>,
    seats: Arc<dyn SeatStore>,
}

impl FlightManager {
    pub fn new(flights: Arc<dyn FlightStore>, seats: Arc<dyn SeatStore>) -> Self {
        Self { flights, seats }
    }

    pub async fn create_flight(&self, request: &FlightRequest) -> Result<Flight, BookingError> {
        if self
            .flights
            .find_by_name(&request.flight_name)
            .await
            .map_err(BookingError::storage)?
            .is_some()
        {
            return Err(BookingError::FlightAlreadyExists);
        }

        let (departure_time, arrival_time) =
            parse_schedule(&request.departure_time, &request.arrival_time)?;

        let now = Utc::now();
        let flight = Flight {
            id: Uuid::new_v4(),
            flight_name: request.flight_name.clone(),
            origin: request.origin.clone(),
            destination: request.destination.clone(),
            departure_time,
            arrival_time,
            price: request.price,
            created_at: now,
            updated_at: now,
        };

        self.flights
            .save_flight(&flight)
            .await
            .map_err(BookingError::storage)?;

        info!(
            "Flight {} with id {} created successfully",
            flight.flight_name, flight.id
        );
        Ok(flight)
    }

    pub async fn update_flight(
        &self,
        flight_id: Uuid,
        request: &FlightRequest,
    ) -> Result<Flight, BookingError> {
        let mut flight = self
            .flights
            .find_flight(flight_id)
            .await
            .map_err(BookingError::storage)?
            .ok_or(BookingError::FlightNotFound)?;

        let (departure_time, arrival_time) =
            parse_schedule(&request.departure_time, &request.arrival_time)?;

        flight.flight_name = request.flight_name.clone();
        flight.origin = request.origin.clone();
        flight.destination = request.destination.clone();
        flight.departure_time = departure_time;
        flight.arrival_time = arrival_time;
        flight.price = request.price;
        flight.updated_at = Utc::now();

        self.flights
            .update_flight(&flight)
            .await
            .map_err(BookingError::storage)?;

        info!(
            "Flight {} with id {} updated successfully",
            flight.flight_name, flight.id
        );
        Ok(flight)
    }

    pub async fn delete_flight(&self, flight_id: Uuid) -> Result<(), BookingError> {
        let flight = self
            .flights
            .find_flight(flight_id)
            .await
            .map_err(BookingError::storage)?
            .ok_or(BookingError::FlightNotFound)?;

        self.flights
            .delete_flight(flight_id)
            .await
            .map_err(BookingError::storage)?;

        info!(
            "Flight {} with id {} deleted successfully",
            flight.flight_name, flight.id
        );
        Ok(())
    }

    pub async fn add_seat(
        &self,
        flight_id: Uuid,
        request: &SeatRequest,
    ) -> Result<Seat, BookingError> {
        let flight = self
            .flights
            .find_flight(flight_id)
            .await
            .map_err(BookingError::storage)?
            .ok_or(BookingError::FlightNotFound)?;

        if self
            .seats
            .find_by_name(&request.seat_name, flight.id)
            .await
            .map_err(BookingError::storage)?
            .is_some()
        {
            error!(
                "Seat {} already exists in flight {}",
                request.seat_name, flight.id
            );
            return Err(BookingError::SeatAlreadyExists);
        }

        let now = Utc::now();
        let seat = Seat {
            id: Uuid::new_v4(),
            flight_id: flight.id,
            seat_name: request.seat_name.clone(),
            is_reserved: false,
            created_at: now,
            updated_at: now,
        };

        self.seats
            .save_seat(&seat)
            .await
            .map_err(BookingError::storage)?;

        info!(
            "Seat {} with id {} added to flight {} successfully",
            seat.seat_name, seat.id, flight.id
        );
        Ok(seat)
    }

    pub async fn update_seat(
        &self,
        flight_id: Uuid,
        seat_id: Uuid,
        request: &SeatRequest,
    ) -> Result<Seat, BookingError> {
        let flight = self
            .flights
            .find_flight(flight_id)
            .await
            .map_err(BookingError::storage)?
            .ok_or(BookingError::FlightNotFound)?;

        let mut seat = self
            .seats
            .find_seat(seat_id, flight.id)
            .await
            .map_err(BookingError::storage)?
            .ok_or(BookingError::SeatNotFound)?;

        seat.seat_name = request.seat_name.clone();
        seat.updated_at = Utc::now();

        self.seats
            .update_seat(&seat)
            .await
            .map_err(BookingError::storage)?;

        info!(
            "Seat {} updated to {} for flight {} successfully",
            seat.id, seat.seat_name, flight.id
        );
        Ok(seat)
    }

    pub async fn delete_seat(&self, flight_id: Uuid, seat_id: Uuid) -> Result<(), BookingError> {
        let flight = self
            .flights
            .find_flight(flight_id)
            .await
            .map_err(BookingError::storage)?
            .ok_or(BookingError::FlightNotFound)?;

        let seat = self
            .seats
            .find_seat(seat_id, flight.id)
            .await
            .map_err(BookingError::storage)?
            .ok_or(BookingError::SeatNotFound)?;

        self.seats
            .delete_seat(seat_id)
            .await
            .map_err(BookingError::storage)?;

        info!(
            "Seat {} deleted from flight {} successfully",
            seat.seat_name, flight.id
        );
        Ok(())
    }

    /// All flights, each with its unreserved seats.
    pub async fn list_flights(&self) -> Result<Vec<FlightDetails>, BookingError> {
        let flights = self
            .flights
            .list_flights()
            .await
            .map_err(BookingError::storage)?;

        let mut details = Vec::with_capacity(flights.len());
        for flight in flights {
            let available_seats = self
                .seats
                .list_available(flight.id)
                .await
                .map_err(BookingError::storage)?;
            details.push(FlightDetails {
                flight,
                available_seats,
            });
        }

        Ok(details)
    }
}

fn parse_schedule(
    departure: &str,
    arrival: &str,
) -> Result<(NaiveDateTime, NaiveDateTime), BookingError> {
    let departure_time = NaiveDateTime::parse_from_str(departure, SCHEDULE_FORMAT)
        .map_err(|e| {
            error!("Date format error: {}", e);
            BookingError::DateFormat
        })?;
    let arrival_time = NaiveDateTime::parse_from_str(arrival, SCHEDULE_FORMAT).map_err(|e| {
        error!("Date format error: {}", e);
        BookingError::DateFormat
    })?;
    Ok((departure_time, arrival_time))
}
