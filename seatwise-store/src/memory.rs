//! Thread-safe in-memory implementations of the store traits, for tests
//! and single-process deployments where persistence is not required. The
//! ledger's mutex gives the same atomic insert-if-absent guarantee the
//! Postgres unique constraint provides.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use seatwise_core::model::{BookedSeat, Flight, Seat};
use seatwise_core::repository::{BookingLedger, FlightStore, LedgerError, SeatStore};

#[derive(Clone, Default)]
pub struct MemoryFlightStore {
    flights: Arc<RwLock<HashMap<Uuid, Flight>>>,
}

impl MemoryFlightStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FlightStore for MemoryFlightStore {
    async fn find_flight(
        &self,
        flight_id: Uuid,
    ) -> Result<Option<Flight>, Box<dyn std::error::Error + Send + Sync>> {
        let flights = self.flights.read().expect("RwLock poisoned");
        Ok(flights.get(&flight_id).cloned())
    }

    async fn find_by_name(
        &self,
        flight_name: &str,
    ) -> Result<Option<Flight>, Box<dyn std::error::Error + Send + Sync>> {
        let flights = self.flights.read().expect("RwLock poisoned");
        Ok(flights
            .values()
            .find(|f| f.flight_name == flight_name)
            .cloned())
    }

    async fn save_flight(
        &self,
        flight: &Flight,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut flights = self.flights.write().expect("RwLock poisoned");
        flights.insert(flight.id, flight.clone());
        Ok(())
    }

    async fn update_flight(
        &self,
        flight: &Flight,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut flights = self.flights.write().expect("RwLock poisoned");
        flights.insert(flight.id, flight.clone());
        Ok(())
    }

    async fn delete_flight(
        &self,
        flight_id: Uuid,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut flights = self.flights.write().expect("RwLock poisoned");
        flights.remove(&flight_id);
        Ok(())
    }

    async fn list_flights(
        &self,
    ) -> Result<Vec<Flight>, Box<dyn std::error::Error + Send + Sync>> {
        let flights = self.flights.read().expect("RwLock poisoned");
        let mut all: Vec<Flight> = flights.values().cloned().collect();
        all.sort_by_key(|f| f.departure_time);
        Ok(all)
    }
}

#[derive(Clone, Default)]
pub struct MemorySeatStore {
    seats: Arc<RwLock<HashMap<Uuid, Seat>>>,
}

impl MemorySeatStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SeatStore for MemorySeatStore {
    async fn find_seat(
        &self,
        seat_id: Uuid,
        flight_id: Uuid,
    ) -> Result<Option<Seat>, Box<dyn std::error::Error + Send + Sync>> {
        let seats = self.seats.read().expect("RwLock poisoned");
        Ok(seats
            .get(&seat_id)
            .filter(|s| s.flight_id == flight_id)
            .cloned())
    }

    async fn find_by_name(
        &self,
        seat_name: &str,
        flight_id: Uuid,
    ) -> Result<Option<Seat>, Box<dyn std::error::Error + Send + Sync>> {
        let seats = self.seats.read().expect("RwLock poisoned");
        Ok(seats
            .values()
            .find(|s| s.flight_id == flight_id && s.seat_name == seat_name)
            .cloned())
    }

    async fn save_seat(
        &self,
        seat: &Seat,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut seats = self.seats.write().expect("RwLock poisoned");
        seats.insert(seat.id, seat.clone());
        Ok(())
    }

    async fn update_seat(
        &self,
        seat: &Seat,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut seats = self.seats.write().expect("RwLock poisoned");
        if let Some(existing) = seats.get_mut(&seat.id) {
            existing.seat_name = seat.seat_name.clone();
            existing.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete_seat(
        &self,
        seat_id: Uuid,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut seats = self.seats.write().expect("RwLock poisoned");
        seats.remove(&seat_id);
        Ok(())
    }

    async fn set_reserved(
        &self,
        seat_id: Uuid,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut seats = self.seats.write().expect("RwLock poisoned");
        if let Some(seat) = seats.get_mut(&seat_id) {
            seat.is_reserved = true;
            seat.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn list_available(
        &self,
        flight_id: Uuid,
    ) -> Result<Vec<Seat>, Box<dyn std::error::Error + Send + Sync>> {
        let seats = self.seats.read().expect("RwLock poisoned");
        let mut available: Vec<Seat> = seats
            .values()
            .filter(|s| s.flight_id == flight_id && !s.is_reserved)
            .cloned()
            .collect();
        available.sort_by(|a, b| a.seat_name.cmp(&b.seat_name));
        Ok(available)
    }
}

/// In-memory ledger. The mutex around the map makes the
/// check-and-insert a single critical section, so of N concurrent
/// inserts for one (seat, flight) pair exactly one wins.
#[derive(Clone, Default)]
pub struct MemoryBookingLedger {
    bookings: Arc<Mutex<HashMap<(Uuid, Uuid), BookedSeat>>>,
}

impl MemoryBookingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn booking_for(&self, seat_id: Uuid, flight_id: Uuid) -> Option<Uuid> {
        let bookings = self.bookings.lock().expect("mutex poisoned");
        bookings.get(&(seat_id, flight_id)).map(|b| b.id)
    }

    pub fn count(&self) -> usize {
        let bookings = self.bookings.lock().expect("mutex poisoned");
        bookings.len()
    }
}

#[async_trait]
impl BookingLedger for MemoryBookingLedger {
    async fn insert(&self, seat_id: Uuid, flight_id: Uuid) -> Result<Uuid, LedgerError> {
        let mut bookings = self.bookings.lock().expect("mutex poisoned");
        if bookings.contains_key(&(seat_id, flight_id)) {
            return Err(LedgerError::Duplicate);
        }
        let record = BookedSeat {
            id: Uuid::new_v4(),
            seat_id,
            flight_id,
            booked_at: Utc::now(),
        };
        let booking_id = record.id;
        bookings.insert((seat_id, flight_id), record);
        Ok(booking_id)
    }

    async fn find(
        &self,
        seat_id: Uuid,
        flight_id: Uuid,
    ) -> Result<Option<BookedSeat>, LedgerError> {
        let bookings = self.bookings.lock().expect("mutex poisoned");
        Ok(bookings.get(&(seat_id, flight_id)).cloned())
    }
}
