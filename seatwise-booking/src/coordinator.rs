use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use seatwise_core::error::BookingError;
use seatwise_core::model::BookingConfirmation;
use seatwise_core::payment::{CardDetails, ChargeRequest, PaymentGateway};
use seatwise_core::repository::{BookingLedger, FlightStore, LedgerError, SeatStore};

/// Orchestrates a single-seat booking: lookup, fast-path rejection,
/// payment, ledger insertion, and reservation-flag sync.
///
/// Correctness does not rely on any in-process lock. The ledger insert
/// is the serialization point: its uniqueness guarantee decides the
/// winner among concurrent attempts on the same seat, so no lock is held
/// across the payment await and bookings for unrelated seats never block
/// each other.
#[derive(Clone)]
pub struct BookingCoordinator {
    flights: Arc<dyn FlightStore>,
    seats: Arc<dyn SeatStore>,
    ledger: Arc<dyn BookingLedger>,
    gateway: Arc<dyn PaymentGateway>,
}

impl BookingCoordinator {
    pub fn new(
        flights: Arc<dyn FlightStore>,
        seats: Arc<dyn SeatStore>,
        ledger: Arc<dyn BookingLedger>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            flights,
            seats,
            ledger,
            gateway,
        }
    }

    /// Book a seat, charging the flight's price through the payment
    /// gateway first. Exactly one of N concurrent calls for the same
    /// seat succeeds; the rest fail with `AlreadyBooked`.
    ///
    /// Known limitation: a caller whose charge completes but who then
    /// loses the insert race gets `AlreadyBooked` and the charge is not
    /// refunded.
    pub async fn book(
        &self,
        flight_id: Uuid,
        seat_id: Uuid,
        card: Option<CardDetails>,
    ) -> Result<BookingConfirmation, BookingError> {
        let flight = self
            .flights
            .find_flight(flight_id)
            .await
            .map_err(BookingError::storage)?
            .ok_or(BookingError::FlightNotFound)?;

        let seat = self
            .seats
            .find_seat(seat_id, flight_id)
            .await
            .map_err(BookingError::storage)?
            .ok_or(BookingError::SeatNotFound)?;

        // Fast path on the cached flag. Not atomic with the insert
        // below; a stale false here is resolved by the ledger.
        if seat.is_reserved {
            error!("Seat {} already booked for flight {}", seat_id, flight_id);
            return Err(BookingError::AlreadyBooked);
        }

        // Awaited to completion before any mutation; no booking is made
        // against an in-flight charge.
        let request = ChargeRequest {
            amount: flight.price,
            card,
        };
        self.gateway.charge(&request).await.map_err(|e| {
            error!("Payment error: {}", e);
            BookingError::Payment(e)
        })?;

        let booking_id = match self.ledger.insert(seat_id, flight_id).await {
            Ok(id) => id,
            Err(LedgerError::Duplicate) => {
                // Lost the race: a concurrent attempt committed first.
                error!("Seat {} already booked for flight {}", seat_id, flight_id);
                return Err(BookingError::AlreadyBooked);
            }
            Err(LedgerError::Storage(e)) => return Err(BookingError::Storage(e)),
        };

        // Cache sync only. The booking is already committed; a stale
        // flag costs one fast-path miss, never a double booking.
        if let Err(e) = self.seats.set_reserved(seat_id).await {
            warn!(
                "Failed to update reservation flag for seat {}: {}",
                seat_id, e
            );
        }

        info!(
            "Seat {} booked successfully for flight id {}",
            seat.seat_name, flight_id
        );

        Ok(BookingConfirmation {
            booking_id,
            flight_id,
            seat_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use futures_util::future::join_all;
    use rust_decimal_macros::dec;
    use seatwise_core::model::{Flight, Seat};
    use seatwise_core::payment::{MockOutcome, MockPaymentGateway};
    use seatwise_core::TransactionCode;
    use seatwise_store::memory::{MemoryBookingLedger, MemoryFlightStore, MemorySeatStore};

    struct Fixture {
        coordinator: BookingCoordinator,
        seats: MemorySeatStore,
        ledger: MemoryBookingLedger,
        gateway: Arc<MockPaymentGateway>,
        flight_id: Uuid,
        seat_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let flights = MemoryFlightStore::new();
        let seats = MemorySeatStore::new();
        let ledger = MemoryBookingLedger::new();
        let gateway = Arc::new(MockPaymentGateway::approving());

        let now = Utc::now();
        let flight = Flight {
            id: Uuid::new_v4(),
            flight_name: "SW101".to_string(),
            origin: "AMS".to_string(),
            destination: "IST".to_string(),
            departure_time: now.naive_utc(),
            arrival_time: now.naive_utc(),
            price: dec!(100.00),
            created_at: now,
            updated_at: now,
        };
        let seat = Seat {
            id: Uuid::new_v4(),
            flight_id: flight.id,
            seat_name: "1A".to_string(),
            is_reserved: false,
            created_at: now,
            updated_at: now,
        };
        flights.save_flight(&flight).await.unwrap();
        seats.save_seat(&seat).await.unwrap();

        let coordinator = BookingCoordinator::new(
            Arc::new(flights.clone()),
            Arc::new(seats.clone()),
            Arc::new(ledger.clone()),
            gateway.clone(),
        );

        Fixture {
            coordinator,
            seats,
            ledger,
            gateway,
            flight_id: flight.id,
            seat_id: seat.id,
        }
    }

    #[tokio::test]
    async fn test_concurrent_bookings_have_exactly_one_winner() {
        let fx = fixture().await;

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let coordinator = fx.coordinator.clone();
                let (flight_id, seat_id) = (fx.flight_id, fx.seat_id);
                tokio::spawn(async move { coordinator.book(flight_id, seat_id, None).await })
            })
            .collect();

        let results: Vec<_> = join_all(tasks)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        let winners = results.iter().filter(|r| r.is_ok()).count();
        let losers = results
            .iter()
            .filter(|r| matches!(r, Err(BookingError::AlreadyBooked)))
            .count();

        assert_eq!(winners, 1);
        assert_eq!(losers, 7);
        assert_eq!(fx.ledger.count(), 1);
    }

    #[tokio::test]
    async fn test_payment_decline_leaves_no_state() {
        let fx = fixture().await;
        fx.gateway.set_outcome(MockOutcome::Decline);

        let err = fx
            .coordinator
            .book(fx.flight_id, fx.seat_id, None)
            .await
            .unwrap_err();

        assert_eq!(err.code(), Some(TransactionCode::PaymentError));
        assert_eq!(fx.ledger.count(), 0);
        let seat = fx
            .seats
            .find_seat(fx.seat_id, fx.flight_id)
            .await
            .unwrap()
            .unwrap();
        assert!(!seat.is_reserved);
    }

    #[tokio::test]
    async fn test_payment_timeout_maps_to_payment_error() {
        let fx = fixture().await;
        fx.gateway.set_outcome(MockOutcome::Timeout);

        let err = fx
            .coordinator
            .book(fx.flight_id, fx.seat_id, None)
            .await
            .unwrap_err();

        assert_eq!(err.code(), Some(TransactionCode::PaymentError));
        assert_eq!(fx.ledger.count(), 0);
    }

    #[tokio::test]
    async fn test_fast_path_rejects_without_charging() {
        let fx = fixture().await;
        fx.seats.set_reserved(fx.seat_id).await.unwrap();

        let err = fx
            .coordinator
            .book(fx.flight_id, fx.seat_id, None)
            .await
            .unwrap_err();

        assert_eq!(err.code(), Some(TransactionCode::AlreadyBooked));
        assert_eq!(fx.gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_race_loss_after_payment_translates_to_already_booked() {
        let fx = fixture().await;

        // A concurrent caller committed between this caller's flag check
        // and its insert: the flag is still false but the ledger row
        // exists.
        fx.ledger.insert(fx.seat_id, fx.flight_id).await.unwrap();

        let err = fx
            .coordinator
            .book(fx.flight_id, fx.seat_id, None)
            .await
            .unwrap_err();

        assert_eq!(err.code(), Some(TransactionCode::AlreadyBooked));
        // The charge had already been taken when the race was lost.
        assert_eq!(fx.gateway.calls(), 1);
        assert_eq!(fx.ledger.count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_flight_wins_over_valid_seat() {
        let fx = fixture().await;

        let err = fx
            .coordinator
            .book(Uuid::new_v4(), fx.seat_id, None)
            .await
            .unwrap_err();

        assert_eq!(err.code(), Some(TransactionCode::FlightNotFound));
        assert_eq!(fx.gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_seat_on_valid_flight() {
        let fx = fixture().await;

        let err = fx
            .coordinator
            .book(fx.flight_id, Uuid::new_v4(), None)
            .await
            .unwrap_err();

        assert_eq!(err.code(), Some(TransactionCode::SeatNotFound));
        assert_eq!(fx.gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_retry_after_payment_failure_books_once() {
        let fx = fixture().await;

        fx.gateway.set_outcome(MockOutcome::ProviderError);
        let err = fx
            .coordinator
            .book(fx.flight_id, fx.seat_id, None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(TransactionCode::PaymentError));
        assert_eq!(fx.ledger.count(), 0);

        fx.gateway.set_outcome(MockOutcome::Approve);
        let confirmation = fx
            .coordinator
            .book(fx.flight_id, fx.seat_id, None)
            .await
            .unwrap();

        assert_eq!(confirmation.flight_id, fx.flight_id);
        assert_eq!(confirmation.seat_id, fx.seat_id);
        let record = fx
            .ledger
            .find(fx.seat_id, fx.flight_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.id, confirmation.booking_id);
        assert_eq!(fx.ledger.count(), 1);
    }

    #[tokio::test]
    async fn test_two_racers_then_a_third_caller() {
        let fx = fixture().await;

        let tasks: Vec<_> = (0..2)
            .map(|_| {
                let coordinator = fx.coordinator.clone();
                let (flight_id, seat_id) = (fx.flight_id, fx.seat_id);
                tokio::spawn(async move { coordinator.book(flight_id, seat_id, None).await })
            })
            .collect();
        let results: Vec<_> = join_all(tasks)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        let winner = results.iter().find(|r| r.is_ok());
        assert!(winner.is_some());
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(BookingError::AlreadyBooked)))
                .count(),
            1
        );

        // A third, later caller is rejected on the fast path without
        // another charge attempt and without touching the ledger.
        let calls_before = fx.gateway.calls();
        let err = fx
            .coordinator
            .book(fx.flight_id, fx.seat_id, None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(TransactionCode::AlreadyBooked));
        assert_eq!(fx.gateway.calls(), calls_before);
        assert_eq!(fx.ledger.count(), 1);
    }

    struct FailingFlagStore {
        inner: MemorySeatStore,
    }

    #[async_trait]
    impl SeatStore for FailingFlagStore {
        async fn find_seat(
            &self,
            seat_id: Uuid,
            flight_id: Uuid,
        ) -> Result<Option<Seat>, Box<dyn std::error::Error + Send + Sync>> {
            self.inner.find_seat(seat_id, flight_id).await
        }

        async fn find_by_name(
            &self,
            seat_name: &str,
            flight_id: Uuid,
        ) -> Result<Option<Seat>, Box<dyn std::error::Error + Send + Sync>> {
            self.inner.find_by_name(seat_name, flight_id).await
        }

        async fn save_seat(
            &self,
            seat: &Seat,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.inner.save_seat(seat).await
        }

        async fn update_seat(
            &self,
            seat: &Seat,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.inner.update_seat(seat).await
        }

        async fn delete_seat(
            &self,
            seat_id: Uuid,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.inner.delete_seat(seat_id).await
        }

        async fn set_reserved(
            &self,
            _seat_id: Uuid,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Err("flag update lost".into())
        }

        async fn list_available(
            &self,
            flight_id: Uuid,
        ) -> Result<Vec<Seat>, Box<dyn std::error::Error + Send + Sync>> {
            self.inner.list_available(flight_id).await
        }
    }

    #[tokio::test]
    async fn test_flag_update_failure_does_not_void_the_booking() {
        let fx = fixture().await;
        let coordinator = BookingCoordinator::new(
            fx.coordinator.flights.clone(),
            Arc::new(FailingFlagStore {
                inner: fx.seats.clone(),
            }),
            Arc::new(fx.ledger.clone()),
            fx.gateway.clone(),
        );

        let confirmation = coordinator
            .book(fx.flight_id, fx.seat_id, None)
            .await
            .unwrap();

        assert_eq!(
            fx.ledger.booking_for(fx.seat_id, fx.flight_id),
            Some(confirmation.booking_id)
        );
        // Flag is stale but a retry still resolves via the ledger.
        let err = coordinator
            .book(fx.flight_id, fx.seat_id, None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(TransactionCode::AlreadyBooked));
    }
}
