use std::sync::Arc;

use seatwise_booking::{BookingCoordinator, FlightManager};

#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<BookingCoordinator>,
    pub flights: Arc<FlightManager>,
}
