pub mod coordinator;
pub mod flights;
pub mod gateway;

pub use coordinator::BookingCoordinator;
pub use flights::{FlightDetails, FlightManager, FlightRequest, SeatRequest};
pub use gateway::HttpPaymentGateway;
