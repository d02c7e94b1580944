pub mod error;
pub mod model;
pub mod payment;
pub mod repository;

pub use error::{BookingError, TransactionCode};
pub use model::{BookedSeat, BookingConfirmation, Flight, Seat};
