use crate::payment::PaymentError;

/// Stable transaction codes returned to callers. The numeric ids and
/// messages are a published contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionCode {
    Success,
    FlightAlreadyExists,
    DateFormatError,
    FlightNotFound,
    SeatAlreadyExists,
    SeatNotFound,
    AlreadyBooked,
    PaymentError,
}

impl TransactionCode {
    pub fn id(&self) -> u16 {
        match self {
            TransactionCode::Success => 100,
            TransactionCode::FlightAlreadyExists => 101,
            TransactionCode::DateFormatError => 102,
            TransactionCode::FlightNotFound => 103,
            TransactionCode::SeatAlreadyExists => 104,
            TransactionCode::SeatNotFound => 105,
            TransactionCode::AlreadyBooked => 106,
            TransactionCode::PaymentError => 107,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            TransactionCode::Success => "Success",
            TransactionCode::FlightAlreadyExists => "Flight already exists",
            TransactionCode::DateFormatError => "Date format error. Format is dd-MM-yyyy HH:mm",
            TransactionCode::FlightNotFound => "Flight not found",
            TransactionCode::SeatAlreadyExists => "Seat already exists in the plane",
            TransactionCode::SeatNotFound => "Seat not found",
            TransactionCode::AlreadyBooked => "Seat already booked",
            TransactionCode::PaymentError => "Payment error",
        }
    }
}

/// Typed failure for every flight/seat/booking operation. All expected
/// failures carry a [`TransactionCode`]; `Storage` is the opaque bucket
/// for unexpected storage faults and has no code — the boundary layer
/// masks it as a plain internal error.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Flight already exists")]
    FlightAlreadyExists,

    #[error("Date format error. Format is dd-MM-yyyy HH:mm")]
    DateFormat,

    #[error("Flight not found")]
    FlightNotFound,

    #[error("Seat already exists in the plane")]
    SeatAlreadyExists,

    #[error("Seat not found")]
    SeatNotFound,

    #[error("Seat already booked")]
    AlreadyBooked,

    #[error("Payment error")]
    Payment(#[from] PaymentError),

    #[error("Storage failure: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl BookingError {
    /// The stable code for this failure, or `None` for storage faults
    /// that stay outside the published taxonomy.
    pub fn code(&self) -> Option<TransactionCode> {
        match self {
            BookingError::FlightAlreadyExists => Some(TransactionCode::FlightAlreadyExists),
            BookingError::DateFormat => Some(TransactionCode::DateFormatError),
            BookingError::FlightNotFound => Some(TransactionCode::FlightNotFound),
            BookingError::SeatAlreadyExists => Some(TransactionCode::SeatAlreadyExists),
            BookingError::SeatNotFound => Some(TransactionCode::SeatNotFound),
            BookingError::AlreadyBooked => Some(TransactionCode::AlreadyBooked),
            BookingError::Payment(_) => Some(TransactionCode::PaymentError),
            BookingError::Storage(_) => None,
        }
    }

    pub fn storage<E>(source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        BookingError::Storage(source.into())
    }
}
