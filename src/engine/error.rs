use crate::model::{PICKUP_FORMAT, Timestamp};

#[derive(Debug)]
pub enum EngineError {
    DatasetInvalid(String),
    VehicleNotFound(String),
    VehicleNotAvailableOnDate {
        vehicle_id: String,
        pickup: Timestamp,
    },
    VehicleAlreadyBooked {
        vehicle_id: String,
        pickup: Timestamp,
    },
    BookingNotFound(String),
    BookingAlreadyCancelled(String),
    NotAPolygon(&'static str),
    /// Validator or ledger reached a state that should be impossible.
    BookingError(String),
    LimitExceeded(&'static str),
    Persist(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::DatasetInvalid(msg) => write!(f, "invalid dataset: {msg}"),
            EngineError::VehicleNotFound(id) => write!(f, "vehicle not found: {id}"),
            EngineError::VehicleNotAvailableOnDate { vehicle_id, pickup } => write!(
                f,
                "vehicle {vehicle_id} is not available on {}",
                pickup.format(PICKUP_FORMAT)
            ),
            EngineError::VehicleAlreadyBooked { vehicle_id, pickup } => write!(
                f,
                "vehicle {vehicle_id} is already booked on {}",
                pickup.format(PICKUP_FORMAT)
            ),
            EngineError::BookingNotFound(id) => write!(f, "booking not found: {id}"),
            EngineError::BookingAlreadyCancelled(id) => {
                write!(f, "booking already cancelled: {id}")
            }
            EngineError::NotAPolygon(why) => write!(f, "not a polygon: {why}"),
            EngineError::BookingError(msg) => write!(f, "booking error: {msg}"),
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            EngineError::Persist(e) => write!(f, "persist error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}
