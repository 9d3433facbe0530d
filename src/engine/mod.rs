mod availability;
mod conflict;
mod error;
mod mutations;
mod queries;
mod store;

pub use availability::WeeklyAvailability;
pub use conflict::{BookingDecision, RejectReason, check_booking};
pub use error::EngineError;
pub use store::Store;

use crate::model::*;

/// The booking engine over one in-memory dataset snapshot.
///
/// Synchronous and lock-free: queries take `&self`, mutations `&mut self`.
/// Callers sharing an engine across tasks must serialize mutations
/// themselves (the HTTP layer holds it behind a single `RwLock`).
#[derive(Debug, Clone, Default)]
pub struct Engine {
    store: Store,
}

impl Engine {
    pub fn new(dataset: Dataset) -> Result<Self, EngineError> {
        let store = Store::new(dataset)?;
        tracing::debug!(
            dealers = store.dealers().len(),
            bookings = store.bookings().len(),
            "engine loaded"
        );
        Ok(Self { store })
    }

    pub fn dataset(&self) -> &Dataset {
        self.store.dataset()
    }

    pub fn into_dataset(self) -> Dataset {
        self.store.into_dataset()
    }
}
