use std::collections::HashSet;

use crate::model::*;
use crate::text::{eq_ignore_case, fold};

use super::availability::WeeklyAvailability;
use super::EngineError;

/// Owns the dataset snapshot. Construction validates the invariants every
/// lookup below relies on: vehicle ids and booking ids are unique under
/// text matching, and every availability schedule parses.
#[derive(Debug, Clone, Default)]
pub struct Store {
    dataset: Dataset,
}

impl Store {
    pub fn new(dataset: Dataset) -> Result<Self, EngineError> {
        let mut vehicle_ids = HashSet::new();
        for dealer in &dataset.dealers {
            for vehicle in &dealer.vehicles {
                if !vehicle_ids.insert(fold(&vehicle.id)) {
                    return Err(EngineError::DatasetInvalid(format!(
                        "duplicate vehicle id: {}",
                        vehicle.id
                    )));
                }
                WeeklyAvailability::parse(&vehicle.availability).map_err(|e| {
                    EngineError::DatasetInvalid(format!("vehicle {}: {e}", vehicle.id))
                })?;
            }
        }

        let mut booking_ids = HashSet::new();
        for booking in &dataset.bookings {
            if !booking_ids.insert(fold(&booking.id)) {
                return Err(EngineError::DatasetInvalid(format!(
                    "duplicate booking id: {}",
                    booking.id
                )));
            }
        }

        Ok(Self { dataset })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }

    // ── Lookups ──────────────────────────────────────────────

    pub fn dealers(&self) -> &[Dealer] {
        &self.dataset.dealers
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.dataset.bookings
    }

    pub fn vehicles(&self) -> impl Iterator<Item = (&Dealer, &Vehicle)> {
        self.dataset
            .dealers
            .iter()
            .flat_map(|d| d.vehicles.iter().map(move |v| (d, v)))
    }

    pub fn find_vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles()
            .map(|(_, v)| v)
            .find(|v| eq_ignore_case(&v.id, id))
    }

    pub fn find_booking(&self, id: &str) -> Option<&Booking> {
        self.dataset
            .bookings
            .iter()
            .find(|b| eq_ignore_case(&b.id, id))
    }

    pub fn contains_booking(&self, id: &str) -> bool {
        self.find_booking(id).is_some()
    }

    // ── Event application ────────────────────────────────────

    /// Apply a prepared event and return the resulting booking record.
    pub fn apply_event(&mut self, event: Event) -> Result<Booking, EngineError> {
        match event {
            Event::BookingCreated { booking } => {
                self.dataset.bookings.push(booking.clone());
                Ok(booking)
            }
            Event::BookingCancelled {
                id,
                cancelled_at,
                reason,
            } => {
                let booking = self
                    .dataset
                    .bookings
                    .iter_mut()
                    .find(|b| b.id == id)
                    .ok_or(EngineError::BookingNotFound(id))?;
                booking.cancelled_at = Some(cancelled_at);
                booking.cancelled_reason = Some(reason);
                Ok(booking.clone())
            }
        }
    }
}
