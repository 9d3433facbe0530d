use tracing::{debug, info};
use uuid::Uuid;

use crate::limits::*;
use crate::model::*;
use crate::observability::{
    BOOKINGS_CANCELLED_TOTAL, BOOKINGS_CREATED_TOTAL, BOOKINGS_REJECTED_TOTAL,
};

use super::conflict::{check_booking, now, validate_request};
use super::{BookingDecision, Engine, EngineError, RejectReason};

impl Engine {
    /// Validate a booking request and build the record without touching the dataset.
    pub fn prepare_booking(&self, req: NewBooking) -> Result<Event, EngineError> {
        self.prepare_booking_at(req, now(), Uuid::new_v4().to_string())
    }

    pub(super) fn prepare_booking_at(
        &self,
        req: NewBooking,
        created_at: Timestamp,
        id: String,
    ) -> Result<Event, EngineError> {
        validate_request(&req)?;
        let vehicle = self
            .store
            .find_vehicle(&req.vehicle_id)
            .ok_or_else(|| EngineError::VehicleNotFound(req.vehicle_id.clone()))?;

        match check_booking(vehicle, req.pickup_date, self.store.bookings())? {
            BookingDecision::Allowed => {}
            BookingDecision::Rejected(reason) => {
                metrics::counter!(BOOKINGS_REJECTED_TOTAL, "reason" => reason.label()).increment(1);
                debug!(vehicle_id = %vehicle.id, pickup = %req.pickup_date, reason = reason.label(), "booking rejected");
                let vehicle_id = vehicle.id.clone();
                let pickup = req.pickup_date;
                return Err(match reason {
                    RejectReason::DateUnavailable => {
                        EngineError::VehicleNotAvailableOnDate { vehicle_id, pickup }
                    }
                    RejectReason::AlreadyBooked => {
                        EngineError::VehicleAlreadyBooked { vehicle_id, pickup }
                    }
                });
            }
        }

        // v4 ids are not expected to collide; if one does, refuse rather than alias two bookings.
        if self.store.contains_booking(&id) {
            return Err(EngineError::BookingError(format!(
                "generated booking id {id} already exists"
            )));
        }

        Ok(Event::BookingCreated {
            booking: Booking {
                id,
                first_name: req.first_name,
                last_name: req.last_name,
                vehicle_id: vehicle.id.clone(),
                pickup_date: req.pickup_date,
                created_at,
                cancelled_at: None,
                cancelled_reason: None,
            },
        })
    }

    /// Validate a cancellation without touching the dataset.
    pub fn prepare_cancellation(&self, booking_id: &str, reason: &str) -> Result<Event, EngineError> {
        self.prepare_cancellation_at(booking_id, reason, now())
    }

    pub(super) fn prepare_cancellation_at(
        &self,
        booking_id: &str,
        reason: &str,
        cancelled_at: Timestamp,
    ) -> Result<Event, EngineError> {
        if reason.len() > MAX_REASON_LEN {
            return Err(EngineError::LimitExceeded("cancellation reason too long"));
        }
        let booking = self
            .store
            .find_booking(booking_id)
            .ok_or_else(|| EngineError::BookingNotFound(booking_id.to_string()))?;
        if !booking.is_active() {
            return Err(EngineError::BookingAlreadyCancelled(booking.id.clone()));
        }
        Ok(Event::BookingCancelled {
            id: booking.id.clone(),
            cancelled_at,
            reason: reason.to_string(),
        })
    }

    /// Apply a prepared event. Must be called with no mutation in between
    /// `prepare_*` and here.
    pub fn apply(&mut self, event: Event) -> Result<Booking, EngineError> {
        let created = matches!(event, Event::BookingCreated { .. });
        let booking = self.store.apply_event(event)?;
        if created {
            metrics::counter!(BOOKINGS_CREATED_TOTAL).increment(1);
            info!(booking_id = %booking.id, vehicle_id = %booking.vehicle_id, pickup = %booking.pickup_date, "booking created");
        } else {
            metrics::counter!(BOOKINGS_CANCELLED_TOTAL).increment(1);
            info!(booking_id = %booking.id, "booking cancelled");
        }
        Ok(booking)
    }

    pub fn create_booking(&mut self, req: NewBooking) -> Result<Booking, EngineError> {
        let event = self.prepare_booking(req)?;
        self.apply(event)
    }

    pub fn cancel_booking(&mut self, booking_id: &str, reason: &str) -> Result<Booking, EngineError> {
        let event = self.prepare_cancellation(booking_id, reason)?;
        self.apply(event)
    }
}
