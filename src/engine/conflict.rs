use crate::model::*;
use crate::text::eq_ignore_case;

use super::availability::WeeklyAvailability;
use super::EngineError;

pub(crate) fn now() -> Timestamp {
    chrono::Local::now().naive_local()
}

pub(crate) fn validate_request(req: &NewBooking) -> Result<(), EngineError> {
    use crate::limits::*;
    if req.first_name.len() > MAX_NAME_LEN || req.last_name.len() > MAX_NAME_LEN {
        return Err(EngineError::LimitExceeded("name too long"));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The (weekday, HH:MM) of the pickup is not in the vehicle's schedule.
    DateUnavailable,
    /// An active booking already holds this exact pickup timestamp.
    AlreadyBooked,
}

impl RejectReason {
    pub fn label(&self) -> &'static str {
        match self {
            RejectReason::DateUnavailable => "date_unavailable",
            RejectReason::AlreadyBooked => "already_booked",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingDecision {
    Allowed,
    Rejected(RejectReason),
}

/// Decide whether `vehicle` can be picked up at `pickup`.
///
/// 1. The slot must be listed in the vehicle's weekly availability.
/// 2. No active booking of this vehicle may hold the exact same timestamp.
///
/// `existing` may contain bookings of other vehicles; they are skipped. A
/// schedule that fails to parse here surfaces as `BookingError`, since the
/// dataset was validated at load.
pub fn check_booking<'a>(
    vehicle: &Vehicle,
    pickup: Timestamp,
    existing: impl IntoIterator<Item = &'a Booking>,
) -> Result<BookingDecision, EngineError> {
    let schedule = WeeklyAvailability::parse(&vehicle.availability)
        .map_err(|e| EngineError::BookingError(format!("vehicle {}: {e}", vehicle.id)))?;
    if !schedule.is_open(pickup) {
        return Ok(BookingDecision::Rejected(RejectReason::DateUnavailable));
    }

    let taken = existing
        .into_iter()
        .filter(|b| b.is_active())
        .filter(|b| eq_ignore_case(&b.vehicle_id, &vehicle.id))
        .any(|b| b.pickup_date == pickup);
    if taken {
        return Ok(BookingDecision::Rejected(RejectReason::AlreadyBooked));
    }

    Ok(BookingDecision::Allowed)
}
