use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::text::eq_ignore_case;

/// Local wall-clock timestamp, no timezone.
pub type Timestamp = NaiveDateTime;

/// Exact format of `pickupDate` on the wire.
pub const PICKUP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Weekday name → list of "HHMM" pickup slots, as stored in the dataset.
pub type RawAvailability = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub model: String,
    pub fuel: String,
    pub transmission: String,
    #[serde(default)]
    pub availability: RawAvailability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dealer {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub vehicle_id: String,
    #[serde(with = "pickup_format")]
    pub pickup_date: Timestamp,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_reason: Option<String>,
}

impl Booking {
    /// Active = carries no cancellation marker.
    pub fn is_active(&self) -> bool {
        self.cancelled_at.is_none()
    }
}

/// The whole dataset file: dealers (owning their vehicles) plus the flat booking list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub dealers: Vec<Dealer>,
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

/// Optional vehicle attributes, AND-combined. `None` matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleFilter {
    pub model: Option<String>,
    pub fuel: Option<String>,
    pub transmission: Option<String>,
}

impl VehicleFilter {
    pub fn model(model: impl Into<String>) -> Self {
        Self {
            model: Some(model.into()),
            ..Self::default()
        }
    }

    pub fn fuel(fuel: impl Into<String>) -> Self {
        Self {
            fuel: Some(fuel.into()),
            ..Self::default()
        }
    }

    pub fn transmission(transmission: impl Into<String>) -> Self {
        Self {
            transmission: Some(transmission.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        fn field_ok(want: &Option<String>, have: &str) -> bool {
            want.as_deref().is_none_or(|w| eq_ignore_case(have, w))
        }
        field_ok(&self.model, &vehicle.model)
            && field_ok(&self.fuel, &vehicle.fuel)
            && field_ok(&self.transmission, &vehicle.transmission)
    }
}

/// Input to booking creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub first_name: String,
    pub last_name: String,
    pub vehicle_id: String,
    pub pickup_date: Timestamp,
}

/// A validated ledger mutation, not yet applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    BookingCreated {
        booking: Booking,
    },
    BookingCancelled {
        id: String,
        cancelled_at: Timestamp,
        reason: String,
    },
}

/// Serde adapter pinning `pickupDate` to whole seconds with no fraction or zone.
pub mod pickup_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::PICKUP_FORMAT;

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&ts.format(PICKUP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, PICKUP_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const BOOKING_JSON: &str = r#"{
        "id": "184b5438-35dc-49c4-aab0-e6cf62285aa6",
        "firstName": "Marcus",
        "lastName": "Cruz",
        "vehicleId": "44a36bfa-ec8f-4448-b4c2-809203bdcb9e",
        "pickupDate": "2018-03-04T10:30:00",
        "createdAt": "2018-02-26T08:42:46.291"
    }"#;

    fn vehicle(model: &str, fuel: &str, transmission: &str) -> Vehicle {
        Vehicle {
            id: "v".into(),
            model: model.into(),
            fuel: fuel.into(),
            transmission: transmission.into(),
            availability: RawAvailability::new(),
        }
    }

    #[test]
    fn booking_from_dataset_json() {
        let b: Booking = serde_json::from_str(BOOKING_JSON).unwrap();
        assert_eq!(b.first_name, "Marcus");
        assert_eq!(
            b.pickup_date,
            NaiveDate::from_ymd_opt(2018, 3, 4).unwrap().and_hms_opt(10, 30, 0).unwrap()
        );
        assert_eq!(
            b.created_at,
            NaiveDate::from_ymd_opt(2018, 2, 26)
                .unwrap()
                .and_hms_milli_opt(8, 42, 46, 291)
                .unwrap()
        );
        assert!(b.is_active());
    }

    #[test]
    fn active_booking_omits_cancellation_fields() {
        let b: Booking = serde_json::from_str(BOOKING_JSON).unwrap();
        let json = serde_json::to_value(&b).unwrap();
        assert!(json.get("cancelledAt").is_none());
        assert!(json.get("cancelledReason").is_none());
        assert_eq!(json["pickupDate"], "2018-03-04T10:30:00");
    }

    #[test]
    fn pickup_date_rejects_fraction_and_zone() {
        for bad in ["2018-03-04T10:30:00.5", "2018-03-04T10:30:00Z", "2018-03-04 10:30:00"] {
            let json = BOOKING_JSON.replace("2018-03-04T10:30:00", bad);
            assert!(serde_json::from_str::<Booking>(&json).is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn cancelled_booking_is_not_active() {
        let mut b: Booking = serde_json::from_str(BOOKING_JSON).unwrap();
        b.cancelled_at = Some(b.created_at);
        b.cancelled_reason = Some("changed plans".into());
        assert!(!b.is_active());
        let json = serde_json::to_value(&b).unwrap();
        assert_eq!(json["cancelledReason"], "changed plans");
    }

    #[test]
    fn dealer_coordinate_is_flattened() {
        let json = r#"{
            "id": "d1",
            "name": "MB Lisboa",
            "latitude": 38.7223,
            "longitude": -9.1393,
            "vehicles": []
        }"#;
        let d: Dealer = serde_json::from_str(json).unwrap();
        assert_eq!(d.coordinate, Coordinate::new(38.7223, -9.1393));
        let back = serde_json::to_value(&d).unwrap();
        assert_eq!(back["latitude"], 38.7223);
        assert!(back.get("coordinate").is_none());
    }

    #[test]
    fn dataset_without_bookings_defaults_to_empty() {
        let ds: Dataset = serde_json::from_str(r#"{"dealers": []}"#).unwrap();
        assert!(ds.bookings.is_empty());
    }

    #[test]
    fn filter_wildcards_and_and_combination() {
        let v = vehicle("E", "ELECTRIC", "AUTO");
        assert!(VehicleFilter::default().matches(&v));
        assert!(VehicleFilter::model("e").matches(&v));
        assert!(VehicleFilter::fuel("Electric").matches(&v));
        let both = VehicleFilter {
            model: Some("E".into()),
            fuel: Some("electric".into()),
            transmission: Some("manual".into()),
        };
        assert!(!both.matches(&v));
    }
}
