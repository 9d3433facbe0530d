use serde::Deserialize;

use crate::geo::Coordinate;
use crate::model::{NewBooking, Timestamp, VehicleFilter, pickup_format};

use super::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct VehiclesQuery {
    pub dealer: Option<String>,
    pub model: Option<String>,
    pub fuel: Option<String>,
    pub transmission: Option<String>,
}

impl VehiclesQuery {
    pub fn filter(&self) -> VehicleFilter {
        VehicleFilter {
            model: self.model.clone(),
            fuel: self.fuel.clone(),
            transmission: self.transmission.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DealersQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub model: Option<String>,
    pub fuel: Option<String>,
    pub transmission: Option<String>,
}

impl DealersQuery {
    /// The query point. NaN and infinities are rejected as malformed input.
    pub fn point(&self) -> Result<Coordinate, ApiError> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(ApiError::BadRequest(
                "latitude and longitude must be finite numbers".into(),
            ));
        }
        Ok(Coordinate::new(self.latitude, self.longitude))
    }

    pub fn filter(self) -> VehicleFilter {
        VehicleFilter {
            model: self.model,
            fuel: self.fuel,
            transmission: self.transmission,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PolygonBody {
    pub vertices: Vec<Coordinate>,
    pub model: Option<String>,
    pub fuel: Option<String>,
    pub transmission: Option<String>,
}

impl PolygonBody {
    pub fn into_parts(self) -> (Vec<Coordinate>, VehicleFilter) {
        let filter = VehicleFilter {
            model: self.model,
            fuel: self.fuel,
            transmission: self.transmission,
        };
        (self.vertices, filter)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsQuery {
    pub vehicle_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingBody {
    pub first_name: String,
    pub last_name: String,
    pub vehicle_id: String,
    #[serde(with = "pickup_format")]
    pub pickup_date: Timestamp,
}

impl From<CreateBookingBody> for NewBooking {
    fn from(body: CreateBookingBody) -> Self {
        NewBooking {
            first_name: body.first_name,
            last_name: body.last_name,
            vehicle_id: body.vehicle_id,
            pickup_date: body.pickup_date,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingBody {
    pub booking_id: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_body_uses_camel_case() {
        let body: CreateBookingBody = serde_json::from_str(
            r#"{"firstName":"Joanna","lastName":"Randolph","vehicleId":"v1","pickupDate":"2019-04-09T10:00:00"}"#,
        )
        .unwrap();
        let req = NewBooking::from(body);
        assert_eq!(req.vehicle_id, "v1");
        assert_eq!(req.pickup_date.to_string(), "2019-04-09 10:00:00");
    }

    #[test]
    fn create_body_rejects_zoned_pickup() {
        let body = serde_json::from_str::<CreateBookingBody>(
            r#"{"firstName":"J","lastName":"R","vehicleId":"v1","pickupDate":"2019-04-09T10:00:00Z"}"#,
        );
        assert!(body.is_err());
    }

    fn dealers_query(latitude: f64, longitude: f64) -> DealersQuery {
        DealersQuery {
            latitude,
            longitude,
            model: None,
            fuel: None,
            transmission: None,
        }
    }

    #[test]
    fn dealers_query_rejects_non_finite_coordinates() {
        for (lat, lon) in [(f64::NAN, 0.0), (0.0, f64::INFINITY), (f64::NEG_INFINITY, 1.0)] {
            let q = dealers_query(lat, lon);
            assert!(matches!(q.point(), Err(ApiError::BadRequest(_))), "({lat}, {lon}) accepted");
        }
        assert_eq!(dealers_query(38.72, -9.14).point().unwrap(), Coordinate::new(38.72, -9.14));
    }

    #[test]
    fn polygon_body_splits_into_vertices_and_filter() {
        let body: PolygonBody = serde_json::from_str(
            r#"{"vertices":[{"latitude":1.0,"longitude":2.0}],"fuel":"ELECTRIC"}"#,
        )
        .unwrap();
        let (vertices, filter) = body.into_parts();
        assert_eq!(vertices, vec![Coordinate::new(1.0, 2.0)]);
        assert_eq!(filter, VehicleFilter::fuel("ELECTRIC"));
    }
}
