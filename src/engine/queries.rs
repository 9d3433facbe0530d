use crate::geo::{Coordinate, Polygon};
use crate::limits::*;
use crate::model::*;
use crate::text::eq_ignore_case;

use super::{Engine, EngineError};

fn dealer_has_vehicle(dealer: &Dealer, filter: &VehicleFilter) -> bool {
    dealer.vehicles.iter().any(|v| filter.matches(v))
}

impl Engine {
    pub fn dealers(&self) -> &[Dealer] {
        self.store.dealers()
    }

    // ── Bookings ─────────────────────────────────────────────

    pub fn bookings(&self) -> &[Booking] {
        self.store.bookings()
    }

    pub fn booking(&self, id: &str) -> Option<&Booking> {
        self.store.find_booking(id)
    }

    pub fn bookings_for_vehicle(&self, vehicle_id: &str) -> Vec<&Booking> {
        self.store
            .bookings()
            .iter()
            .filter(|b| eq_ignore_case(&b.vehicle_id, vehicle_id))
            .collect()
    }

    // ── Vehicles ─────────────────────────────────────────────

    pub fn vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.store.find_vehicle(id)
    }

    /// Vehicles in dataset order, optionally restricted to one dealer (by name).
    pub fn vehicles(&self, dealer_name: Option<&str>, filter: &VehicleFilter) -> Vec<&Vehicle> {
        self.store
            .vehicles()
            .filter(|(d, _)| dealer_name.is_none_or(|name| eq_ignore_case(&d.name, name)))
            .map(|(_, v)| v)
            .filter(|v| filter.matches(v))
            .collect()
    }

    pub fn vehicles_by_model(&self, model: &str) -> Vec<&Vehicle> {
        self.vehicles(None, &VehicleFilter::model(model))
    }

    pub fn vehicles_by_fuel(&self, fuel: &str) -> Vec<&Vehicle> {
        self.vehicles(None, &VehicleFilter::fuel(fuel))
    }

    pub fn vehicles_by_transmission(&self, transmission: &str) -> Vec<&Vehicle> {
        self.vehicles(None, &VehicleFilter::transmission(transmission))
    }

    pub fn vehicles_by_dealer(&self, dealer_name: &str) -> Vec<&Vehicle> {
        self.vehicles(Some(dealer_name), &VehicleFilter::default())
    }

    // ── Dealers by location ──────────────────────────────────

    /// All dealers paired with their distance to `point`, nearest first.
    /// The sort is stable, so dealers at the exact same distance keep dataset order.
    pub fn dealers_by_distance(&self, point: &Coordinate) -> Vec<(f64, &Dealer)> {
        let mut ranked: Vec<(f64, &Dealer)> = self
            .store
            .dealers()
            .iter()
            .map(|d| (point.distance_to(&d.coordinate), d))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        ranked
    }

    pub fn closest_dealer_with_vehicle(
        &self,
        point: &Coordinate,
        filter: &VehicleFilter,
    ) -> Option<&Dealer> {
        self.dealers_by_distance(point)
            .into_iter()
            .map(|(_, d)| d)
            .find(|d| dealer_has_vehicle(d, filter))
    }

    pub fn closest_dealers_with_vehicle(
        &self,
        point: &Coordinate,
        filter: &VehicleFilter,
    ) -> Vec<&Dealer> {
        self.dealers_by_distance(point)
            .into_iter()
            .map(|(_, d)| d)
            .filter(|d| dealer_has_vehicle(d, filter))
            .collect()
    }

    /// Dealers with a matching vehicle located inside the polygon, in dataset order.
    pub fn dealers_in_polygon(
        &self,
        vertices: &[Coordinate],
        filter: &VehicleFilter,
    ) -> Result<Vec<&Dealer>, EngineError> {
        if vertices.len() > MAX_POLYGON_VERTICES {
            return Err(EngineError::LimitExceeded("too many polygon vertices"));
        }
        let polygon = Polygon::new(vertices)?;
        Ok(self
            .store
            .dealers()
            .iter()
            .filter(|d| dealer_has_vehicle(d, filter))
            .filter(|d| polygon.contains(&d.coordinate))
            .collect())
    }
}
