use std::collections::HashSet;
use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::engine::EngineError;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on the globe, in degrees. Radians are computed once at construction.
///
/// Range validity (lat in [-90, 90], lon in [-180, 180]) is not checked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "LatLon", into = "LatLon")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
    latitude_rad: f64,
    longitude_rad: f64,
}

/// Wire shape of a coordinate: `{"latitude": .., "longitude": ..}`.
#[derive(Serialize, Deserialize)]
struct LatLon {
    latitude: f64,
    longitude: f64,
}

impl From<LatLon> for Coordinate {
    fn from(p: LatLon) -> Self {
        Coordinate::new(p.latitude, p.longitude)
    }
}

impl From<Coordinate> for LatLon {
    fn from(c: Coordinate) -> Self {
        LatLon {
            latitude: c.latitude,
            longitude: c.longitude,
        }
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.latitude == other.latitude && self.longitude == other.longitude
    }
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            latitude_rad: latitude.to_radians(),
            longitude_rad: longitude.to_radians(),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance in km (Haversine), rounded to metres.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let dlat = self.latitude_rad - other.latitude_rad;
        let dlon = self.longitude_rad - other.longitude_rad;
        let a = (dlat / 2.0).sin().powi(2)
            + self.latitude_rad.cos() * other.latitude_rad.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();
        round3(c * EARTH_RADIUS_KM)
    }

    /// Winding-angle containment test against an unvalidated vertex list.
    pub fn is_inside_polygon(&self, vertices: &[Coordinate]) -> Result<bool, EngineError> {
        Ok(Polygon::new(vertices)?.contains(self))
    }

    /// Hashable identity matching `==` (folds -0.0 into 0.0).
    fn bits(&self) -> (u64, u64) {
        ((self.latitude + 0.0).to_bits(), (self.longitude + 0.0).to_bits())
    }
}

/// A vertex ring with at least 3 pairwise-distinct points. The closing edge
/// from the last vertex back to the first is implicit.
#[derive(Debug, Clone, Copy)]
pub struct Polygon<'a> {
    vertices: &'a [Coordinate],
}

impl<'a> Polygon<'a> {
    pub fn new(vertices: &'a [Coordinate]) -> Result<Self, EngineError> {
        if vertices.len() < 3 {
            return Err(EngineError::NotAPolygon("fewer than 3 vertices"));
        }
        let mut seen = HashSet::with_capacity(vertices.len());
        for v in vertices {
            if !seen.insert(v.bits()) {
                return Err(EngineError::NotAPolygon("duplicate vertex"));
            }
        }
        Ok(Self { vertices })
    }

    /// Sums the signed angle swept by the vectors from `point` to each vertex
    /// in turn. Inside gives roughly ±2π, outside roughly 0. Points exactly on
    /// an edge or vertex get whatever the float arithmetic produces.
    pub fn contains(&self, point: &Coordinate) -> bool {
        let angle_to = |v: &Coordinate| {
            (v.latitude - point.latitude).atan2(v.longitude - point.longitude)
        };

        let mut winding = 0.0;
        let mut prev = angle_to(&self.vertices[self.vertices.len() - 1]);
        for v in self.vertices {
            let cur = angle_to(v);
            let mut step = cur - prev;
            if step > PI {
                step -= TAU;
            } else if step <= -PI {
                step += TAU;
            }
            winding += step;
            prev = cur;
        }

        winding.abs() >= PI
    }
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}
