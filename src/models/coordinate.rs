// Coordinate model representing a point on the Earth's surface

use serde::{Deserialize, Serialize};

use crate::models::{Distance, DistanceUnit};
use crate::utils::distance::geodesic_distance;

/// Represents a (latitude, longitude) pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate from latitude and longitude
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to another coordinate in the given unit
    pub fn distance_to(&self, other: &Coordinate, unit: DistanceUnit) -> Distance {
        geodesic_distance(self, other, unit)
    }
}

// geo works in (x = longitude, y = latitude)
impl From<Coordinate> for geo::Point<f64> {
    fn from(coordinate: Coordinate) -> Self {
        geo::Point::new(coordinate.longitude, coordinate.latitude)
    }
}

impl From<geo::Point<f64>> for Coordinate {
    fn from(point: geo::Point<f64>) -> Self {
        Coordinate::new(point.y(), point.x())
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}
