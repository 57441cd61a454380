// Distance calculation utilities

use crate::models::{Coordinate, Distance, DistanceUnit};

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const KM_PER_MILE: f64 = 1.609;

/// Great-circle distance in kilometres using the Haversine formula
pub fn haversine_km<P>(from: P, to: P) -> f64
where
    P: Into<geo::Point<f64>>,
{
    let from: geo::Point<f64> = from.into();
    let to: geo::Point<f64> = to.into();

    let lat1_rad = from.y().to_radians();
    let lon1_rad = from.x().to_radians();
    let lat2_rad = to.y().to_radians();
    let lon2_rad = to.x().to_radians();

    let delta_lat = lat2_rad - lat1_rad;
    let delta_lon = lon2_rad - lon1_rad;

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Great-circle distance between two coordinates in the requested unit, full precision
pub fn geodesic_distance(a: &Coordinate, b: &Coordinate, unit: DistanceUnit) -> Distance {
    if a == b {
        return 0.0;
    }
    unit.from_km(haversine_km(*a, *b))
}

/// Converts a distance reported in metres to the requested unit
pub fn meters_to(unit: DistanceUnit, meters: f64) -> Distance {
    unit.from_km(meters / 1000.0)
}

/// Rounds to two decimal places for presentation only
pub fn round_for_display(distance: Distance) -> f64 {
    (distance * 100.0).round() / 100.0
}
