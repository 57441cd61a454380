// Models module - exports all model types

mod candidate;
mod candidate_group;
mod coordinate;
mod route;
mod trip;

use serde::{Deserialize, Serialize};

// Re-export model types
pub use self::candidate::{normalize_name, CandidateLocation};
pub use self::candidate_group::CandidateGroup;
pub use self::coordinate::Coordinate;
pub use self::route::{DistanceSource, PathResult, RouteLeg};
pub use self::trip::{DestinationRequest, TripRequest};

// Common type aliases for improved code readability
pub type Distance = f64;
pub type GroupId = usize;

/// Unit distances are reported in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    Kilometers,
    #[default]
    Miles,
}

impl DistanceUnit {
    /// Converts a distance in kilometres to this unit
    pub fn from_km(self, km: f64) -> Distance {
        match self {
            DistanceUnit::Kilometers => km,
            DistanceUnit::Miles => km / crate::utils::distance::KM_PER_MILE,
        }
    }

    /// Short label used when printing distances
    pub fn label(self) -> &'static str {
        match self {
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Miles => "miles",
        }
    }
}
