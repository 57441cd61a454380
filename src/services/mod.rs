// External collaborators: candidate resolution and measured distances

pub mod fixed;
pub mod google;
pub mod refine;
pub mod resolution;

use std::future::Future;

use crate::error::ServiceError;
use crate::models::{CandidateLocation, Coordinate, Distance, DistanceUnit};

/// Turns a destination query into concrete candidate locations
pub trait CandidateResolver {
    /// Resolve `query` near `anchor`
    ///
    /// Unique queries yield at most one candidate; ambiguous ones yield up to the
    /// resolver's cap, nearest to `anchor` first.
    fn resolve(
        &self,
        query: &str,
        anchor: Coordinate,
        is_unique: bool,
    ) -> impl Future<Output = Result<Vec<CandidateLocation>, ServiceError>> + Send;
}

/// Measures travel distance between two points, usually over the network
pub trait DistanceProvider {
    fn measure(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        unit: DistanceUnit,
    ) -> impl Future<Output = Result<Distance, ServiceError>> + Send;
}
