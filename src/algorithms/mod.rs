pub mod path_search;

// Common algorithm traits
use crate::error::EngineError;
use crate::models::{CandidateGroup, Coordinate, Distance, PathResult};

/// Trait for solvers that pick one candidate per group and order the visits
pub trait PathSolver {
    /// Find the shortest route that visits exactly one candidate of every group
    fn solve(
        &self,
        start: Coordinate,
        groups: &[CandidateGroup],
        return_to_start: bool,
    ) -> Result<PathResult, EngineError>;

    /// Length of a fixed route through the given stops
    fn route_length(&self, start: Coordinate, stops: &[Coordinate], return_to_start: bool)
        -> Distance;
}
