// Public modules
pub mod algorithms;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

// Re-exports for convenience
pub use algorithms::path_search::PathSearchEngine;
pub use config::SearchConfig;
pub use error::{EngineError, ServiceError};
pub use models::{
    CandidateGroup, CandidateLocation, Coordinate, DistanceUnit, PathResult, RouteLeg,
};

/// Computes the shortest route over `groups` with the default configuration
pub fn compute_optimal_path(
    start: Coordinate,
    groups: &[CandidateGroup],
    return_to_start: bool,
) -> Result<PathResult, EngineError> {
    PathSearchEngine::default().compute_optimal_path(start, groups, return_to_start)
}
