// Precomputed geodesic distances between the start and every candidate

use rayon::prelude::*;
use tracing::debug;

use crate::models::{Coordinate, Distance, DistanceUnit};
use crate::utils::distance::geodesic_distance;

/// Dense distance table over a fixed list of points
///
/// Row-major `n * n` matrix plus a separate row for distances from the start.
/// Great-circle distance is symmetric, so the start row also serves return legs.
#[derive(Debug, Clone)]
pub struct DistanceTable {
    size: usize,
    from_start: Vec<Distance>,
    pairwise: Vec<Distance>,
}

impl DistanceTable {
    /// Computes every start-to-point and point-to-point distance in parallel
    pub fn build(start: Coordinate, points: &[Coordinate], unit: DistanceUnit) -> Self {
        let size = points.len();

        let from_start: Vec<Distance> = points
            .par_iter()
            .map(|p| geodesic_distance(&start, p, unit))
            .collect();

        let pairwise: Vec<Distance> = points
            .par_iter()
            .flat_map_iter(|from| points.iter().map(move |to| geodesic_distance(from, to, unit)))
            .collect();

        debug!("Computed distance table for {} points", size);

        Self {
            size,
            from_start,
            pairwise,
        }
    }

    /// Number of points in the table
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Distance from the start to point `to`
    pub fn from_start(&self, to: usize) -> Distance {
        self.from_start[to]
    }

    /// Distance from point `from` back to the start
    pub fn to_start(&self, from: usize) -> Distance {
        self.from_start[from]
    }

    /// Distance from point `from` to point `to`
    pub fn between(&self, from: usize, to: usize) -> Distance {
        self.pairwise[from * self.size + to]
    }
}
