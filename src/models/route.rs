// Route models for representing the computed visiting order

use serde::Serialize;

use crate::models::{Coordinate, Distance, DistanceUnit};
use crate::utils::distance::round_for_display;

/// Where a leg's distance came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceSource {
    Geodesic,
    Measured,
}

/// One stop of the final route
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteLeg {
    /// Display name of the stop
    pub name: String,

    /// Coordinate of the stop
    pub coordinate: Coordinate,

    /// Index of the group this stop satisfies, None for the return to start
    pub group: Option<usize>,

    /// Distance from the previous stop (or from start for the first leg)
    pub distance_from_previous: Distance,

    /// Running total including this leg
    pub cumulative_distance: Distance,

    pub source: DistanceSource,
}

impl RouteLeg {
    /// Whether this is the synthetic leg back to the start
    pub fn is_return(&self) -> bool {
        self.group.is_none()
    }
}

/// Optimal route over every requested destination
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    /// Stops in visiting order
    pub legs: Vec<RouteLeg>,

    /// Sum of every leg, including the return leg when present
    pub total_distance: Distance,

    pub unit: DistanceUnit,

    pub start: Coordinate,
}

impl PathResult {
    /// Builds a result from ordered legs, filling in cumulative distances
    pub fn new(start: Coordinate, unit: DistanceUnit, mut legs: Vec<RouteLeg>) -> Self {
        let total_distance = accumulate(&mut legs);
        Self {
            legs,
            total_distance,
            unit,
            start,
        }
    }

    /// Checks if the route ends with a leg back to the start
    pub fn returns_to_start(&self) -> bool {
        self.legs.last().is_some_and(RouteLeg::is_return)
    }

    /// Number of destinations visited, excluding the return leg
    pub fn stop_count(&self) -> usize {
        self.legs.iter().filter(|leg| !leg.is_return()).count()
    }

    /// Total distance rounded for presentation
    pub fn display_total(&self) -> f64 {
        round_for_display(self.total_distance)
    }

    /// Replaces leg distances with measured ones, keeping the visiting order
    ///
    /// `measured[i]` applies to `legs[i]`; a `None` slot keeps the existing estimate.
    pub fn with_measured_distances(mut self, measured: &[Option<Distance>]) -> Self {
        for (leg, measured) in self.legs.iter_mut().zip(measured) {
            if let Some(distance) = measured {
                leg.distance_from_previous = *distance;
                leg.source = DistanceSource::Measured;
            }
        }
        self.total_distance = accumulate(&mut self.legs);
        self
    }

    /// Origin and destination of every leg, in order
    pub fn edges(&self) -> Vec<(Coordinate, Coordinate)> {
        let mut previous = self.start;
        self.legs
            .iter()
            .map(|leg| {
                let edge = (previous, leg.coordinate);
                previous = leg.coordinate;
                edge
            })
            .collect()
    }
}

fn accumulate(legs: &mut [RouteLeg]) -> Distance {
    let mut total = 0.0;
    for leg in legs.iter_mut() {
        total += leg.distance_from_previous;
        leg.cumulative_distance = total;
    }
    total
}
