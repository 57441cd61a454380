use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::{debug, info};

use crate::algorithms::PathSolver;
use crate::config::SearchConfig;
use crate::error::EngineError;
use crate::models::{
    CandidateGroup, Coordinate, Distance, DistanceSource, DistanceUnit, GroupId, PathResult,
    RouteLeg,
};
use crate::utils::distance::geodesic_distance;
use crate::utils::distance_table::DistanceTable;
use crate::utils::readiness::check_ready;

const START_LABEL: &str = "Start";

// Custom wrapper to make f64 implement Eq
#[derive(PartialEq, Copy, Clone, Debug)]
struct F64Wrapper(f64);

impl Eq for F64Wrapper {}

impl PartialOrd for F64Wrapper {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for F64Wrapper {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }
}

/// Position of one candidate in the flattened search space
#[derive(Debug, Clone, Copy)]
struct CandidateRef {
    group: GroupId,
    index: usize,
    place: usize,
}

/// One visited candidate and the edge that reached it
#[derive(Debug, Clone, PartialEq)]
pub struct SearchNode {
    /// Index into the flattened candidate list
    pub candidate: usize,
    pub distance_from_previous: Distance,
}

/// Partial or complete assignment explored by the search
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    pub nodes: Vec<SearchNode>,
    satisfied: HashSet<GroupId>,
    visited_places: HashSet<usize>,
    /// Sum of every edge so far
    pub distance: Distance,
}

impl SearchPath {
    fn last(&self) -> Option<usize> {
        self.nodes.last().map(|node| node.candidate)
    }

    fn satisfies(&self, group: GroupId) -> bool {
        self.satisfied.contains(&group)
    }

    fn visits(&self, place: usize) -> bool {
        self.visited_places.contains(&place)
    }

    fn is_complete(&self, group_count: usize) -> bool {
        self.satisfied.len() == group_count
    }

    fn extend(&self, candidate: usize, slot: CandidateRef, edge: Distance) -> SearchPath {
        let mut next = self.clone();
        next.nodes.push(SearchNode {
            candidate,
            distance_from_previous: edge,
        });
        next.satisfied.insert(slot.group);
        next.visited_places.insert(slot.place);
        next.distance += edge;
        next
    }
}

// Frontier entry ordered for a min-heap on accumulated distance, earliest push first on ties
#[derive(Debug)]
struct FrontierEntry {
    distance: F64Wrapper,
    sequence: u64,
    path: SearchPath,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance && self.sequence == other.sequence
    }
}

impl Eq for FrontierEntry {}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order so we get a min-heap
        other
            .distance
            .cmp(&self.distance)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Flattened candidates with their precomputed distances
struct SearchSpace {
    candidates: Vec<CandidateRef>,
    by_group: Vec<Vec<usize>>,
    coordinates: Vec<Coordinate>,
    table: DistanceTable,
}

impl SearchSpace {
    fn build(
        start: Coordinate,
        groups: &[CandidateGroup],
        unit: DistanceUnit,
    ) -> Result<Self, EngineError> {
        let mut candidates = Vec::new();
        let mut by_group = Vec::with_capacity(groups.len());
        let mut coordinates = Vec::new();
        let mut places: HashMap<String, usize> = HashMap::new();

        for (group_id, group) in groups.iter().enumerate() {
            let mut members = Vec::with_capacity(group.candidates.len());
            for (index, candidate) in group.candidates.iter().enumerate() {
                let coordinate =
                    candidate
                        .coordinate()
                        .ok_or_else(|| EngineError::IncompleteResolution {
                            group: group_id,
                            query: group.query.clone(),
                            reason: format!(
                                "candidate {:?} has no coordinate",
                                candidate.full_name
                            ),
                        })?;

                let next_place = places.len();
                let place = *places.entry(candidate.place_key()).or_insert(next_place);

                members.push(candidates.len());
                candidates.push(CandidateRef {
                    group: group_id,
                    index,
                    place,
                });
                coordinates.push(coordinate);
            }
            by_group.push(members);
        }

        let table = DistanceTable::build(start, &coordinates, unit);

        Ok(Self {
            candidates,
            by_group,
            coordinates,
            table,
        })
    }

    fn edge(&self, path: &SearchPath, to: usize) -> Distance {
        match path.last() {
            Some(from) => self.table.between(from, to),
            None => self.table.from_start(to),
        }
    }
}

/// Best complete path found by a search run
struct SearchOutcome {
    path: SearchPath,
    return_leg: Option<Distance>,
    total: Distance,
}

/// Exhaustive best-first solver over (candidate selection, visiting order) pairs
#[derive(Debug, Clone, Default)]
pub struct PathSearchEngine {
    config: SearchConfig,
}

impl PathSearchEngine {
    /// Creates an engine with the given configuration
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Computes the route of minimum total distance over all groups
    ///
    /// Every group must be resolved; the first group that is not is reported as
    /// [`EngineError::IncompleteResolution`].
    pub fn compute_optimal_path(
        &self,
        start: Coordinate,
        groups: &[CandidateGroup],
        return_to_start: bool,
    ) -> Result<PathResult, EngineError> {
        if groups.is_empty() {
            return Err(EngineError::EmptyGroups);
        }
        check_ready(groups)?;

        debug!(
            "Searching {} groups with {} candidates (return_to_start: {}, prune: {})",
            groups.len(),
            groups.iter().map(|g| g.candidate_count()).sum::<usize>(),
            return_to_start,
            self.config.prune
        );

        let space = SearchSpace::build(start, groups, self.config.unit)?;
        let outcome = self.search(&space, groups, return_to_start)?;

        Ok(self.assemble(start, groups, &space, outcome))
    }

    fn search(
        &self,
        space: &SearchSpace,
        groups: &[CandidateGroup],
        return_to_start: bool,
    ) -> Result<SearchOutcome, EngineError> {
        let group_count = groups.len();

        if let Some(empty) = space.by_group.iter().position(|members| members.is_empty()) {
            return Err(EngineError::UnsatisfiableGroup {
                group: empty,
                query: groups[empty].query.clone(),
            });
        }

        let mut frontier = BinaryHeap::new();
        let mut sequence: u64 = 0;
        frontier.push(FrontierEntry {
            distance: F64Wrapper(0.0),
            sequence,
            path: SearchPath::default(),
        });

        let mut best: Option<SearchOutcome> = None;
        let mut first_dead_end: Option<GroupId> = None;
        let mut expanded: usize = 0;
        let mut pruned: usize = 0;
        let mut completed: usize = 0;

        while let Some(FrontierEntry { path, .. }) = frontier.pop() {
            if self.cannot_improve(path.distance, best.as_ref()) {
                pruned += 1;
                continue;
            }
            expanded += 1;

            let mut has_successor = false;

            for (group_id, members) in space.by_group.iter().enumerate() {
                if path.satisfies(group_id) {
                    continue;
                }

                for &candidate in members {
                    let slot = space.candidates[candidate];
                    // Two groups may resolve to the same physical place
                    if path.visits(slot.place) {
                        continue;
                    }
                    has_successor = true;

                    let edge = space.edge(&path, candidate);
                    let next = path.extend(candidate, slot, edge);

                    if next.is_complete(group_count) {
                        completed += 1;
                        let return_leg = return_to_start.then(|| space.table.to_start(candidate));
                        let total = next.distance + return_leg.unwrap_or(0.0);

                        // Strictly smaller only, so the first minimum found is kept
                        if best.as_ref().map_or(true, |b| total < b.total) {
                            best = Some(SearchOutcome {
                                path: next,
                                return_leg,
                                total,
                            });
                        }
                    } else if self.cannot_improve(next.distance, best.as_ref()) {
                        pruned += 1;
                    } else {
                        sequence += 1;
                        frontier.push(FrontierEntry {
                            distance: F64Wrapper(next.distance),
                            sequence,
                            path: next,
                        });
                    }
                }
            }

            if !has_successor && first_dead_end.is_none() {
                first_dead_end = (0..group_count).find(|g| !path.satisfies(*g));
            }
        }

        info!(
            "Search finished: {} expanded, {} pruned, {} complete paths evaluated",
            expanded, pruned, completed
        );

        best.ok_or_else(|| {
            let group = first_dead_end.unwrap_or(0);
            EngineError::UnsatisfiableGroup {
                group,
                query: groups[group].query.clone(),
            }
        })
    }

    // A partial path already at or above the best total can never replace it
    fn cannot_improve(&self, distance: Distance, best: Option<&SearchOutcome>) -> bool {
        self.config.prune && best.is_some_and(|b| distance >= b.total)
    }

    fn assemble(
        &self,
        start: Coordinate,
        groups: &[CandidateGroup],
        space: &SearchSpace,
        outcome: SearchOutcome,
    ) -> PathResult {
        let mut legs: Vec<RouteLeg> = outcome
            .path
            .nodes
            .iter()
            .map(|node| {
                let slot = space.candidates[node.candidate];
                let candidate = &groups[slot.group].candidates[slot.index];
                RouteLeg {
                    name: candidate.full_name.clone(),
                    coordinate: space.coordinates[node.candidate],
                    group: Some(slot.group),
                    distance_from_previous: node.distance_from_previous,
                    cumulative_distance: 0.0,
                    source: DistanceSource::Geodesic,
                }
            })
            .collect();

        if let Some(distance) = outcome.return_leg {
            legs.push(RouteLeg {
                name: START_LABEL.to_string(),
                coordinate: start,
                group: None,
                distance_from_previous: distance,
                cumulative_distance: 0.0,
                source: DistanceSource::Geodesic,
            });
        }

        let result = PathResult::new(start, self.config.unit, legs);
        info!(
            "Optimal route visits {} stops, total {:.2} {}",
            result.stop_count(),
            result.display_total(),
            self.config.unit.label()
        );
        result
    }
}

impl PathSolver for PathSearchEngine {
    fn solve(
        &self,
        start: Coordinate,
        groups: &[CandidateGroup],
        return_to_start: bool,
    ) -> Result<PathResult, EngineError> {
        self.compute_optimal_path(start, groups, return_to_start)
    }

    fn route_length(
        &self,
        start: Coordinate,
        stops: &[Coordinate],
        return_to_start: bool,
    ) -> Distance {
        let unit = self.config.unit;
        let mut total = 0.0;
        let mut previous = start;

        for stop in stops {
            total += geodesic_distance(&previous, stop, unit);
            previous = *stop;
        }

        if return_to_start && !stops.is_empty() {
            total += geodesic_distance(&previous, &start, unit);
        }

        total
    }
}
