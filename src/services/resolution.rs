// Concurrent candidate resolution joined behind the readiness check

use futures::future::try_join_all;
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::models::{CandidateGroup, CandidateLocation, Coordinate, DestinationRequest};
use crate::services::CandidateResolver;
use crate::utils::distance::geodesic_distance;
use crate::utils::readiness::check_ready;

/// Resolves every destination concurrently and returns one group per destination
///
/// Destinations that already list their candidates skip the resolver. A unique
/// destination keeps only its first candidate either way.
/// Each lookup owns the result slot for its destination index; the groups are only
/// assembled and checked once every lookup has finished. The first resolver error
/// aborts the whole batch.
pub async fn resolve_groups<R>(
    resolver: &R,
    anchor: Coordinate,
    destinations: &[DestinationRequest],
) -> Result<Vec<CandidateGroup>, EngineError>
where
    R: CandidateResolver + Sync,
{
    if destinations.is_empty() {
        return Err(EngineError::EmptyGroups);
    }

    let lookups = destinations.iter().enumerate().map(|(index, destination)| async move {
        let is_unique = destination_is_unique(destination);
        let mut candidates = match &destination.candidates {
            Some(candidates) => candidates.clone(),
            None => {
                debug!("Resolving destination {} ({:?})", index, destination.query);
                resolver
                    .resolve(&destination.query, anchor, is_unique)
                    .await?
            }
        };

        // A unique destination names one place, whichever source listed the candidates
        if is_unique && candidates.len() > 1 {
            warn!(
                "Unique destination {:?} has {} places, keeping the first",
                destination.query,
                candidates.len()
            );
            candidates.truncate(1);
        }

        Ok::<_, EngineError>(CandidateGroup::with_candidates(
            destination.query.clone(),
            is_unique,
            candidates,
        ))
    });

    let groups = try_join_all(lookups).await?;

    check_ready(&groups)?;
    Ok(groups)
}

/// Whether a destination names a single place
///
/// An explicit flag wins. Otherwise the query is classified against the
/// autocomplete predictions it was picked from; with no predictions to compare
/// against, the destination is treated as ambiguous.
pub fn destination_is_unique(destination: &DestinationRequest) -> bool {
    if let Some(is_unique) = destination.is_unique {
        return is_unique;
    }

    destination
        .predictions
        .iter()
        .position(|prediction| *prediction == destination.query)
        .is_some_and(|selection| classify_uniqueness(selection, &destination.predictions))
}

/// Orders candidates by distance from `anchor` and keeps at most `cap` of them
///
/// Candidates without a coordinate sort last; equal distances keep resolver order.
pub fn rank_by_proximity(
    mut candidates: Vec<CandidateLocation>,
    anchor: Coordinate,
    cap: usize,
) -> Vec<CandidateLocation> {
    let unit = crate::models::DistanceUnit::Kilometers;
    candidates.sort_by(|a, b| {
        let da = a
            .coordinate()
            .map_or(f64::INFINITY, |c| geodesic_distance(&anchor, &c, unit));
        let db = b
            .coordinate()
            .map_or(f64::INFINITY, |c| geodesic_distance(&anchor, &c, unit));
        da.total_cmp(&db)
    });
    candidates.truncate(cap);
    candidates
}

/// Decides whether an autocomplete selection names a single place
///
/// A selection is a chain or category (not unique) when its primary text appears
/// inside the primary text of any other prediction in the same list.
pub fn classify_uniqueness<S: AsRef<str>>(selection: usize, predictions: &[S]) -> bool {
    let Some(selected) = predictions.get(selection) else {
        return true;
    };
    let selected = selected.as_ref();

    !predictions
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != selection)
        .any(|(_, other)| other.as_ref().contains(selected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_is_not_unique() {
        let predictions = ["Walgreens", "Walgreens Pharmacy", "Central Library"];

        assert!(!classify_uniqueness(0, &predictions));
        assert!(classify_uniqueness(1, &predictions));
        assert!(classify_uniqueness(2, &predictions));
    }

    #[test]
    fn test_out_of_range_selection_is_unique() {
        let predictions: [&str; 0] = [];
        assert!(classify_uniqueness(0, &predictions));
    }

    fn destination(query: &str, is_unique: Option<bool>, predictions: &[&str]) -> DestinationRequest {
        DestinationRequest {
            query: query.to_string(),
            is_unique,
            predictions: predictions.iter().map(|p| p.to_string()).collect(),
            candidates: None,
        }
    }

    #[test]
    fn test_destination_uniqueness() {
        let predictions = ["Walgreens", "Walgreens Pharmacy", "Central Library"];

        assert!(!destination_is_unique(&destination("Walgreens", None, &predictions)));
        assert!(destination_is_unique(&destination("Central Library", None, &predictions)));
        // Explicit flag overrides the predictions
        assert!(destination_is_unique(&destination("Walgreens", Some(true), &predictions)));
        // Nothing to classify against
        assert!(!destination_is_unique(&destination("Central Library", None, &[])));
        assert!(!destination_is_unique(&destination("Bakery", None, &predictions)));
    }

    #[test]
    fn test_rank_by_proximity() {
        let anchor = Coordinate::new(0.0, 0.0);
        let candidates = vec![
            CandidateLocation::resolved("CVS", "CVS far", Coordinate::new(0.0, 3.0)),
            CandidateLocation::new("CVS", "CVS unknown"),
            CandidateLocation::resolved("CVS", "CVS near", Coordinate::new(0.0, 1.0)),
            CandidateLocation::resolved("CVS", "CVS mid", Coordinate::new(0.0, 2.0)),
        ];

        let ranked = rank_by_proximity(candidates, anchor, 3);
        let names: Vec<_> = ranked.iter().map(|c| c.full_name.as_str()).collect();

        assert_eq!(names, vec!["CVS near", "CVS mid", "CVS far"]);
    }
}
