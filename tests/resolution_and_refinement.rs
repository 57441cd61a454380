// End-to-end: resolve destinations, search, then refine with measured distances
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use pathfinder::models::{
    CandidateLocation, Coordinate, DestinationRequest, DistanceSource, DistanceUnit, TripRequest,
};
use pathfinder::services::fixed::FixedResolver;
use pathfinder::services::refine::refine_with_measured;
use pathfinder::services::resolution::resolve_groups;
use pathfinder::services::{CandidateResolver, DistanceProvider};
use pathfinder::{EngineError, PathSearchEngine, SearchConfig, ServiceError};

fn place(name: &str, lat: f64, lon: f64) -> CandidateLocation {
    CandidateLocation::resolved(name, format!("{name}, Main St"), Coordinate::new(lat, lon))
}

fn destination(query: &str, is_unique: bool) -> DestinationRequest {
    DestinationRequest {
        query: query.to_string(),
        is_unique: Some(is_unique),
        predictions: Vec::new(),
        candidates: None,
    }
}

/// Answers later queries sooner so lookups finish out of order
struct SlowResolver {
    inner: FixedResolver,
    calls: AtomicUsize,
}

impl CandidateResolver for SlowResolver {
    async fn resolve(
        &self,
        query: &str,
        anchor: Coordinate,
        is_unique: bool,
    ) -> Result<Vec<CandidateLocation>, ServiceError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) as u64;
        tokio::time::sleep(Duration::from_millis(30u64.saturating_sub(call * 10))).await;
        self.inner.resolve(query, anchor, is_unique).await
    }
}

/// Reports every leg as a fixed multiple of its geodesic length, failing on one origin
struct ScaledProvider {
    factor: f64,
    failing_origin: Option<Coordinate>,
    calls: AtomicUsize,
}

impl DistanceProvider for ScaledProvider {
    async fn measure(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        unit: DistanceUnit,
    ) -> Result<f64, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_origin == Some(origin) {
            return Err(ServiceError::NoRoute);
        }
        Ok(origin.distance_to(&destination, unit) * self.factor)
    }
}

fn town() -> FixedResolver {
    let mut resolver = FixedResolver::new(5);
    resolver.insert("library", vec![place("Library", 0.0, 0.3)]);
    resolver.insert(
        "coffee",
        vec![
            place("Coffee far", 0.0, 1.5),
            place("Coffee near", 0.0, 0.1),
        ],
    );
    resolver.insert("post office", vec![place("Post office", 0.2, 0.2)]);
    resolver
}

#[tokio::test]
async fn test_groups_keep_destination_order() {
    let resolver = SlowResolver {
        inner: town(),
        calls: AtomicUsize::new(0),
    };
    let destinations = vec![
        destination("library", true),
        destination("coffee", false),
        destination("post office", true),
    ];

    let groups = resolve_groups(&resolver, Coordinate::new(0.0, 0.0), &destinations)
        .await
        .unwrap();

    let queries: Vec<_> = groups.iter().map(|g| g.query.as_str()).collect();
    assert_eq!(queries, vec!["library", "coffee", "post office"]);
    assert_eq!(groups[1].candidates[0].name, "Coffee near");
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_unknown_destination_fails_whole_batch() {
    let destinations = vec![destination("library", true), destination("bakery", false)];

    let result = resolve_groups(&town(), Coordinate::new(0.0, 0.0), &destinations).await;

    assert!(matches!(
        result,
        Err(EngineError::Service(ServiceError::NotFound(query))) if query == "bakery"
    ));
}

#[tokio::test]
async fn test_inline_candidates_skip_resolver() {
    let trip = TripRequest::from_json(
        r#"{
            "start": { "latitude": 0.0, "longitude": 0.0 },
            "return_to_start": false,
            "destinations": [
                { "query": "gym", "is_unique": true,
                  "candidates": [ { "name": "Gym", "full_name": "Gym, 9 Lift Rd",
                                    "coordinate": { "latitude": 0.0, "longitude": 0.4 } } ] }
            ]
        }"#,
    )
    .unwrap();

    // Empty resolver: any lookup would fail with NotFound
    let groups = resolve_groups(&FixedResolver::default(), trip.start, &trip.destinations)
        .await
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].candidates[0].full_name, "Gym, 9 Lift Rd");
}

#[tokio::test]
async fn test_unique_inline_candidates_keep_first() {
    let trip = TripRequest::from_json(
        r#"{
            "start": { "latitude": 0.0, "longitude": 0.0 },
            "return_to_start": false,
            "destinations": [
                { "query": "Town Hall", "is_unique": true,
                  "candidates": [
                    { "name": "Town Hall", "full_name": "Town Hall A",
                      "coordinate": { "latitude": 0.0, "longitude": 1.0 } },
                    { "name": "Town Hall", "full_name": "Town Hall B",
                      "coordinate": { "latitude": 0.0, "longitude": 0.1 } } ] }
            ]
        }"#,
    )
    .unwrap();

    let groups = resolve_groups(&FixedResolver::default(), trip.start, &trip.destinations)
        .await
        .unwrap();

    assert!(groups[0].is_unique);
    assert_eq!(groups[0].candidate_count(), 1);
    assert_eq!(groups[0].candidates[0].full_name, "Town Hall A");

    // The nearer second entry is never offered to the search
    let result = PathSearchEngine::default()
        .compute_optimal_path(trip.start, &groups, trip.return_to_start)
        .unwrap();
    assert_eq!(result.legs[0].name, "Town Hall A");
}

#[tokio::test]
async fn test_uniqueness_inferred_from_predictions() {
    let mut resolver = FixedResolver::new(5);
    resolver.insert(
        "Walgreens",
        vec![place("Walgreens", 0.0, 0.2), place("Walgreens", 0.0, 0.4)],
    );
    resolver.insert(
        "Central Library",
        vec![place("Central Library", 0.0, 0.3)],
    );
    let predictions = vec![
        "Walgreens".to_string(),
        "Walgreens Pharmacy".to_string(),
        "Central Library".to_string(),
    ];
    let destinations: Vec<DestinationRequest> = ["Walgreens", "Central Library"]
        .iter()
        .map(|query| DestinationRequest {
            query: query.to_string(),
            is_unique: None,
            predictions: predictions.clone(),
            candidates: None,
        })
        .collect();

    let groups = resolve_groups(&resolver, Coordinate::new(0.0, 0.0), &destinations)
        .await
        .unwrap();

    assert!(!groups[0].is_unique);
    assert_eq!(groups[0].candidate_count(), 2);
    assert!(groups[1].is_unique);
    assert_eq!(groups[1].candidate_count(), 1);
}

#[tokio::test]
async fn test_refinement_keeps_order_and_falls_back_per_leg() {
    let start = Coordinate::new(0.0, 0.0);
    let destinations = vec![
        destination("library", true),
        destination("coffee", false),
        destination("post office", true),
    ];
    let groups = resolve_groups(&town(), start, &destinations).await.unwrap();

    let engine = PathSearchEngine::new(SearchConfig::default().with_unit(DistanceUnit::Kilometers));
    let estimated = engine.compute_optimal_path(start, &groups, true).unwrap();

    // The leg leaving the first stop cannot be measured
    let provider = ScaledProvider {
        factor: 1.5,
        failing_origin: Some(estimated.legs[0].coordinate),
        calls: AtomicUsize::new(0),
    };
    let refined = refine_with_measured(&provider, estimated.clone()).await;

    assert_eq!(provider.calls.load(Ordering::SeqCst), estimated.legs.len());
    assert_eq!(refined.legs.len(), estimated.legs.len());
    for (before, after) in estimated.legs.iter().zip(&refined.legs) {
        assert_eq!(before.name, after.name);
        assert_eq!(before.group, after.group);
    }

    assert_eq!(refined.legs[1].source, DistanceSource::Geodesic);
    assert!((refined.legs[1].distance_from_previous - estimated.legs[1].distance_from_previous).abs() < 1e-9);

    for i in [0, 2, 3] {
        assert_eq!(refined.legs[i].source, DistanceSource::Measured);
        let expected = estimated.legs[i].distance_from_previous * 1.5;
        assert!((refined.legs[i].distance_from_previous - expected).abs() < 1e-9);
    }

    let leg_sum: f64 = refined.legs.iter().map(|leg| leg.distance_from_previous).sum();
    assert!((refined.total_distance - leg_sum).abs() < 1e-9);
    assert!(refined.total_distance > estimated.total_distance);
}
