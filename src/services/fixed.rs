// In-memory resolver backed by a fixed table of known places

use std::collections::HashMap;

use crate::config::DEFAULT_NEARBY_CAP;
use crate::error::ServiceError;
use crate::models::{normalize_name, CandidateLocation, Coordinate};
use crate::services::resolution::rank_by_proximity;
use crate::services::CandidateResolver;

/// Resolves queries from a prepared table instead of a remote service
#[derive(Debug, Clone)]
pub struct FixedResolver {
    places: HashMap<String, Vec<CandidateLocation>>,
    cap: usize,
}

impl Default for FixedResolver {
    fn default() -> Self {
        Self::new(DEFAULT_NEARBY_CAP)
    }
}

impl FixedResolver {
    /// Creates an empty resolver keeping at most `cap` nearby matches
    pub fn new(cap: usize) -> Self {
        Self {
            places: HashMap::new(),
            cap,
        }
    }

    /// Registers the places a query resolves to
    pub fn insert<S: AsRef<str>>(&mut self, query: S, candidates: Vec<CandidateLocation>) {
        self.places
            .entry(normalize_name(query.as_ref()))
            .or_default()
            .extend(candidates);
    }

    fn lookup(
        &self,
        query: &str,
        anchor: Coordinate,
        is_unique: bool,
    ) -> Result<Vec<CandidateLocation>, ServiceError> {
        let candidates = self
            .places
            .get(&normalize_name(query))
            .filter(|candidates| !candidates.is_empty())
            .ok_or_else(|| ServiceError::NotFound(query.to_string()))?;

        if is_unique {
            Ok(candidates.iter().take(1).cloned().collect())
        } else {
            Ok(rank_by_proximity(candidates.clone(), anchor, self.cap))
        }
    }
}

impl CandidateResolver for FixedResolver {
    async fn resolve(
        &self,
        query: &str,
        anchor: Coordinate,
        is_unique: bool,
    ) -> Result<Vec<CandidateLocation>, ServiceError> {
        self.lookup(query, anchor, is_unique)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> FixedResolver {
        let mut resolver = FixedResolver::new(2);
        resolver.insert(
            "Pharmacy",
            vec![
                CandidateLocation::resolved("CVS", "CVS, 3 C St", Coordinate::new(0.0, 3.0)),
                CandidateLocation::resolved("CVS", "CVS, 1 A St", Coordinate::new(0.0, 1.0)),
                CandidateLocation::resolved("CVS", "CVS, 2 B St", Coordinate::new(0.0, 2.0)),
            ],
        );
        resolver
    }

    #[tokio::test]
    async fn test_ambiguous_query_is_ranked_and_capped() {
        let found = resolver()
            .resolve("  pharmacy ", Coordinate::new(0.0, 0.0), false)
            .await
            .unwrap();

        let names: Vec<_> = found.iter().map(|c| c.full_name.as_str()).collect();
        assert_eq!(names, vec!["CVS, 1 A St", "CVS, 2 B St"]);
    }

    #[tokio::test]
    async fn test_unique_query_returns_one() {
        let found = resolver()
            .resolve("Pharmacy", Coordinate::new(0.0, 0.0), true)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_query() {
        let result = resolver()
            .resolve("bakery", Coordinate::new(0.0, 0.0), false)
            .await;
        assert!(matches!(result, Err(ServiceError::NotFound(q)) if q == "bakery"));
    }
}
