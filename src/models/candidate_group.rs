// Candidate group model representing one destination the user asked for

use serde::{Deserialize, Serialize};

use crate::models::CandidateLocation;

/// One user-requested destination and the places it may resolve to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateGroup {
    /// Text the user entered or selected
    pub query: String,

    /// True when the query names a single address, false for a category or chain
    pub is_unique: bool,

    /// Resolved candidates in resolver order
    #[serde(default)]
    pub candidates: Vec<CandidateLocation>,
}

impl CandidateGroup {
    /// Creates a group with no candidates yet
    pub fn new<S: Into<String>>(query: S, is_unique: bool) -> Self {
        Self {
            query: query.into(),
            is_unique,
            candidates: Vec::new(),
        }
    }

    /// Creates a group from an already resolved candidate list
    pub fn with_candidates<S: Into<String>>(
        query: S,
        is_unique: bool,
        candidates: Vec<CandidateLocation>,
    ) -> Self {
        Self {
            query: query.into(),
            is_unique,
            candidates,
        }
    }

    /// Adds a candidate to the group
    pub fn add_candidate(&mut self, candidate: CandidateLocation) {
        self.candidates.push(candidate);
    }

    /// Gets the number of candidates in the group
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Checks if the group has at least one candidate and all of them carry a coordinate
    pub fn is_resolved(&self) -> bool {
        !self.candidates.is_empty() && self.candidates.iter().all(|c| c.is_resolved())
    }

    /// Returns the first candidate lacking a coordinate, if any
    pub fn first_unresolved(&self) -> Option<&CandidateLocation> {
        self.candidates.iter().find(|c| !c.is_resolved())
    }
}
