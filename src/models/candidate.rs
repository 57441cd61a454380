// Candidate model representing one concrete place a destination may resolve to

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::models::Coordinate;

/// A concrete physical place returned by the candidate resolver
///
/// Two candidates are the same place when their normalized full names match,
/// regardless of which group produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateLocation {
    /// Short name of the place (e.g. "Walgreens")
    pub name: String,

    /// Full display name, usually including the street address
    pub full_name: String,

    /// Set once by the resolver
    #[serde(default)]
    coordinate: Option<Coordinate>,
}

impl CandidateLocation {
    /// Creates an unresolved candidate
    pub fn new<S: Into<String>, F: Into<String>>(name: S, full_name: F) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            coordinate: None,
        }
    }

    /// Creates a candidate whose coordinate is already known
    pub fn resolved<S: Into<String>, F: Into<String>>(
        name: S,
        full_name: F,
        coordinate: Coordinate,
    ) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            coordinate: Some(coordinate),
        }
    }

    /// Gets the coordinate if the candidate has been resolved
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.coordinate
    }

    /// Checks whether the resolver has supplied a coordinate
    pub fn is_resolved(&self) -> bool {
        self.coordinate.is_some()
    }

    /// Records the resolved coordinate
    /// Returns false, leaving the candidate untouched, if it was already resolved
    pub fn set_coordinate(&mut self, coordinate: Coordinate) -> bool {
        if self.coordinate.is_some() {
            return false;
        }
        self.coordinate = Some(coordinate);
        true
    }

    /// Identity key used for place de-duplication
    pub fn place_key(&self) -> String {
        normalize_name(&self.full_name)
    }
}

impl PartialEq for CandidateLocation {
    fn eq(&self, other: &Self) -> bool {
        self.place_key() == other.place_key()
    }
}

impl Eq for CandidateLocation {}

impl Hash for CandidateLocation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.place_key().hash(state);
    }
}

/// Trims, collapses inner whitespace and lowercases a place name
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equality_uses_full_name() {
        let a = CandidateLocation::resolved(
            "CVS",
            "CVS, 12 Main St",
            Coordinate::new(1.0, 1.0),
        );
        let b = CandidateLocation::new("CVS Pharmacy", "  cvs,   12 MAIN st ");
        let c = CandidateLocation::new("CVS", "CVS, 40 Elm St");

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_coordinate_is_set_once() {
        let mut candidate = CandidateLocation::new("Library", "Library, 1 Book Rd");
        assert!(!candidate.is_resolved());

        assert!(candidate.set_coordinate(Coordinate::new(3.0, 4.0)));
        assert!(!candidate.set_coordinate(Coordinate::new(5.0, 6.0)));
        assert_eq!(candidate.coordinate(), Some(Coordinate::new(3.0, 4.0)));
    }
}
