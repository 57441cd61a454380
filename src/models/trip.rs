// Trip request model read by the command line front end

use serde::Deserialize;

use crate::models::{CandidateLocation, Coordinate};

/// One destination as written in a trip file
#[derive(Debug, Clone, Deserialize)]
pub struct DestinationRequest {
    pub query: String,

    /// Whether the query names a single place; inferred from `predictions` when absent
    #[serde(default)]
    pub is_unique: Option<bool>,

    /// Autocomplete suggestions the query was picked from
    #[serde(default)]
    pub predictions: Vec<String>,

    /// Known candidates; when absent the destination is resolved online
    #[serde(default)]
    pub candidates: Option<Vec<CandidateLocation>>,
}

/// A full trip: where the user is and what they want to visit
#[derive(Debug, Clone, Deserialize)]
pub struct TripRequest {
    pub start: Coordinate,

    #[serde(default = "default_return_to_start")]
    pub return_to_start: bool,

    pub destinations: Vec<DestinationRequest>,
}

fn default_return_to_start() -> bool {
    true
}

impl TripRequest {
    /// Parses a trip from its JSON representation
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Checks whether every destination already lists its candidates
    pub fn is_offline(&self) -> bool {
        self.destinations.iter().all(|d| d.candidates.is_some())
    }
}
