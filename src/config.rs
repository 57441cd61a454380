use serde::{Deserialize, Serialize};

use crate::models::DistanceUnit;

pub const MAPS_API_KEY_ENV_VAR: &str = "PATHFINDER_MAPS_API_KEY";
pub const DEFAULT_NEARBY_CAP: usize = 5;

/// Tunables for resolution and search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Unit every reported distance is expressed in
    pub unit: DistanceUnit,

    /// Drop partial paths that can no longer beat the best complete route
    pub prune: bool,

    /// Maximum number of nearby matches kept for an ambiguous destination
    pub nearby_cap: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            unit: DistanceUnit::Miles,
            prune: true,
            nearby_cap: DEFAULT_NEARBY_CAP,
        }
    }
}

impl SearchConfig {
    pub fn with_unit(mut self, unit: DistanceUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_pruning(mut self, prune: bool) -> Self {
        self.prune = prune;
        self
    }
}

/// Reads the maps API key, loading `./.env.local` first when present
pub fn maps_api_key_from_env() -> Option<String> {
    dotenvy::from_filename("./.env.local").ok();
    std::env::var(MAPS_API_KEY_ENV_VAR)
        .ok()
        .filter(|key| !key.trim().is_empty())
}
