use thiserror::Error;

/// Failures reported by the external resolver and distance services
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("location not found: {0}")]
    NotFound(String),

    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    #[error("no route between the requested points")]
    NoRoute,

    #[error("service quota exceeded")]
    QuotaExceeded,

    #[error("API error: {status} - {message}")]
    Api { status: String, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ServiceError::Malformed(error.to_string())
        } else {
            ServiceError::NetworkUnavailable(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(error: serde_json::Error) -> Self {
        ServiceError::Malformed(error.to_string())
    }
}

/// Errors produced while planning a route
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no destinations were supplied")]
    EmptyGroups,

    #[error("destination {group} ({query:?}) is not fully resolved: {reason}")]
    IncompleteResolution {
        group: usize,
        query: String,
        reason: String,
    },

    #[error("destination {group} ({query:?}) cannot be satisfied by any route")]
    UnsatisfiableGroup { group: usize, query: String },

    #[error(transparent)]
    Service(#[from] ServiceError),
}
