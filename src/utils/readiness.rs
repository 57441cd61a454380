// Readiness check run before any search starts

use crate::error::EngineError;
use crate::models::CandidateGroup;

/// Checks that every group has candidates and every candidate has a coordinate
pub fn is_ready(groups: &[CandidateGroup]) -> bool {
    groups.iter().all(CandidateGroup::is_resolved)
}

/// Same check as [`is_ready`], reporting the first group that fails it
pub fn check_ready(groups: &[CandidateGroup]) -> Result<(), EngineError> {
    for (index, group) in groups.iter().enumerate() {
        if group.candidates.is_empty() {
            return Err(EngineError::IncompleteResolution {
                group: index,
                query: group.query.clone(),
                reason: "no candidates".to_string(),
            });
        }

        if let Some(candidate) = group.first_unresolved() {
            return Err(EngineError::IncompleteResolution {
                group: index,
                query: group.query.clone(),
                reason: format!("candidate {:?} has no coordinate", candidate.full_name),
            });
        }
    }

    Ok(())
}
