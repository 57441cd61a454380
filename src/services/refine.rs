// Swaps geodesic leg estimates for measured distances after the search

use futures::future::join_all;
use tracing::{debug, warn};

use crate::models::PathResult;
use crate::services::DistanceProvider;

/// Replaces each leg's distance with one measured by `provider`
///
/// Lookups run concurrently, one per leg. A failed lookup keeps the geodesic
/// estimate for that leg. The visiting order is never changed.
pub async fn refine_with_measured<P>(provider: &P, result: PathResult) -> PathResult
where
    P: DistanceProvider + Sync,
{
    let unit = result.unit;

    let lookups = result
        .edges()
        .into_iter()
        .enumerate()
        .map(|(index, (origin, destination))| async move {
            if origin == destination {
                return None;
            }
            match provider.measure(origin, destination, unit).await {
                Ok(distance) => Some(distance),
                Err(e) => {
                    warn!("Keeping geodesic estimate for leg {}: {}", index, e);
                    None
                }
            }
        });

    let measured = join_all(lookups).await;
    debug!(
        "Measured {} of {} legs",
        measured.iter().filter(|m| m.is_some()).count(),
        measured.len()
    );

    result.with_measured_distances(&measured)
}
