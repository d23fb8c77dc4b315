//! Fan-out/fan-in search aggregation along a route corridor.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use sidetrip_core::{
    is_within_corridor, Candidate, LatLng, NearbySearchProvider, ProviderError, SearchAnchor,
};

/// Tunables for one discovery pass.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Radius of each per-anchor proximity search.
    pub search_radius_m: f64,
    /// Corridor half-width handed to the edge test (degree-scaled there).
    pub corridor_offset_m: f64,
    /// Place category requested from the search provider.
    pub category: String,
    /// Optional cap on how long a single anchor query may run. With `None`
    /// queries are unbounded and a hung query stalls the join barrier. A
    /// timed-out query contributes zero candidates, same as a non-OK
    /// status.
    pub anchor_timeout: Option<Duration>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            search_radius_m: 2_000.0,
            corridor_offset_m: 1_000.0,
            category: "tourist_attraction".to_string(),
            anchor_timeout: None,
        }
    }
}

/// Issue one nearby search per anchor, concurrently, and merge the batches.
///
/// Batches are processed in arrival order. Membership of the final result is
/// order-independent: dedup on `place_id` makes the merge commutative and
/// idempotent. Display fields keep the first-seen value. A query that errors
/// or returns a non-OK status contributes nothing and never fails the pass.
///
/// `on_accept` fires once per accepted candidate, in acceptance order, so a
/// consumer can surface results while later anchors are still in flight.
/// The function returns only after every anchor has reported.
pub async fn discover<S>(
    search: Arc<S>,
    anchors: &[SearchAnchor],
    spine: &[LatLng],
    config: &DiscoveryConfig,
    mut on_accept: impl FnMut(&Candidate),
) -> Vec<Candidate>
where
    S: NearbySearchProvider + ?Sized + 'static,
{
    if anchors.is_empty() {
        return Vec::new();
    }

    let (tx, mut rx) = mpsc::channel(anchors.len());
    for anchor in anchors.iter().copied() {
        let search = Arc::clone(&search);
        let tx = tx.clone();
        let category = config.category.clone();
        let radius_m = config.search_radius_m;
        let anchor_timeout = config.anchor_timeout;
        tokio::spawn(async move {
            let query = search.nearby_search(anchor.position, radius_m, &category);
            let outcome = match anchor_timeout {
                Some(limit) => match tokio::time::timeout(limit, query).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(ProviderError::Timeout),
                },
                None => query.await,
            };
            let _ = tx.send((anchor, outcome)).await;
        });
    }
    drop(tx);

    let mut seen = HashSet::new();
    let mut accepted = Vec::new();
    let mut skipped_anchors = 0usize;

    // Each task sends exactly once, so the channel drains only after every
    // anchor has reported: an all-must-complete barrier, not a race.
    while let Some((anchor, outcome)) = rx.recv().await {
        match outcome {
            Ok(response) if response.status.is_ok() => {
                merge_batch(
                    response.results,
                    spine,
                    config.corridor_offset_m,
                    &mut seen,
                    &mut accepted,
                    &mut on_accept,
                );
            }
            Ok(response) => {
                skipped_anchors += 1;
                tracing::warn!(
                    status = %response.status,
                    fraction = anchor.fraction,
                    "nearby search returned no usable batch"
                );
            }
            Err(e) => {
                skipped_anchors += 1;
                tracing::warn!(error = %e, fraction = anchor.fraction, "nearby search failed");
            }
        }
    }

    tracing::debug!(
        accepted = accepted.len(),
        anchors = anchors.len(),
        skipped_anchors,
        "discovery pass complete"
    );
    accepted
}

/// Fold one batch into the accumulated result.
///
/// Per candidate: drop if no resolvable location, drop if the identifier was
/// already admitted (first writer keeps its display fields), drop if outside
/// the corridor. Survivors are appended and reported.
fn merge_batch(
    batch: Vec<Candidate>,
    spine: &[LatLng],
    corridor_offset_m: f64,
    seen: &mut HashSet<String>,
    accepted: &mut Vec<Candidate>,
    on_accept: &mut impl FnMut(&Candidate),
) {
    for candidate in batch {
        let Some(location) = candidate.location else {
            continue;
        };
        if seen.contains(&candidate.place_id) {
            continue;
        }
        if !is_within_corridor(location, spine, corridor_offset_m) {
            continue;
        }
        seen.insert(candidate.place_id.clone());
        on_accept(&candidate);
        accepted.push(candidate);
    }
}
