//! Marker bookkeeping driven by planner events.
//!
//! The engine emits accepted candidates as a stream; the presentation layer
//! turns them into markers here and clears them when a new run begins. The
//! engine itself carries no rendering dependency.

use std::collections::HashMap;

use tokio::sync::broadcast;

use sidetrip_core::LatLng;
use sidetrip_engine::{PlannerEvent, PlannerEventKind};

/// Opaque handle for a rendered marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(u64);

/// Map surface abstraction: create a marker, remove it later by handle.
pub trait MarkerRenderer {
    fn create(&mut self, position: LatLng, label: &str, icon: Option<&str>) -> MarkerHandle;
    fn remove(&mut self, handle: MarkerHandle);
}

/// Renderer that logs marker activity; stands in for a real map surface.
#[derive(Debug, Default)]
pub struct ConsoleRenderer {
    next_handle: u64,
}

impl MarkerRenderer for ConsoleRenderer {
    fn create(&mut self, position: LatLng, label: &str, _icon: Option<&str>) -> MarkerHandle {
        self.next_handle += 1;
        tracing::info!(lat = position.lat, lng = position.lng, label, "marker created");
        MarkerHandle(self.next_handle)
    }

    fn remove(&mut self, handle: MarkerHandle) {
        tracing::debug!(?handle, "marker removed");
    }
}

/// Consume planner events, keeping markers in step with the active run.
///
/// Markers from the previous run are removed when the next run starts.
/// Returns when the planner (the event sender) goes away.
pub async fn run_marker_task<R: MarkerRenderer>(
    mut events: broadcast::Receiver<PlannerEvent>,
    renderer: &mut R,
) {
    let mut markers: HashMap<String, MarkerHandle> = HashMap::new();
    loop {
        match events.recv().await {
            Ok(event) => match event.kind {
                PlannerEventKind::RunStarted { .. } => {
                    for (_, handle) in markers.drain() {
                        renderer.remove(handle);
                    }
                }
                PlannerEventKind::PoiAccepted(candidate) => {
                    // Accepted candidates always carry a location, but the
                    // renderer has no say in that invariant; skip defensively.
                    if let Some(location) = candidate.location {
                        let handle =
                            renderer.create(location, &candidate.name, candidate.icon.as_deref());
                        markers.insert(candidate.place_id, handle);
                    }
                }
                PlannerEventKind::PhaseChanged(_)
                | PlannerEventKind::RunCompleted { .. }
                | PlannerEventKind::RunFailed { .. } => {}
            },
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "marker task lagged behind planner events");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
