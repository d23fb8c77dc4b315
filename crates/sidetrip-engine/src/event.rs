//! Run lifecycle events published by the planner.

use sidetrip_core::Candidate;

/// Phases of a route-planning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerPhase {
    Idle,
    Validating,
    RoutePending,
    Discovering,
    Done,
    Failed,
}

/// An event from the currently active run.
///
/// Events from superseded runs are never published; consumers can still key
/// marker bookkeeping off `generation` to drop anything queued before a new
/// `RunStarted`.
#[derive(Debug, Clone)]
pub struct PlannerEvent {
    pub generation: u64,
    pub kind: PlannerEventKind,
}

#[derive(Debug, Clone)]
pub enum PlannerEventKind {
    RunStarted {
        origin: String,
        destination: String,
    },
    PhaseChanged(PlannerPhase),
    /// A candidate passed location, dedup, and corridor checks. The
    /// presentation layer creates its marker from this event.
    PoiAccepted(Candidate),
    RunCompleted {
        total: usize,
    },
    RunFailed {
        message: String,
    },
}
