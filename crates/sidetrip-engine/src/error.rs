//! Planner error taxonomy.

use thiserror::Error;

use sidetrip_core::{ProviderError, ProviderStatus};

/// Terminal, user-visible failures of a route-planning run.
///
/// Per-anchor search failures are deliberately absent: they degrade
/// coverage, not correctness, and are absorbed during discovery.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Start or destination text was empty. No provider call is made.
    #[error("both start and destination locations are required")]
    MissingEndpoints,
    /// The routing provider answered but produced no usable route.
    #[error("could not calculate route: {status}")]
    NoRoute { status: ProviderStatus },
    /// The routing provider could not be reached or understood.
    #[error("route request failed: {0}")]
    Routing(#[from] ProviderError),
}
