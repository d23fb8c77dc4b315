//! Sidetrip Engine - POI discovery along a route corridor.
//!
//! Orchestrates the pipeline: route lookup, path flattening, anchor
//! sampling, concurrent nearby searches, corridor filtering, and
//! generation-tagged result publication.

pub mod discover;
pub mod error;
pub mod event;
pub mod planner;

pub use discover::{discover, DiscoveryConfig};
pub use error::PlanError;
pub use event::{PlannerEvent, PlannerEventKind, PlannerPhase};
pub use planner::{PlanSummary, RoutePlanner, RunSnapshot};
