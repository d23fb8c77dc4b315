//! Sidetrip Maps - mapping web service client
//!
//! Implements the routing and nearby-search ports over a Google-style
//! HTTP API: directions lookups and proximity place searches.

pub mod client;
pub mod directions;
pub mod places;

pub use client::{MapsClient, DEFAULT_BASE_URL};
