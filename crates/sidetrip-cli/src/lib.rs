//! Presentation-layer glue for the discovery engine: configuration and
//! console marker rendering.

pub mod config;
pub mod markers;
