//! Tutor Match - nearby tutor matching for the tutor/guardian platform
//!
//! The [`core`] module holds the pure matching engine: Haversine distance,
//! radius filtering, distance sorting and rating-vs-distance ranking. The
//! rest of the crate wraps it in a small HTTP service fed by a tutor
//! directory.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{
    compute_distance_km, filter_within_radius, haversine_distance, rank_matches, sort_by_distance,
    Matcher,
};
pub use models::{Geolocated, Location, RankedEntity, ScoredMatch, ScoringWeights};
