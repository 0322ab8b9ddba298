// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod matcher;
pub mod scoring;

pub use distance::{haversine_distance, compute_distance_km, round_to_tenth};
pub use filters::{filter_within_radius, sort_by_distance, is_within_radius, matches_preferred_tags, is_available};
pub use matcher::{Matcher, MatchQuery, MatchResult, rank_matches};
pub use scoring::calculate_match_score;
