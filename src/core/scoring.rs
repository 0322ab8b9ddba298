use crate::models::{RankedEntity, ScoringWeights};

/// Highest rating a tutor can carry
pub const MAX_QUALITY_SCORE: f64 = 5.0;

/// Calculate a match score for a candidate already known to be in range
///
/// Scoring formula:
/// score = (
///     quality / 5 * 0.6 +                     # Higher rating = higher score
///     (1 - distance / max_distance) * 0.4     # Closer = higher score
/// )
///
/// `distance_km` is the rounded distance used for the radius filter.
pub fn calculate_match_score(
    entity: &RankedEntity,
    distance_km: f64,
    max_distance_km: f64,
    weights: &ScoringWeights,
) -> f64 {
    let quality_score = calculate_quality_score(entity.quality_score);
    let proximity_score = calculate_proximity_score(distance_km, max_distance_km);

    quality_score * weights.quality + proximity_score * weights.proximity
}

/// Calculate quality score (0-1)
#[inline]
fn calculate_quality_score(quality: f64) -> f64 {
    quality / MAX_QUALITY_SCORE
}

/// Calculate proximity score (1 at the center, falling linearly to 0 at the radius)
///
/// A zero radius only ever admits candidates at distance 0, which get the
/// full score instead of a division by zero.
#[inline]
fn calculate_proximity_score(distance_km: f64, max_distance_km: f64) -> f64 {
    if max_distance_km == 0.0 {
        return 1.0;
    }

    1.0 - distance_km / max_distance_km
}
