use std::collections::HashSet;

use crate::core::{
    distance::compute_distance_km,
    filters::{is_available, matches_preferred_tags},
    scoring::calculate_match_score,
};
use crate::models::{Location, RankedEntity, ScoredMatch, ScoringWeights};

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<ScoredMatch>,
    pub total_candidates: usize,
}

/// What a caller is looking for
#[derive(Debug, Clone)]
pub struct MatchQuery<'a> {
    pub center: &'a Location,
    pub preferred_tags: Option<&'a HashSet<String>>,
    pub max_distance_km: f64,
}

/// Main matching orchestrator - implements the ranking pipeline
///
/// # Pipeline Stages
/// 1. Radius filter
/// 2. Preferred tag filter
/// 3. Availability filter
/// 4. Scoring and ranking
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Find ranked matches around a center point
    ///
    /// # Arguments
    /// * `query` - Center, preferred tags and search radius
    /// * `candidates` - All potential candidates from the directory
    /// * `limit` - Maximum number of matches to return, `None` for all
    ///
    /// # Returns
    /// MatchResult containing scored matches, best first. Equal scores are
    /// ordered by distance, then by input order.
    pub fn find_matches(
        &self,
        query: &MatchQuery<'_>,
        candidates: &[RankedEntity],
        limit: Option<usize>,
    ) -> MatchResult {
        let total_candidates = candidates.len();

        let mut scored_matches: Vec<ScoredMatch> = candidates
            .iter()
            // Stage 1: Radius filter
            .filter_map(|entity| {
                let distance_km = compute_distance_km(query.center, &entity.location);
                (distance_km <= query.max_distance_km).then_some((entity, distance_km))
            })
            // Stage 2: Preferred tags
            .filter(|(entity, _)| matches_preferred_tags(entity, query.preferred_tags))
            // Stage 3: Availability
            .filter(|(entity, _)| is_available(entity))
            // Stage 4: Score
            .map(|(entity, distance_km)| {
                let match_score = calculate_match_score(
                    entity,
                    distance_km,
                    query.max_distance_km,
                    &self.weights,
                );

                ScoredMatch {
                    entity: entity.clone(),
                    distance_km,
                    match_score,
                }
            })
            .collect();

        // Sort by score (descending) and then by distance (ascending),
        // NaN scores last
        scored_matches.sort_by(|a, b| {
            a.match_score
                .is_nan()
                .cmp(&b.match_score.is_nan())
                .then_with(|| b.match_score.total_cmp(&a.match_score))
                .then_with(|| a.distance_km.total_cmp(&b.distance_km))
        });

        if let Some(limit) = limit {
            scored_matches.truncate(limit);
        }

        MatchResult {
            matches: scored_matches,
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Rank candidates around `center` with the default 60/40 weighting
///
/// Returns the surviving entities best first. See [`Matcher::find_matches`]
/// for the pipeline.
pub fn rank_matches(
    center: &Location,
    candidates: &[RankedEntity],
    preferred_tags: Option<&HashSet<String>>,
    max_distance_km: f64,
) -> Vec<RankedEntity> {
    let query = MatchQuery {
        center,
        preferred_tags,
        max_distance_km,
    };

    Matcher::with_default_weights()
        .find_matches(&query, candidates, None)
        .matches
        .into_iter()
        .map(|m| m.entity)
        .collect()
}
