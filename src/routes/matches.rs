use actix_web::{web, HttpResponse, Responder};
use std::collections::HashSet;
use std::sync::Arc;
use validator::Validate;
use crate::config::MatchingSettings;
use crate::core::{compute_distance_km, filter_within_radius, sort_by_distance, MatchQuery, Matcher};
use crate::models::{
    DistanceRequest, DistanceResponse, ErrorResponse, HealthResponse, NearbyEntity, NearbyRequest,
    NearbyResponse, RankRequest, RankResponse, RefreshResponse,
};
use crate::services::{DirectoryError, TutorDirectory};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<TutorDirectory>,
    pub matcher: Matcher,
    pub matching: MatchingSettings,
}

impl AppState {
    /// Requested page size, defaulted and capped by configuration
    fn resolve_limit(&self, requested: Option<u16>) -> usize {
        requested
            .unwrap_or(self.matching.default_limit)
            .min(self.matching.max_limit) as usize
    }
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/distance", web::post().to(distance))
        .route("/tutors/nearby", web::post().to(nearby_tutors))
        .route("/tutors/rank", web::post().to(rank_tutors))
        .route("/tutors/refresh", web::post().to(refresh_directory));
}

fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

fn directory_unavailable(err: DirectoryError) -> HttpResponse {
    tracing::error!("Failed to load tutor directory: {}", err);
    HttpResponse::BadGateway().json(ErrorResponse {
        error: "Failed to load tutors".to_string(),
        message: err.to_string(),
        status_code: 502,
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let (status, tutors_loaded) = match state.directory.tutors().await {
        Ok(tutors) => ("healthy", tutors.len()),
        Err(e) => {
            tracing::warn!("Health check could not load directory: {}", e);
            ("degraded", 0)
        }
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        tutors_loaded,
    })
}

/// Distance endpoint
///
/// POST /api/v1/distance
///
/// Request body:
/// ```json
/// {
///   "from": { "latitude": 23.7465, "longitude": 90.3763 },
///   "to": { "latitude": 23.7925, "longitude": 90.4078 }
/// }
/// ```
async fn distance(req: web::Json<DistanceRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    HttpResponse::Ok().json(DistanceResponse {
        distance_km: compute_distance_km(&req.from, &req.to),
    })
}

/// Nearby tutors endpoint, nearest first
///
/// POST /api/v1/tutors/nearby
///
/// Request body:
/// ```json
/// {
///   "latitude": 23.8103,
///   "longitude": 90.4125,
///   "radiusKm": 10,
///   "limit": 20
/// }
/// ```
async fn nearby_tutors(
    state: web::Data<AppState>,
    req: web::Json<NearbyRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for nearby request: {:?}", errors);
        return validation_failed(errors);
    }

    let request_id = uuid::Uuid::new_v4().to_string();
    let limit = state.resolve_limit(req.limit);
    let center = &req.center;

    let tutors = match state.directory.tutors().await {
        Ok(tutors) => tutors,
        Err(e) => return directory_unavailable(e),
    };

    let within = filter_within_radius(center, tutors.as_slice(), req.radius_km);
    let nearby: Vec<NearbyEntity> = sort_by_distance(center, &within)
        .into_iter()
        .take(limit)
        .map(|entity| NearbyEntity {
            distance_km: compute_distance_km(center, &entity.location),
            entity,
        })
        .collect();

    tracing::info!(
        request_id = %request_id,
        "Returning {} tutors within {}km (from {} candidates)",
        nearby.len(),
        req.radius_km,
        tutors.len()
    );

    HttpResponse::Ok().json(NearbyResponse {
        request_id,
        tutors: nearby,
        total_candidates: tutors.len(),
        radius_km: req.radius_km,
    })
}

/// Ranked matches endpoint
///
/// POST /api/v1/tutors/rank
///
/// Request body:
/// ```json
/// {
///   "latitude": 23.8103,
///   "longitude": 90.4125,
///   "maxDistanceKm": 10,
///   "subjects": ["গণিত"],
///   "limit": 20
/// }
/// ```
async fn rank_tutors(
    state: web::Data<AppState>,
    req: web::Json<RankRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for rank request: {:?}", errors);
        return validation_failed(errors);
    }

    let request_id = uuid::Uuid::new_v4().to_string();
    let limit = state.resolve_limit(req.limit);
    let max_distance_km = req
        .max_distance_km
        .unwrap_or(state.matching.default_max_distance_km);
    let center = &req.center;
    let subjects: HashSet<String> = req.subjects.iter().cloned().collect();

    let tutors = match state.directory.tutors().await {
        Ok(tutors) => tutors,
        Err(e) => return directory_unavailable(e),
    };

    let query = MatchQuery {
        center,
        preferred_tags: Some(&subjects),
        max_distance_km,
    };

    let result = state.matcher.find_matches(&query, tutors.as_slice(), Some(limit));

    tracing::info!(
        request_id = %request_id,
        "Returning {} ranked tutors (from {} candidates, subjects: {:?})",
        result.matches.len(),
        result.total_candidates,
        req.subjects
    );

    HttpResponse::Ok().json(RankResponse {
        request_id,
        matches: result.matches,
        total_candidates: result.total_candidates,
        max_distance_km,
    })
}

/// Reload the tutor directory
///
/// POST /api/v1/tutors/refresh
async fn refresh_directory(state: web::Data<AppState>) -> impl Responder {
    state.directory.invalidate().await;

    match state.directory.tutors().await {
        Ok(tutors) => HttpResponse::Ok().json(RefreshResponse {
            success: true,
            tutors_loaded: tutors.len(),
        }),
        Err(e) => directory_unavailable(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::DirectorySource;

    fn state(default_limit: u16, max_limit: u16) -> AppState {
        let directory = TutorDirectory::new(
            DirectorySource::File("data/tutors.json".into()),
            30,
            5,
        )
        .unwrap();

        AppState {
            directory: Arc::new(directory),
            matcher: Matcher::default(),
            matching: MatchingSettings {
                default_max_distance_km: 10.0,
                default_limit,
                max_limit,
            },
        }
    }

    #[test]
    fn test_resolve_limit() {
        let state = state(20, 100);

        assert_eq!(state.resolve_limit(None), 20);
        assert_eq!(state.resolve_limit(Some(5)), 5);
        assert_eq!(state.resolve_limit(Some(500)), 100);
    }
}
