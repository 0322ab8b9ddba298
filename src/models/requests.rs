use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::Location;

/// Request to measure the distance between two points
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DistanceRequest {
    #[validate(nested)]
    pub from: Location,
    #[validate(nested)]
    pub to: Location,
}

/// Request for tutors around a point, nearest first
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NearbyRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub center: Location,
    #[validate(range(min = 0.0))]
    #[serde(alias = "radius_km")]
    pub radius_km: f64,
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Request for ranked tutor matches
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RankRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub center: Location,
    #[validate(range(min = 0.0))]
    #[serde(alias = "max_distance_km", default)]
    pub max_distance_km: Option<f64>,
    #[serde(alias = "tags", default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub limit: Option<u16>,
}
