// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Location, Geolocated, RankedEntity, ScoredMatch, NearbyEntity, ScoringWeights};
pub use requests::{DistanceRequest, NearbyRequest, RankRequest};
pub use responses::{RankResponse, NearbyResponse, DistanceResponse, HealthResponse, ErrorResponse, RefreshResponse};
