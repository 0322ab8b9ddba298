use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

/// A single geographic point in degrees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

impl Validate for Location {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !(-90.0..=90.0).contains(&self.latitude) {
            errors.add("latitude", ValidationError::new("range"));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            errors.add("longitude", ValidationError::new("range"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Anything that sits at a point on the map
///
/// Implemented by [`Location`] itself and by every entity that carries one,
/// so the radius and sorting helpers work over either.
pub trait Geolocated {
    fn location(&self) -> &Location;
}

impl Geolocated for Location {
    #[inline]
    fn location(&self) -> &Location {
        self
    }
}

/// A rankable entity with a location (a tutor, in practice)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntity {
    #[validate(length(min = 1))]
    pub id: String,
    #[serde(alias = "name")]
    pub display_name: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub location: Location,
    #[serde(alias = "subjects", default)]
    pub tags: Vec<String>,
    #[serde(alias = "rating")]
    #[validate(range(min = 0.0, max = 5.0))]
    pub quality_score: f64,
    #[serde(default = "default_true")]
    pub availability: bool,
}

impl RankedEntity {
    /// True when at least one of the entity's tags is in `tags`
    pub fn shares_tag_with<'a, I>(&self, tags: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        tags.into_iter().any(|tag| self.tags.contains(tag))
    }
}

impl Geolocated for RankedEntity {
    #[inline]
    fn location(&self) -> &Location {
        &self.location
    }
}

fn default_true() -> bool { true }

/// Ranked match result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredMatch {
    #[serde(flatten)]
    pub entity: RankedEntity,
    pub distance_km: f64,
    pub match_score: f64,
}

/// Entity annotated with its distance from a search center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyEntity {
    #[serde(flatten)]
    pub entity: RankedEntity,
    pub distance_km: f64,
}

/// Scoring weights
///
/// The defaults are the product's fixed 60/40 split between rating and
/// proximity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub quality: f64,
    pub proximity: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            quality: 0.6,
            proximity: 0.4,
        }
    }
}
