use crate::config::{DirectorySettings, SourceKind};
use crate::models::RankedEntity;
use moka::future::{Cache, CacheBuilder};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

const TUTORS_KEY: &str = "tutors:all";

/// Errors that can occur while loading the tutor directory
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to read directory file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Invalid directory configuration: {0}")]
    Misconfigured(String),
}

/// Where tutor records come from
#[derive(Debug, Clone)]
pub enum DirectorySource {
    /// A JSON seed file holding the tutor array
    File(PathBuf),
    /// A REST endpoint answering GET with the tutor array
    Remote {
        endpoint: String,
        api_key: Option<String>,
    },
}

/// Tutor directory
///
/// Supplies the full candidate list for every matching call. Loaded lists
/// are cached in memory for `ttl_secs`; records that break the location or
/// rating invariants are dropped at load time so the matching core never
/// sees them.
pub struct TutorDirectory {
    source: DirectorySource,
    client: Client,
    cache: Cache<String, Arc<Vec<RankedEntity>>>,
}

impl TutorDirectory {
    /// Create a new directory over `source`
    pub fn new(
        source: DirectorySource,
        ttl_secs: u64,
        timeout_secs: u64,
    ) -> Result<Self, DirectoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        let cache = CacheBuilder::new(1)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Ok(Self {
            source,
            client,
            cache,
        })
    }

    /// Build a directory from the `[directory]` settings section
    pub fn from_settings(settings: &DirectorySettings) -> Result<Self, DirectoryError> {
        let source = match settings.source {
            SourceKind::File => DirectorySource::File(PathBuf::from(&settings.path)),
            SourceKind::Remote => {
                let endpoint = settings.endpoint.clone().ok_or_else(|| {
                    DirectoryError::Misconfigured(
                        "directory.endpoint is required for the remote source".into(),
                    )
                })?;
                DirectorySource::Remote {
                    endpoint,
                    api_key: settings.api_key.clone(),
                }
            }
        };

        Self::new(source, settings.cache_ttl_secs, settings.timeout_secs)
    }

    pub fn source(&self) -> &DirectorySource {
        &self.source
    }

    /// All valid tutors, from cache when fresh
    pub async fn tutors(&self) -> Result<Arc<Vec<RankedEntity>>, DirectoryError> {
        if let Some(tutors) = self.cache.get(TUTORS_KEY).await {
            tracing::trace!("Directory cache hit: {} tutors", tutors.len());
            return Ok(tutors);
        }

        let raw = match &self.source {
            DirectorySource::File(path) => {
                tracing::debug!("Loading tutors from {}", path.display());
                let contents = tokio::fs::read_to_string(path).await?;
                serde_json::from_str(&contents)?
            }
            DirectorySource::Remote { endpoint, api_key } => {
                self.fetch_remote(endpoint, api_key.as_deref()).await?
            }
        };

        let tutors = Arc::new(parse_entities(raw)?);
        tracing::info!("Loaded {} tutors into directory", tutors.len());

        self.cache.insert(TUTORS_KEY.to_string(), tutors.clone()).await;

        Ok(tutors)
    }

    /// Drop the cached list so the next call reloads the source
    pub async fn invalidate(&self) {
        self.cache.invalidate(TUTORS_KEY).await;
        tracing::debug!("Directory cache invalidated");
    }

    async fn fetch_remote(
        &self,
        endpoint: &str,
        api_key: Option<&str>,
    ) -> Result<Value, DirectoryError> {
        tracing::debug!("Fetching tutors from: {}", endpoint);

        let mut request = self.client.get(endpoint);
        if let Some(key) = api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(DirectoryError::Unauthorized),
            status => Err(DirectoryError::ApiError(format!(
                "Failed to fetch tutors: {}",
                status
            ))),
        }
    }
}

/// Turn a directory payload into validated entities
///
/// Accepts a bare array, or an object wrapping it under `documents`,
/// `tutors` or `data`. Each record may itself wrap its fields in `data`.
pub fn parse_entities(payload: Value) -> Result<Vec<RankedEntity>, DirectoryError> {
    let records = match payload {
        Value::Array(records) => records,
        Value::Object(mut map) => ["documents", "tutors", "data"]
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(records)) => Some(records),
                _ => None,
            })
            .ok_or_else(|| DirectoryError::InvalidResponse("Missing tutor array".into()))?,
        _ => {
            return Err(DirectoryError::InvalidResponse(
                "Expected a JSON array of tutors".into(),
            ))
        }
    };

    let total = records.len();
    let entities: Vec<RankedEntity> = records
        .into_iter()
        .filter_map(|record| {
            let data = match record {
                Value::Object(mut map) if map.contains_key("data") => {
                    map.remove("data").unwrap_or(Value::Null)
                }
                other => other,
            };

            let entity: RankedEntity = match serde_json::from_value(data) {
                Ok(entity) => entity,
                Err(e) => {
                    tracing::warn!("Skipping malformed tutor record: {}", e);
                    return None;
                }
            };

            if let Err(errors) = entity.validate() {
                tracing::warn!("Skipping invalid tutor {}: {}", entity.id, errors);
                return None;
            }

            Some(entity)
        })
        .collect();

    if entities.len() < total {
        tracing::warn!("Dropped {} of {} tutor records", total - entities.len(), total);
    }

    Ok(entities)
}
