//! Configuration document retrieval and decoding.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use hlsview_model::PlayerModel;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::error::ConfigLoadError;

/// Request timeout applied when none is configured.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Retrieves raw configuration documents.
#[async_trait]
pub trait ConfigFetcher: Send + Sync + fmt::Debug {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, ConfigLoadError>;
}

/// Fetches `http`/`https` URLs with reqwest and `file://` URLs or plain
/// paths from the local filesystem.
#[derive(Debug, Clone)]
pub struct LocationFetcher {
    http_client: Client,
}

impl Default for LocationFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_FETCH_TIMEOUT)
    }
}

impl LocationFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    async fn fetch_http(&self, url: Url) -> Result<Vec<u8>, ConfigLoadError> {
        let response = self.http_client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ConfigLoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn fetch_file(&self, path: PathBuf) -> Result<Vec<u8>, ConfigLoadError> {
        tokio::fs::read(&path)
            .await
            .map_err(|source| ConfigLoadError::Io { path, source })
    }
}

#[async_trait]
impl ConfigFetcher for LocationFetcher {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, ConfigLoadError> {
        match Url::parse(location) {
            Ok(url) => match url.scheme() {
                "http" | "https" => {
                    debug!(%url, "fetching configuration over HTTP");
                    self.fetch_http(url).await
                }
                "file" => {
                    let path = url.to_file_path().map_err(|_| {
                        ConfigLoadError::UnsupportedScheme("file".into())
                    })?;
                    self.fetch_file(path).await
                }
                other => Err(ConfigLoadError::UnsupportedScheme(other.into())),
            },
            // Not a URL at all: treat it as a local path.
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                self.fetch_file(PathBuf::from(location)).await
            }
            Err(source) => Err(ConfigLoadError::InvalidLocation {
                location: location.to_owned(),
                source,
            }),
        }
    }
}

/// Decode a configuration document into a model.
///
/// The document must be a non-empty JSON array; its first element is the
/// effective configuration and later elements are ignored.
pub fn parse_document(bytes: &[u8]) -> Result<PlayerModel, ConfigLoadError> {
    let document: Value = serde_json::from_slice(bytes)?;
    let entries = match document {
        Value::Array(entries) => entries,
        other => {
            return Err(ConfigLoadError::NotAnArray {
                found: json_kind(&other),
            });
        }
    };

    let first = entries.first().ok_or(ConfigLoadError::Empty)?;
    if entries.len() > 1 {
        info!(
            ignored = entries.len() - 1,
            "configuration has several entries, using the first"
        );
    }
    Ok(PlayerModel::from_raw(Some(first)))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
