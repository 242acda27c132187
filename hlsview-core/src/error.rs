use std::path::PathBuf;

use thiserror::Error;

/// Failure to fetch or decode a configuration document.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("invalid configuration location '{location}'")]
    InvalidLocation {
        location: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported configuration scheme '{0}'")]
    UnsupportedScheme(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("failed to read configuration file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("configuration is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration document must be a JSON array, found {found}")]
    NotAnArray { found: &'static str },
    #[error("configuration document is an empty array")]
    Empty,
}

/// Errors surfaced by the player state broker.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("failed to load player configuration from {location}")]
    ConfigurationLoad {
        location: String,
        #[source]
        source: ConfigLoadError,
    },
    /// A state mutation arrived before any configuration was loaded.
    #[error("player configuration has not been loaded")]
    ConfigurationNotLoaded,
    #[error("invalid player size {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("invalid playback time {0}")]
    InvalidTime(f64),
}

pub type Result<T> = std::result::Result<T, PlayerError>;
