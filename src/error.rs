//! Error types for loading, configuration and the boundary fetch.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn an export document into process records. Always fatal.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed input: {0}")]
    MalformedInput(String),
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::MalformedInput(format!("invalid JSON: {}", e))
    }
}

/// Invalid or missing settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no target tax id given (use --target, LEGALSTATS_TARGET or aggregation.target_tax_id)")]
    MissingTarget,

    #[error("target tax id {0:?} contains no digits")]
    InvalidTarget(String),

    #[error("invalid setting {key}: {reason}")]
    InvalidSetting { key: &'static str, reason: String },
}

/// Failure while fetching geographic boundaries. Only the map panel is lost.
#[derive(Debug, Error)]
pub enum GeoFetchError {
    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("boundary JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected boundary document: {0}")]
    Shape(String),
}
