//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.legalstats.toml` files.

use crate::analysis::dashboard::DEFAULT_TOP_K;
use crate::geo::boundary::{DEFAULT_BOUNDARY_URL, DEFAULT_FEATURE_KEY};
use crate::loader::DEFAULT_MAX_RECORDS;
use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".legalstats.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Aggregation settings.
    #[serde(default)]
    pub aggregation: AggregationConfig,

    /// Map boundary settings.
    #[serde(default)]
    pub geo: GeoConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
        }
    }
}

fn default_output() -> String {
    "dashboard.md".to_string()
}

/// Aggregation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Tax id of the company the dashboard is about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_tax_id: Option<String>,

    /// Processes analyzed from the start of the export.
    #[serde(default = "default_max_records")]
    pub max_records: usize,

    /// Rows in each party/lawyer ranking.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            target_tax_id: None,
            max_records: default_max_records(),
            top_k: default_top_k(),
        }
    }
}

fn default_max_records() -> usize {
    DEFAULT_MAX_RECORDS
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

/// Boundary fetch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoConfig {
    /// Fetch boundaries and build the map panel.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// GeoJSON feature collection URL.
    #[serde(default = "default_boundary_url")]
    pub boundary_url: String,

    /// Feature property holding the UF code.
    #[serde(default = "default_feature_key")]
    pub feature_key: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            boundary_url: default_boundary_url(),
            feature_key: default_feature_key(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_boundary_url() -> String {
    DEFAULT_BOUNDARY_URL.to_string()
}

fn default_feature_key() -> String {
    DEFAULT_FEATURE_KEY.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when the CLI actually provides a value.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if let Some(ref target) = args.target {
            self.aggregation.target_tax_id = Some(target.clone());
        }
        if let Some(max_records) = args.max_records {
            self.aggregation.max_records = max_records;
        }
        if let Some(top_k) = args.top_k {
            self.aggregation.top_k = top_k;
        }

        if args.no_map {
            self.geo.enabled = false;
        }
        if let Some(ref url) = args.geojson_url {
            self.geo.boundary_url = url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.geo.timeout_seconds = timeout;
        }
    }

    /// Check merged settings before the pipeline runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.aggregation.max_records == 0 {
            return Err(invalid("aggregation.max_records", "must be at least 1"));
        }
        if self.aggregation.top_k == 0 {
            return Err(invalid("aggregation.top_k", "must be at least 1"));
        }
        if self.general.output.trim().is_empty() {
            return Err(invalid("general.output", "must not be empty"));
        }

        // Boundary settings only matter when the map is built.
        if !self.geo.enabled {
            return Ok(());
        }
        if self.geo.timeout_seconds == 0 {
            return Err(invalid("geo.timeout_seconds", "must be at least 1"));
        }
        let url = &self.geo.boundary_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(invalid(
                "geo.boundary_url",
                &format!("{:?} must start with 'http://' or 'https://'", url),
            ));
        }
        if self.geo.feature_key.trim().is_empty() {
            return Err(invalid("geo.feature_key", "must not be empty"));
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

fn invalid(key: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidSetting {
        key,
        reason: reason.to_string(),
    }
}
