//! Remote GeoJSON boundaries and the choropleth join.
//!
//! The boundary collection is fetched once per run and never cached.
//! A failed fetch only costs the map panel; see [`MapPanel`].

use crate::analysis::geo::max_count;
use crate::error::GeoFetchError;
use crate::models::{GeoRow, COLOR_SCALE};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Boundaries of the Brazilian states, keyed by `properties.sigla`.
pub const DEFAULT_BOUNDARY_URL: &str =
    "https://raw.githubusercontent.com/codeforamerica/click_that_hood/master/public/data/brazil-states.geojson";

/// Property holding the UF code on each feature.
pub const DEFAULT_FEATURE_KEY: &str = "sigla";

/// Settings for the boundary fetch.
#[derive(Debug, Clone)]
pub struct BoundaryConfig {
    pub url: String,
    pub feature_key: String,
    pub timeout_seconds: u64,
    pub show_progress: bool,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BOUNDARY_URL.to_string(),
            feature_key: DEFAULT_FEATURE_KEY.to_string(),
            timeout_seconds: 30,
            show_progress: true,
        }
    }
}

/// HTTP client for the boundary dataset.
pub struct BoundaryClient {
    config: BoundaryConfig,
    http_client: reqwest::Client,
}

impl BoundaryClient {
    pub fn new(config: BoundaryConfig) -> Result<Self, GeoFetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Fetch and validate the feature collection.
    pub async fn fetch(&self) -> Result<BoundarySet, GeoFetchError> {
        info!(url = %self.config.url, "Fetching geographic boundaries");

        let spinner = self.config.show_progress.then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg} [{elapsed_precise}]")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.set_message("Downloading state boundaries");
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });

        let result = self.download().await;

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        let body = result?;
        BoundarySet::from_value(body, &self.config.feature_key)
    }

    async fn download(&self) -> Result<Value, GeoFetchError> {
        let response = self
            .http_client
            .get(&self.config.url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeoFetchError::Timeout(self.config.timeout_seconds)
                } else {
                    GeoFetchError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeoFetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        debug!(bytes = bytes.len(), "Boundary download complete");
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// A validated GeoJSON feature collection.
#[derive(Debug, Clone)]
pub struct BoundarySet {
    collection: Value,
    feature_key: String,
}

impl BoundarySet {
    /// Accept a document with a `features` array.
    pub fn from_value(collection: Value, feature_key: &str) -> Result<Self, GeoFetchError> {
        match collection.get("features") {
            Some(Value::Array(_)) => Ok(Self {
                collection,
                feature_key: feature_key.to_string(),
            }),
            Some(_) => Err(GeoFetchError::Shape(
                "\"features\" is not an array".to_string(),
            )),
            None => Err(GeoFetchError::Shape(
                "document has no \"features\"".to_string(),
            )),
        }
    }

    fn features(&self) -> &[Value] {
        self.collection
            .get("features")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn feature_code(&self, feature: &Value) -> Option<String> {
        feature
            .get("properties")?
            .get(&self.feature_key)?
            .as_str()
            .map(|s| s.trim().to_uppercase())
    }

    /// UF codes present in the collection.
    pub fn codes(&self) -> HashSet<String> {
        self.features()
            .iter()
            .filter_map(|f| self.feature_code(f))
            .collect()
    }

    /// Copy the collection with jurisdiction statistics written into
    /// each matching feature's properties.
    pub fn join(&self, rows: &[GeoRow]) -> Value {
        let max = max_count(rows);
        let mut collection = self.collection.clone();

        if let Some(Value::Array(features)) = collection.get_mut("features") {
            for feature in features.iter_mut() {
                let Some(code) = self.feature_code(feature) else {
                    continue;
                };
                let Some(row) = rows.iter().find(|r| r.uf == code) else {
                    continue;
                };
                let bucket = row.intensity_bucket(max);
                if let Some(Value::Object(props)) = feature.get_mut("properties") {
                    props.insert("count".to_string(), json!(row.count));
                    props.insert("percentage".to_string(), json!(row.percentage));
                    props.insert(
                        "totalCauseValue".to_string(),
                        json!(row.total_cause_value),
                    );
                    props.insert("label".to_string(), json!(row.label()));
                    props.insert("bucket".to_string(), json!(bucket));
                    props.insert("fill".to_string(), json!(COLOR_SCALE[bucket]));
                }
            }
        }

        collection
    }
}

/// State of the map panel after the boundary step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MapPanel {
    /// Boundaries were joined with the UF table.
    Rendered {
        matched_features: usize,
        unmatched_codes: Vec<String>,
    },
    /// The fetch failed; every other panel is still valid.
    Unavailable { reason: String },
    /// The map was switched off.
    Disabled,
}

impl MapPanel {
    /// Summarize how well the boundaries cover the UF table.
    pub fn rendered(boundaries: &BoundarySet, rows: &[GeoRow]) -> Self {
        let codes = boundaries.codes();
        let unmatched_codes: Vec<String> = rows
            .iter()
            .filter(|r| !codes.contains(&r.uf))
            .map(|r| r.uf.clone())
            .collect();

        if !unmatched_codes.is_empty() {
            warn!(
                "Boundary dataset has no feature for: {}",
                unmatched_codes.join(", ")
            );
        }

        MapPanel::Rendered {
            matched_features: rows.len() - unmatched_codes.len(),
            unmatched_codes,
        }
    }

    pub fn unavailable(err: &GeoFetchError) -> Self {
        warn!("Map panel unavailable: {}", err);
        MapPanel::Unavailable {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::geo::aggregate_by_jurisdiction;
    use crate::models::ProcessRecord;

    fn collection(codes: &[&str]) -> Value {
        let features: Vec<Value> = codes
            .iter()
            .map(|c| json!({"type": "Feature", "properties": {"sigla": c, "name": c}, "geometry": null}))
            .collect();
        json!({"type": "FeatureCollection", "features": features})
    }

    fn rows() -> Vec<GeoRow> {
        let records = vec![
            ProcessRecord {
                jurisdiction_code: Some("SP".into()),
                cause_value: Some(10.0),
                ..Default::default()
            },
            ProcessRecord {
                jurisdiction_code: Some("SP".into()),
                ..Default::default()
            },
            ProcessRecord {
                jurisdiction_code: Some("AC".into()),
                ..Default::default()
            },
        ];
        aggregate_by_jurisdiction(&records)
    }

    #[test]
    fn test_from_value_requires_features() {
        assert!(BoundarySet::from_value(json!({"type": "FeatureCollection"}), "sigla").is_err());
        assert!(BoundarySet::from_value(json!({"features": {}}), "sigla").is_err());
        assert!(BoundarySet::from_value(collection(&["SP"]), "sigla").is_ok());
    }

    #[test]
    fn test_join_writes_properties() {
        let set = BoundarySet::from_value(collection(&["SP", "AC", "RJ"]), "sigla").unwrap();
        let joined = set.join(&rows());

        let sp = &joined["features"][0]["properties"];
        assert_eq!(sp["count"], 2);
        assert_eq!(sp["totalCauseValue"], 10.0);
        assert_eq!(sp["bucket"], 3);
        assert_eq!(sp["fill"], "#21332C");
        assert!(sp["label"].as_str().unwrap().starts_with("SP: 2 processos"));

        let rj = &joined["features"][2]["properties"];
        assert_eq!(rj["count"], 0);
        assert_eq!(rj["bucket"], 0);
    }

    #[test]
    fn test_rendered_panel_reports_missing_codes() {
        let set = BoundarySet::from_value(collection(&["SP", "AC"]), "sigla").unwrap();
        match MapPanel::rendered(&set, &rows()) {
            MapPanel::Rendered {
                matched_features,
                unmatched_codes,
            } => {
                assert_eq!(matched_features, 2);
                assert_eq!(unmatched_codes.len(), 25);
                assert!(unmatched_codes.contains(&"RJ".to_string()));
            }
            other => panic!("expected rendered panel, got {:?}", other),
        }
    }

    #[test]
    fn test_fetch_failure_is_reported_not_fatal() {
        let client = BoundaryClient::new(BoundaryConfig {
            url: "http://127.0.0.1:9/brazil-states.geojson".to_string(),
            timeout_seconds: 5,
            show_progress: false,
            ..Default::default()
        })
        .unwrap();

        let result = tokio_test::block_on(client.fetch());
        let err = result.expect_err("nothing listens on the discard port");
        assert!(matches!(
            MapPanel::unavailable(&err),
            MapPanel::Unavailable { .. }
        ));
    }

    #[test]
    fn test_panel_serializes_with_status_tag() {
        let json = serde_json::to_value(MapPanel::Disabled).unwrap();
        assert_eq!(json["status"], "disabled");
    }
}
