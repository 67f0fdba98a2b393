//! Export loading and normalization.
//!
//! Reads a `{ <key>: [ <process>, ... ] }` document, keeps the first key in
//! document order, and maps at most `max_records` entries into typed
//! [`ProcessRecord`]s.

mod raw;

use crate::error::LoadError;
use crate::models::ProcessRecord;
use raw::RawProcess;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};

/// Capacity cap applied before any aggregation.
pub const DEFAULT_MAX_RECORDS: usize = 1000;

/// Result of loading an export.
#[derive(Debug, Clone)]
pub struct LoadedExport {
    /// Top-level key the records were read from.
    pub source_key: String,
    /// Number of entries in the document before the cap.
    pub total_available: usize,
    /// The first `max_records` entries, in original order.
    pub records: Vec<ProcessRecord>,
}

impl LoadedExport {
    /// Whether the cap dropped any entries.
    pub fn truncated(&self) -> bool {
        self.total_available > self.records.len()
    }
}

/// Load and normalize an export file.
pub fn load_file(path: &Path, max_records: usize) -> Result<LoadedExport, LoadError> {
    info!("Loading export: {}", path.display());

    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_document(&text, max_records)
}

/// Parse an export document held in memory.
pub fn parse_document(text: &str, max_records: usize) -> Result<LoadedExport, LoadError> {
    let root: Value = serde_json::from_str(text)?;

    let Value::Object(map) = root else {
        return Err(LoadError::MalformedInput(
            "root must be a JSON object".to_string(),
        ));
    };

    let Some((source_key, value)) = map.into_iter().next() else {
        return Err(LoadError::MalformedInput(
            "root object has no keys".to_string(),
        ));
    };

    let Value::Array(entries) = value else {
        return Err(LoadError::MalformedInput(format!(
            "value under {:?} is not an array",
            source_key
        )));
    };

    let total_available = entries.len();
    debug!(key = %source_key, total_available, "Found process array");

    let records = entries
        .into_iter()
        .take(max_records)
        .enumerate()
        .map(|(index, entry)| normalize_entry(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    let export = LoadedExport {
        source_key,
        total_available,
        records,
    };

    if export.truncated() {
        warn!(
            "Export holds {} processes, analyzing the first {}",
            export.total_available,
            export.records.len()
        );
    }

    info!(
        "Loaded {} processes from {:?}",
        export.records.len(),
        export.source_key
    );

    Ok(export)
}

fn normalize_entry(index: usize, entry: Value) -> Result<ProcessRecord, LoadError> {
    let raw: RawProcess = serde_json::from_value(entry)
        .map_err(|e| LoadError::MalformedInput(format!("process #{}: {}", index, e)))?;
    Ok(raw.into())
}
