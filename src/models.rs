//! Data models for the process dashboard.
//!
//! This module contains the typed process records produced by the loader
//! and the result rows consumed by the report generator.

use crate::analysis::Dashboard;
use crate::geo::MapPanel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The side a party takes in a legal process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Polo ativo: the party initiating the process.
    Claimant,
    /// Polo passivo: the party the process is brought against.
    Respondent,
    /// Any other `polo` value found in the export (e.g. "TERCEIRO").
    Other(String),
    /// The party had no `polo` at all.
    Unknown,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Claimant => write!(f, "Claimant"),
            Role::Respondent => write!(f, "Respondent"),
            Role::Other(s) => write!(f, "{}", s),
            Role::Unknown => write!(f, "Unknown"),
        }
    }
}

impl Role {
    /// Map a raw `polo` value onto a role. Matching ignores case and
    /// surrounding whitespace.
    pub fn from_polo(polo: Option<&str>) -> Self {
        match polo.map(str::trim) {
            None | Some("") => Role::Unknown,
            Some(p) => match p.to_uppercase().as_str() {
                "ATIVO" => Role::Claimant,
                "PASSIVO" => Role::Respondent,
                _ => Role::Other(p.to_string()),
            },
        }
    }

    /// Label used in report headings.
    pub fn polo_label(&self) -> &str {
        match self {
            Role::Claimant => "Polo Ativo",
            Role::Respondent => "Polo Passivo",
            Role::Other(s) => s,
            Role::Unknown => "Sem Polo",
        }
    }
}

/// An attorney representing a party.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lawyer {
    pub name: Option<String>,
}

/// One participant in a process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub role: Role,
    /// Digits-only tax id (CNPJ, or CPF when no CNPJ is present).
    pub tax_id: Option<String>,
    pub name: Option<String>,
    pub lawyers: Vec<Lawyer>,
}

/// A CNJ subject tag attached to a process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub title: Option<String>,
    pub is_principal: bool,
}

/// A judgment recorded in the process status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    pub judgment_type: Option<String>,
}

/// One legal process, with nested paths flattened into typed fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub id: Option<String>,
    pub cause_value: Option<f64>,
    pub execution_value: Option<f64>,
    pub jurisdiction_code: Option<String>,
    pub court: Option<String>,
    pub law_branch: Option<String>,
    pub process_status: Option<String>,
    pub process_class: Option<String>,
    pub parties: Vec<Party>,
    pub subjects: Vec<Subject>,
    pub judgments: Vec<Judgment>,
}

/// Monetary field selector for sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueField {
    Cause,
    Execution,
}

impl ProcessRecord {
    /// Value of a monetary field, null as zero.
    pub fn value(&self, field: ValueField) -> f64 {
        let value = match field {
            ValueField::Cause => self.cause_value,
            ValueField::Execution => self.execution_value,
        };
        value.unwrap_or(0.0)
    }
}

/// One row of a frequency distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub total: usize,
}

/// One row of a top-K ranking, 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub name: String,
    pub total: usize,
}

/// Per-jurisdiction statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoRow {
    pub uf: String,
    pub count: usize,
    pub total_cause_value: f64,
    pub percentage: f64,
}

impl GeoRow {
    /// Hover label shown on the map, e.g. `SP: 3 processos (42.86%)`.
    pub fn label(&self) -> String {
        format!(
            "{}: {} processos ({:.2}%)",
            self.uf, self.count, self.percentage
        )
    }

    /// Index into the four-step choropleth scale, scaled against the
    /// busiest jurisdiction.
    pub fn intensity_bucket(&self, max_count: usize) -> usize {
        if self.count == 0 || max_count == 0 {
            return 0;
        }
        let scaled = (self.count * 3).div_ceil(max_count);
        scaled.min(3)
    }
}

/// Choropleth colour scale, lightest first.
pub const COLOR_SCALE: [&str; 4] = ["rgba(69, 168, 116, 0.1)", "#45A874", "#2A4C3F", "#21332C"];

/// Metadata about a dashboard run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Path of the export that was analyzed.
    pub source_file: String,
    /// Top-level key the processes were read from.
    pub source_key: String,
    /// Normalized target tax id.
    pub target_tax_id: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Processes present in the export.
    pub records_available: usize,
    /// Processes analyzed after the capacity cap.
    pub records_analyzed: usize,
    /// Length of the party and lawyer rankings.
    pub top_k: usize,
    /// Wall-clock duration of the run in seconds.
    pub duration_seconds: f64,
}

/// The complete dashboard report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub dashboard: Dashboard,
    pub map: MapPanel,
}
