//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation.

use clap::Parser;
use std::path::PathBuf;

/// legalstats - dashboards for company legal-process exports
///
/// Loads a JSON export of legal processes, computes counts, monetary
/// totals, distributions, rankings and the per-UF map table for one
/// company, and writes a Markdown or JSON dashboard.
///
/// Examples:
///   legalstats --input export.json --target 90.400.888/0001-42
///   legalstats -i export.json -t 90400888000142 --format json -o dash.json
///   legalstats -i export.json -t 90400888000142 --geojson-out map.geojson
///   legalstats -i export.json -t 90400888000142 --no-map
///   legalstats --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// JSON export to analyze
    ///
    /// Must be an object whose first key holds the array of processes.
    #[arg(short, long, value_name = "FILE", required_unless_present = "init_config")]
    pub input: Option<PathBuf>,

    /// Tax id (CNPJ/CPF) of the company the dashboard is about
    ///
    /// Punctuation is ignored. Can also be set via LEGALSTATS_TARGET or
    /// aggregation.target_tax_id in .legalstats.toml.
    #[arg(short, long, value_name = "TAX_ID", env = "LEGALSTATS_TARGET")]
    pub target: Option<String>,

    /// Output file path for the report (default: dashboard.md)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .legalstats.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Number of processes analyzed from the start of the export (default: 1000)
    #[arg(long, value_name = "COUNT")]
    pub max_records: Option<usize>,

    /// Rows in each party/lawyer ranking (default: 5)
    #[arg(long, value_name = "COUNT")]
    pub top_k: Option<usize>,

    /// Skip the boundary download and the map panel
    #[arg(long)]
    pub no_map: bool,

    /// GeoJSON boundary collection URL
    #[arg(long, value_name = "URL")]
    pub geojson_url: Option<String>,

    /// Write the boundaries joined with the UF table as GeoJSON
    #[arg(long, value_name = "FILE", conflicts_with = "no_map")]
    pub geojson_out: Option<PathBuf>,

    /// Boundary request timeout in seconds (default: 30)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Generate a default .legalstats.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.max_records == Some(0) {
            return Err("Max records must be at least 1".to_string());
        }

        if self.top_k == Some(0) {
            return Err("Top-k must be at least 1".to_string());
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        if let Some(ref url) = self.geojson_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("GeoJSON URL must start with 'http://' or 'https://'".to_string());
            }
        }

        match self.input {
            Some(ref input) if !input.is_file() => {
                Err(format!("Input file does not exist: {}", input.display()))
            }
            Some(_) => Ok(()),
            None => Err("An --input file is required".to_string()),
        }
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
