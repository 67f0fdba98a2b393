//! legalstats - company dashboards from legal-process exports
//!
//! A CLI tool that loads a JSON export of legal processes, aggregates
//! indicators, distributions, rankings and per-UF statistics for one
//! target company, and writes a dashboard report.
//!
//! Exit codes:
//!   0 - Success (the map panel may still be unavailable)
//!   1 - Runtime error (malformed input, missing target, I/O failure, etc.)

mod analysis;
mod cli;
mod config;
mod error;
mod geo;
mod loader;
mod models;
mod report;

use analysis::{AggregationSettings, Dashboard, TargetId};
use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use error::ConfigError;
use geo::{BoundaryClient, BoundaryConfig, MapPanel};
use models::{GeoRow, Report, ReportMetadata};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("legalstats v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("Dashboard failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .legalstats.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE_NAME);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Set aggregation.target_tax_id to your company's CNPJ.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the pipeline: load, aggregate, fetch map boundaries, render.
async fn run(args: Args) -> Result<()> {
    let start_time = Instant::now();

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate()?;

    let raw_target = config
        .aggregation
        .target_tax_id
        .as_deref()
        .ok_or(ConfigError::MissingTarget)?;
    let target = TargetId::new(raw_target)?;

    // Step 1: Load and normalize
    let input = args
        .input
        .clone()
        .context("No input file given")?;
    let export = loader::load_file(&input, config.aggregation.max_records)?;

    // Step 2: Aggregate
    let settings = AggregationSettings {
        top_k: config.aggregation.top_k,
    };
    let dashboard = Dashboard::compute(&export.records, &target, &settings);
    info!(
        total = dashboard.total_processes,
        claimant = dashboard.count_claimant,
        respondent = dashboard.count_respondent,
        "Aggregation complete"
    );

    // Step 3: Map boundaries (failure only costs the map panel)
    let map = build_map_panel(&config, &args, &dashboard.jurisdictions).await?;

    // Step 4: Render
    let report = Report {
        metadata: ReportMetadata {
            source_file: input.display().to_string(),
            source_key: export.source_key.clone(),
            target_tax_id: target.to_string(),
            generated_at: Utc::now(),
            records_available: export.total_available,
            records_analyzed: export.records.len(),
            top_k: settings.top_k,
            duration_seconds: start_time.elapsed().as_secs_f64(),
        },
        dashboard,
        map,
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    let output_path = PathBuf::from(&config.general.output);
    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    if !args.quiet {
        print_summary(&report, &output_path);
    }

    Ok(())
}

/// Fetch boundaries and join them with the UF table.
///
/// Only writing `--geojson-out` can fail the run; a failed fetch yields
/// [`MapPanel::Unavailable`].
async fn build_map_panel(config: &Config, args: &Args, rows: &[GeoRow]) -> Result<MapPanel> {
    if !config.geo.enabled {
        info!("Map panel disabled");
        return Ok(MapPanel::Disabled);
    }

    let boundary_config = BoundaryConfig {
        url: config.geo.boundary_url.clone(),
        feature_key: config.geo.feature_key.clone(),
        timeout_seconds: config.geo.timeout_seconds,
        show_progress: !args.quiet,
    };

    let fetched = match BoundaryClient::new(boundary_config) {
        Ok(client) => client.fetch().await,
        Err(e) => Err(e),
    };

    let boundaries = match fetched {
        Ok(boundaries) => boundaries,
        Err(e) => return Ok(MapPanel::unavailable(&e)),
    };

    if let Some(ref path) = args.geojson_out {
        let joined = boundaries.join(rows);
        let content = serde_json::to_string(&joined)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write GeoJSON to {}", path.display()))?;
        info!("Choropleth GeoJSON written to {}", path.display());
    }

    Ok(MapPanel::rendered(&boundaries, rows))
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

fn print_summary(report: &Report, output_path: &Path) {
    let d = &report.dashboard;

    println!("\n📊 Dashboard Summary:");
    println!(
        "   Processes: {} ({} as claimant, {} as respondent)",
        d.total_processes, d.count_claimant, d.count_respondent
    );
    if report.metadata.records_available > report.metadata.records_analyzed {
        println!(
            "   ⚠️  Export holds {} processes; analyzed the first {}",
            report.metadata.records_available, report.metadata.records_analyzed
        );
    }
    println!(
        "   Cause value: {}",
        report::format::format_brl(d.sum_cause)
    );
    println!(
        "   Execution value: {}",
        report::format::format_brl(d.sum_execution)
    );
    if let MapPanel::Unavailable { ref reason } = report.map {
        println!("   🗺️  Map unavailable: {}", reason);
    }
    println!(
        "\n✅ Dashboard complete! Report saved to: {}",
        output_path.display()
    );
}
