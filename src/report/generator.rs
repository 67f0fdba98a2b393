//! Markdown and JSON dashboard generation.
//!
//! Renders the indicator cards, bar-chart distributions, the UF map table
//! and the ranking tables of a [`Report`].

use super::format::{format_brl, format_count, progress_bar};
use crate::analysis::geo::max_count;
use crate::analysis::Dashboard;
use crate::geo::MapPanel;
use crate::models::{
    CategoryCount, GeoRow, RankedEntry, Report, ReportMetadata, Role, ValueField, COLOR_SCALE,
};
use anyhow::Result;

const BAR_WIDTH: usize = 20;

/// Generate a complete Markdown dashboard.
pub fn generate_markdown_report(report: &Report) -> String {
    let d = &report.dashboard;
    let mut output = String::new();

    output.push_str("# Process Overview - Company Dashboard\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_cards_section(d));

    output.push_str(&generate_distribution_section(
        "Distribution by Process Status",
        "Status",
        &d.process_statuses,
    ));
    output.push_str(&generate_distribution_section(
        "Distribution by Law Branch",
        "Branch",
        &d.law_branches,
    ));
    output.push_str(&generate_distribution_section(
        "Distribution by Court",
        "Court",
        &d.courts,
    ));

    output.push_str(&generate_map_section(&d.jurisdictions, &report.map));

    output.push_str(&generate_distribution_section(
        "Distribution by Judgment Type",
        "Judgment",
        &d.judgment_types,
    ));
    output.push_str(&generate_distribution_section(
        "Principal Subjects",
        "Subject",
        &d.principal_subjects,
    ));
    output.push_str(&generate_distribution_section(
        "Process Classes",
        "Class",
        &d.process_classes,
    ));

    let k = report.metadata.top_k;
    for role in [Role::Claimant, Role::Respondent] {
        let parties = match role {
            Role::Claimant => &d.top_parties_claimant,
            _ => &d.top_parties_respondent,
        };
        output.push_str(&generate_ranking_section(
            &format!("Top {} Parties - {}", k, role.polo_label()),
            "Party",
            parties,
        ));
    }
    for role in [Role::Claimant, Role::Respondent] {
        let lawyers = match role {
            Role::Claimant => &d.top_lawyers_claimant,
            _ => &d.top_lawyers_respondent,
        };
        output.push_str(&generate_ranking_section(
            &format!("Top {} Lawyers - {}", k, role.polo_label()),
            "Lawyer",
            lawyers,
        ));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", metadata.source_file));
    section.push_str(&format!("- **Target Tax ID:** {}\n", metadata.target_tax_id));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Processes Analyzed:** {}\n",
        format_count(metadata.records_analyzed)
    ));
    if metadata.records_available > metadata.records_analyzed {
        section.push_str(&format!(
            "- **Processes in Export:** {} (capped)\n",
            format_count(metadata.records_available)
        ));
    }
    section.push_str(&format!(
        "- **Duration:** {:.2}s\n\n",
        metadata.duration_seconds
    ));

    section
}

/// Generate the three headline cards.
fn generate_cards_section(d: &Dashboard) -> String {
    let mut section = String::new();

    section.push_str("## Indicators\n\n");

    section.push_str(&format!(
        "### {} processes found\n\n",
        format_count(d.total_processes)
    ));
    section.push_str(&format!(
        "- {} as claimant {}\n",
        format_count(d.count_claimant),
        progress_bar(d.count_share(&Role::Claimant), BAR_WIDTH)
    ));
    section.push_str(&format!(
        "- {} as respondent {}\n\n",
        format_count(d.count_respondent),
        progress_bar(d.count_share(&Role::Respondent), BAR_WIDTH)
    ));

    section.push_str(&generate_value_card(
        "Cause value",
        ValueField::Cause,
        d.sum_cause,
        d.sum_cause_claimant,
        d.sum_cause_respondent,
        d,
    ));
    section.push_str(&generate_value_card(
        "Execution value",
        ValueField::Execution,
        d.sum_execution,
        d.sum_execution_claimant,
        d.sum_execution_respondent,
        d,
    ));

    section
}

fn generate_value_card(
    title: &str,
    field: ValueField,
    total: f64,
    claimant: f64,
    respondent: f64,
    d: &Dashboard,
) -> String {
    let mut card = String::new();

    card.push_str(&format!("### {}: {}\n\n", title, format_brl(total)));
    card.push_str(&format!(
        "- {} as claimant {}\n",
        format_brl(claimant),
        progress_bar(d.value_share(&Role::Claimant, field), BAR_WIDTH)
    ));
    card.push_str(&format!(
        "- {} as respondent {}\n\n",
        format_brl(respondent),
        progress_bar(d.value_share(&Role::Respondent, field), BAR_WIDTH)
    ));

    card
}

/// Generate a distribution table with a horizontal text bar per row.
fn generate_distribution_section(title: &str, column: &str, rows: &[CategoryCount]) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", title));

    if rows.is_empty() {
        section.push_str("*No data.*\n\n");
        return section;
    }

    let max = rows.iter().map(|r| r.total).max().unwrap_or(0);

    section.push_str(&format!("| {} | Total | |\n", column));
    section.push_str("|:---|---:|:---|\n");
    for row in rows {
        let width = if max == 0 {
            0
        } else {
            (row.total * BAR_WIDTH).div_ceil(max)
        };
        section.push_str(&format!(
            "| {} | {} | `{}` |\n",
            escape_cell(&row.category),
            format_count(row.total),
            "█".repeat(width)
        ));
    }
    section.push('\n');

    section
}

/// Generate the map panel: boundary status plus the 27-row UF table.
fn generate_map_section(rows: &[GeoRow], map: &MapPanel) -> String {
    let mut section = String::new();

    section.push_str("## Distribution by UF\n\n");

    match map {
        MapPanel::Rendered {
            matched_features,
            unmatched_codes,
        } => {
            section.push_str(&format!(
                "*Map boundaries matched for {} of {} UFs.*",
                matched_features,
                rows.len()
            ));
            if !unmatched_codes.is_empty() {
                section.push_str(&format!(" *Missing: {}.*", unmatched_codes.join(", ")));
            }
            section.push_str("\n\n");
        }
        MapPanel::Unavailable { reason } => {
            section.push_str(&format!("> ⚠️ Map unavailable: {}\n\n", reason));
        }
        MapPanel::Disabled => {}
    }

    let max = max_count(rows);

    section.push_str("| UF | Processes | Share | Cause Value | Shade |\n");
    section.push_str("|:---:|---:|---:|---:|:---|\n");
    for row in rows {
        section.push_str(&format!(
            "| {} | {} | {:.2}% | {} | {} |\n",
            row.uf,
            format_count(row.count),
            row.percentage,
            format_brl(row.total_cause_value),
            COLOR_SCALE[row.intensity_bucket(max)]
        ));
    }
    section.push('\n');

    section
}

/// Generate a ranked table (1-based).
fn generate_ranking_section(title: &str, column: &str, rows: &[RankedEntry]) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", title));

    if rows.is_empty() {
        section.push_str("*No data.*\n\n");
        return section;
    }

    section.push_str(&format!("| # | {} | Total |\n", column));
    section.push_str("|---:|:---|---:|\n");
    for row in rows {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            row.rank,
            escape_cell(&row.name),
            format_count(row.total)
        ));
    }
    section.push('\n');

    section
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by legalstats v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
