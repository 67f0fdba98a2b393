//! The full set of dashboard indicators, computed in one pass.

use super::aggregator::{
    count_by_role, distribution, frequency_table, principal_subjects, ratio, sum_by_role,
    sum_values, top_lawyers, top_parties,
};
use super::explode;
use super::geo::aggregate_by_jurisdiction;
use super::roles::TargetId;
use crate::models::{CategoryCount, GeoRow, ProcessRecord, RankedEntry, Role, ValueField};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default length of the party and lawyer rankings.
pub const DEFAULT_TOP_K: usize = 5;

/// Tunables for [`Dashboard::compute`].
#[derive(Debug, Clone, Copy)]
pub struct AggregationSettings {
    pub top_k: usize,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Every indicator the report renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total_processes: usize,
    pub count_claimant: usize,
    pub count_respondent: usize,

    pub sum_cause: f64,
    pub sum_cause_claimant: f64,
    pub sum_cause_respondent: f64,

    pub sum_execution: f64,
    pub sum_execution_claimant: f64,
    pub sum_execution_respondent: f64,

    pub judgment_types: Vec<CategoryCount>,
    pub law_branches: Vec<CategoryCount>,
    pub process_statuses: Vec<CategoryCount>,
    pub courts: Vec<CategoryCount>,

    pub top_parties_claimant: Vec<RankedEntry>,
    pub top_parties_respondent: Vec<RankedEntry>,
    pub top_lawyers_claimant: Vec<RankedEntry>,
    pub top_lawyers_respondent: Vec<RankedEntry>,

    pub principal_subjects: Vec<CategoryCount>,
    pub process_classes: Vec<CategoryCount>,

    pub jurisdictions: Vec<GeoRow>,
}

impl Dashboard {
    /// Run every aggregator over the (already capped) records.
    pub fn compute(
        records: &[ProcessRecord],
        target: &TargetId,
        settings: &AggregationSettings,
    ) -> Self {
        let claimant = Role::Claimant;
        let respondent = Role::Respondent;

        let parties = explode::parties(records);
        let lawyers = explode::lawyers(records);
        let subjects = explode::subjects(records);
        let judgments = explode::judgments(records);
        debug!(
            parties = parties.len(),
            lawyers = lawyers.len(),
            subjects = subjects.len(),
            judgments = judgments.len(),
            "Exploded nested rows"
        );

        Self {
            total_processes: records.len(),
            count_claimant: count_by_role(records, &claimant, target),
            count_respondent: count_by_role(records, &respondent, target),

            sum_cause: sum_values(records, ValueField::Cause),
            sum_cause_claimant: sum_by_role(records, &claimant, target, ValueField::Cause),
            sum_cause_respondent: sum_by_role(records, &respondent, target, ValueField::Cause),

            sum_execution: sum_values(records, ValueField::Execution),
            sum_execution_claimant: sum_by_role(records, &claimant, target, ValueField::Execution),
            sum_execution_respondent: sum_by_role(
                records,
                &respondent,
                target,
                ValueField::Execution,
            ),

            judgment_types: frequency_table(
                judgments.iter().map(|row| row.item.judgment_type.as_deref()),
            ),
            law_branches: distribution(records, |r| r.law_branch.as_deref()),
            process_statuses: distribution(records, |r| r.process_status.as_deref()),
            courts: distribution(records, |r| r.court.as_deref()),

            top_parties_claimant: top_parties(&parties, &claimant, settings.top_k),
            top_parties_respondent: top_parties(&parties, &respondent, settings.top_k),
            top_lawyers_claimant: top_lawyers(&lawyers, &claimant, settings.top_k),
            top_lawyers_respondent: top_lawyers(&lawyers, &respondent, settings.top_k),

            principal_subjects: principal_subjects(&subjects),
            process_classes: distribution(records, |r| r.process_class.as_deref()),

            jurisdictions: aggregate_by_jurisdiction(records),
        }
    }

    /// Share of processes where the target is on `role`.
    pub fn count_share(&self, role: &Role) -> f64 {
        let count = match role {
            Role::Claimant => self.count_claimant,
            Role::Respondent => self.count_respondent,
            _ => 0,
        };
        ratio(count as f64, self.total_processes as f64)
    }

    /// Share of the summed monetary field attributable to `role`.
    pub fn value_share(&self, role: &Role, field: ValueField) -> f64 {
        let (part, total) = match (role, field) {
            (Role::Claimant, ValueField::Cause) => (self.sum_cause_claimant, self.sum_cause),
            (Role::Respondent, ValueField::Cause) => (self.sum_cause_respondent, self.sum_cause),
            (Role::Claimant, ValueField::Execution) => {
                (self.sum_execution_claimant, self.sum_execution)
            }
            (Role::Respondent, ValueField::Execution) => {
                (self.sum_execution_respondent, self.sum_execution)
            }
            _ => (0.0, 0.0),
        };
        ratio(part, total)
    }
}
