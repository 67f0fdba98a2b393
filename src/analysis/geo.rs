//! Per-jurisdiction aggregation over the fixed set of Brazilian UFs.

use super::aggregator::ratio;
use crate::models::{GeoRow, ProcessRecord, ValueField};
use std::collections::HashMap;

/// The 27 federative units, in map order.
pub const UF_CODES: [&str; 27] = [
    "AC", "AL", "AM", "AP", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB", "PR",
    "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

#[derive(Debug, Default, Clone, Copy)]
struct Group {
    count: usize,
    total_cause_value: f64,
}

/// Count, cause-value sum and share for every UF, zero-filled.
///
/// Processes without a jurisdiction are left out. Codes outside
/// [`UF_CODES`] still count toward the percentage denominator but get no
/// row of their own, so the rows sum to 100% only when every code is in
/// [`UF_CODES`].
pub fn aggregate_by_jurisdiction(records: &[ProcessRecord]) -> Vec<GeoRow> {
    let mut groups: HashMap<&str, Group> = HashMap::new();

    for record in records {
        if let Some(code) = record.jurisdiction_code.as_deref() {
            let group = groups.entry(code).or_default();
            group.count += 1;
            group.total_cause_value += record.value(ValueField::Cause);
        }
    }

    let grand_total: usize = groups.values().map(|g| g.count).sum();

    UF_CODES
        .iter()
        .map(|&uf| {
            let group = groups.get(uf).copied().unwrap_or_default();
            GeoRow {
                uf: uf.to_string(),
                count: group.count,
                total_cause_value: group.total_cause_value,
                percentage: 100.0 * ratio(group.count as f64, grand_total as f64),
            }
        })
        .collect()
}

/// Highest per-UF count, used to scale the colour buckets.
pub fn max_count(rows: &[GeoRow]) -> usize {
    rows.iter().map(|r| r.count).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(uf: Option<&str>, cause: Option<f64>) -> ProcessRecord {
        ProcessRecord {
            jurisdiction_code: uf.map(String::from),
            cause_value: cause,
            ..Default::default()
        }
    }

    #[test]
    fn test_always_27_rows_in_enumeration_order() {
        let rows = aggregate_by_jurisdiction(&[]);
        assert_eq!(rows.len(), 27);
        assert_eq!(rows[0].uf, "AC");
        assert_eq!(rows[12].uf, "MG");
        assert_eq!(rows[26].uf, "TO");
        assert!(rows.iter().all(|r| r.count == 0 && r.percentage == 0.0));
    }

    #[test]
    fn test_counts_sums_and_percentages() {
        let records = vec![
            record(Some("SP"), Some(100.0)),
            record(Some("SP"), None),
            record(Some("RJ"), Some(50.0)),
            record(None, Some(999.0)),
        ];
        let rows = aggregate_by_jurisdiction(&records);

        let sp = rows.iter().find(|r| r.uf == "SP").unwrap();
        assert_eq!(sp.count, 2);
        assert_eq!(sp.total_cause_value, 100.0);
        assert!((sp.percentage - 200.0 / 3.0).abs() < 1e-9);

        let rj = rows.iter().find(|r| r.uf == "RJ").unwrap();
        assert_eq!(rj.count, 1);
        assert_eq!(rj.total_cause_value, 50.0);

        let total: f64 = rows.iter().map(|r| r.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_codes_stay_in_denominator() {
        let records = vec![record(Some("SP"), None), record(Some("XX"), None)];
        let rows = aggregate_by_jurisdiction(&records);

        assert_eq!(rows.len(), 27);
        let sp = rows.iter().find(|r| r.uf == "SP").unwrap();
        assert!((sp.percentage - 50.0).abs() < 1e-9);

        let total: f64 = rows.iter().map(|r| r.percentage).sum();
        assert!((total - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_count() {
        let records = vec![
            record(Some("BA"), None),
            record(Some("BA"), None),
            record(Some("CE"), None),
        ];
        assert_eq!(max_count(&aggregate_by_jurisdiction(&records)), 2);
        assert_eq!(max_count(&[]), 0);
    }
}
