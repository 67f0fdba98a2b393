//! Counting, summing and ranking primitives.
//!
//! Every function here is a pure reducer over borrowed records or rows;
//! nulls are skipped rather than counted.

use super::explode::{LawyerRow, Row};
use super::roles::{records_with_role, TargetId};
use crate::models::{CategoryCount, Party, ProcessRecord, RankedEntry, Role, Subject, ValueField};
use std::collections::HashMap;

/// Number of processes where the target sits on `role`.
pub fn count_by_role(records: &[ProcessRecord], role: &Role, target: &TargetId) -> usize {
    records_with_role(records, role, target).count()
}

/// Sum a monetary field, null as zero.
pub fn sum_values<'a>(
    records: impl IntoIterator<Item = &'a ProcessRecord>,
    field: ValueField,
) -> f64 {
    records.into_iter().map(|r| r.value(field)).sum()
}

/// Sum a monetary field over the processes where the target sits on `role`.
pub fn sum_by_role(
    records: &[ProcessRecord],
    role: &Role,
    target: &TargetId,
    field: ValueField,
) -> f64 {
    sum_values(records_with_role(records, role, target), field)
}

/// Display ratio in `[0, 1]`. A zero or non-finite denominator yields 0,
/// as does a non-positive numerator.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() || !numerator.is_finite() {
        return 0.0;
    }
    let value = numerator / denominator;
    if value.is_finite() && value > 0.0 {
        value.min(1.0)
    } else {
        0.0
    }
}

/// Distinct non-null values with their counts, most frequent first.
/// Ties keep the order in which values were first seen.
pub fn frequency_table<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Vec<CategoryCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut table: Vec<CategoryCount> = Vec::new();

    for value in values.into_iter().flatten() {
        match index.get(value) {
            Some(&i) => table[i].total += 1,
            None => {
                index.insert(value, table.len());
                table.push(CategoryCount {
                    category: value.to_string(),
                    total: 1,
                });
            }
        }
    }

    // sort_by_key is stable, so ties stay in first-seen order
    table.sort_by_key(|row| std::cmp::Reverse(row.total));
    table
}

/// The `k` most frequent non-null values, ranked from 1.
pub fn top_k<'a>(values: impl IntoIterator<Item = Option<&'a str>>, k: usize) -> Vec<RankedEntry> {
    frequency_table(values)
        .into_iter()
        .take(k)
        .enumerate()
        .map(|(i, row)| RankedEntry {
            rank: i + 1,
            name: row.category,
            total: row.total,
        })
        .collect()
}

/// Frequency table over a per-process category field.
pub fn distribution<'a>(
    records: &'a [ProcessRecord],
    field: impl Fn(&'a ProcessRecord) -> Option<&'a str>,
) -> Vec<CategoryCount> {
    frequency_table(records.iter().map(field))
}

/// Most frequent party names on `role`.
pub fn top_parties(rows: &[Row<'_, Party>], role: &Role, k: usize) -> Vec<RankedEntry> {
    top_k(
        rows.iter()
            .filter(|row| &row.item.role == role)
            .map(|row| row.item.name.as_deref()),
        k,
    )
}

/// Most frequent lawyer names among parties on `role`.
pub fn top_lawyers(rows: &[LawyerRow<'_>], role: &Role, k: usize) -> Vec<RankedEntry> {
    top_k(
        rows.iter()
            .filter(|row| row.role == role)
            .map(|row| row.lawyer.name.as_deref()),
        k,
    )
}

/// Full distribution of subjects flagged as principal.
pub fn principal_subjects(rows: &[Row<'_, Subject>]) -> Vec<CategoryCount> {
    frequency_table(
        rows.iter()
            .filter(|row| row.item.is_principal)
            .map(|row| row.item.title.as_deref()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::explode;
    use crate::models::Lawyer;

    fn target() -> TargetId {
        TargetId::new("90400888000142").unwrap()
    }

    fn party(role: Role, tax_id: Option<&str>, name: Option<&str>, lawyers: &[&str]) -> Party {
        Party {
            role,
            tax_id: tax_id.map(String::from),
            name: name.map(String::from),
            lawyers: lawyers
                .iter()
                .map(|n| Lawyer {
                    name: Some(n.to_string()),
                })
                .collect(),
        }
    }

    #[test]
    fn test_worked_example() {
        let records = vec![
            ProcessRecord {
                cause_value: Some(100.0),
                parties: vec![party(Role::Claimant, Some("90400888000142"), None, &[])],
                ..Default::default()
            },
            ProcessRecord::default(),
        ];
        let t = target();

        assert_eq!(records.len(), 2);
        assert_eq!(sum_values(&records, ValueField::Cause), 100.0);
        assert_eq!(count_by_role(&records, &Role::Claimant, &t), 1);
        assert_eq!(
            sum_by_role(&records, &Role::Claimant, &t, ValueField::Cause),
            100.0
        );
        assert_eq!(count_by_role(&records, &Role::Respondent, &t), 0);
        assert_eq!(
            sum_by_role(&records, &Role::Respondent, &t, ValueField::Cause),
            0.0
        );
    }

    #[test]
    fn test_ratio_guards() {
        assert_eq!(ratio(1.0, 0.0), 0.0);
        assert_eq!(ratio(0.0, 0.0), 0.0);
        assert_eq!(ratio(-5.0, 10.0), 0.0);
        assert_eq!(ratio(5.0, f64::INFINITY), 0.0);
        assert_eq!(ratio(f64::NAN, 1.0), 0.0);
        assert_eq!(ratio(15.0, 10.0), 1.0);
        assert!((ratio(1.0, 4.0) - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_frequency_table_orders_by_count_then_first_seen() {
        let values = ["b", "a", "c", "a", "c", "d"];
        let table = frequency_table(values.iter().map(|v| Some(*v)));

        let got: Vec<_> = table.iter().map(|r| (r.category.as_str(), r.total)).collect();
        assert_eq!(got, vec![("a", 2), ("c", 2), ("b", 1), ("d", 1)]);
    }

    #[test]
    fn test_frequency_table_skips_nulls() {
        let values = [Some("x"), None, Some("x"), None];
        let table = frequency_table(values);
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].total, 2);

        let non_null = values.iter().filter(|v| v.is_some()).count();
        assert_eq!(table.iter().map(|r| r.total).sum::<usize>(), non_null);
    }

    #[test]
    fn test_top_k_caps_and_ranks() {
        let values = ["a", "b", "b", "c", "d", "e", "f", "f", "f"];
        let top = top_k(values.iter().map(|v| Some(*v)), 5);

        assert_eq!(top.len(), 5);
        assert_eq!(top[0].name, "f");
        assert_eq!(top[0].rank, 1);
        assert_eq!(top[1].name, "b");
        assert_eq!(top[4].rank, 5);
        assert!(top.windows(2).all(|w| w[0].total >= w[1].total));
    }

    #[test]
    fn test_top_parties_and_lawyers_by_role() {
        let records = vec![
            ProcessRecord {
                parties: vec![
                    party(Role::Claimant, None, Some("ACME"), &["ANA"]),
                    party(Role::Respondent, None, Some("BETA"), &["CARLA", "ANA"]),
                ],
                ..Default::default()
            },
            ProcessRecord {
                parties: vec![
                    party(Role::Claimant, None, Some("ACME"), &["BRUNO"]),
                    party(Role::Claimant, None, None, &["ANA"]),
                ],
                ..Default::default()
            },
        ];
        let parties = explode::parties(&records);
        let lawyers = explode::lawyers(&records);

        let claimants = top_parties(&parties, &Role::Claimant, 5);
        assert_eq!(claimants.len(), 1);
        assert_eq!(claimants[0].name, "ACME");
        assert_eq!(claimants[0].total, 2);

        let claimant_lawyers = top_lawyers(&lawyers, &Role::Claimant, 5);
        assert_eq!(claimant_lawyers[0].name, "ANA");
        assert_eq!(claimant_lawyers[0].total, 2);
        assert_eq!(claimant_lawyers[1].name, "BRUNO");

        let respondent_lawyers = top_lawyers(&lawyers, &Role::Respondent, 5);
        let names: Vec<_> = respondent_lawyers.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["CARLA", "ANA"]);
    }

    #[test]
    fn test_principal_subjects() {
        let records = vec![ProcessRecord {
            subjects: vec![
                Subject {
                    title: Some("Contrato".into()),
                    is_principal: true,
                },
                Subject {
                    title: Some("Dano Moral".into()),
                    is_principal: false,
                },
            ],
            ..Default::default()
        }];

        let table = principal_subjects(&explode::subjects(&records));
        assert_eq!(
            table,
            vec![CategoryCount {
                category: "Contrato".into(),
                total: 1
            }]
        );
    }

    #[test]
    fn test_distribution_over_field() {
        let records = vec![
            ProcessRecord {
                court: Some("TJSP".into()),
                ..Default::default()
            },
            ProcessRecord::default(),
            ProcessRecord {
                court: Some("TJSP".into()),
                ..Default::default()
            },
        ];
        let table = distribution(&records, |r| r.court.as_deref());
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].total, 2);
    }
}
