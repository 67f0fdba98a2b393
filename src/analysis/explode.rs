//! Flattening of nested per-process sequences into countable rows.
//!
//! Every row borrows its element and carries the index of the parent
//! process. Lawyer rows also carry the role of the party they represent.
//! A process with an empty sequence contributes no rows.

use crate::models::{Judgment, Lawyer, Party, ProcessRecord, Role, Subject};

/// A nested element paired with the index of its process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Row<'a, T> {
    pub record: usize,
    pub item: &'a T,
}

/// A lawyer paired with its process and the role of the represented party.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LawyerRow<'a> {
    pub record: usize,
    pub role: &'a Role,
    pub lawyer: &'a Lawyer,
}

fn explode<'a, T>(
    records: &'a [ProcessRecord],
    children: impl Fn(&'a ProcessRecord) -> &'a [T],
) -> Vec<Row<'a, T>> {
    records
        .iter()
        .enumerate()
        .flat_map(|(record, r)| children(r).iter().map(move |item| Row { record, item }))
        .collect()
}

pub fn parties(records: &[ProcessRecord]) -> Vec<Row<'_, Party>> {
    explode(records, |r| r.parties.as_slice())
}

pub fn subjects(records: &[ProcessRecord]) -> Vec<Row<'_, Subject>> {
    explode(records, |r| r.subjects.as_slice())
}

pub fn judgments(records: &[ProcessRecord]) -> Vec<Row<'_, Judgment>> {
    explode(records, |r| r.judgments.as_slice())
}

/// Lawyers, two levels down (process → party → lawyer).
pub fn lawyers(records: &[ProcessRecord]) -> Vec<LawyerRow<'_>> {
    parties(records)
        .into_iter()
        .flat_map(|Row { record, item }| {
            item.lawyers.iter().map(move |lawyer| LawyerRow {
                record,
                role: &item.role,
                lawyer,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lawyer(name: &str) -> Lawyer {
        Lawyer {
            name: Some(name.to_string()),
        }
    }

    fn party(role: Role, lawyers: Vec<Lawyer>) -> Party {
        Party {
            role,
            tax_id: None,
            name: None,
            lawyers,
        }
    }

    fn sample() -> Vec<ProcessRecord> {
        vec![
            ProcessRecord {
                parties: vec![
                    party(Role::Claimant, vec![lawyer("A"), lawyer("B")]),
                    party(Role::Respondent, vec![lawyer("C")]),
                ],
                subjects: vec![Subject {
                    title: Some("Contrato".into()),
                    is_principal: true,
                }],
                ..Default::default()
            },
            ProcessRecord::default(),
            ProcessRecord {
                parties: vec![party(Role::Respondent, vec![])],
                judgments: vec![Judgment::default(), Judgment::default()],
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_parties_carry_parent_index() {
        let records = sample();
        let rows = parties(&records);
        let parents: Vec<_> = rows.iter().map(|r| r.record).collect();
        assert_eq!(parents, vec![0, 0, 2]);
    }

    #[test]
    fn test_empty_sequences_yield_no_rows() {
        let records = sample();
        assert_eq!(subjects(&records).len(), 1);
        assert_eq!(judgments(&records).len(), 2);
        assert!(judgments(&records).iter().all(|r| r.record == 2));
    }

    #[test]
    fn test_lawyers_inherit_party_role() {
        let records = sample();
        let rows = lawyers(&records);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].role, &Role::Claimant);
        assert_eq!(rows[1].lawyer.name.as_deref(), Some("B"));
        assert_eq!(rows[2].role, &Role::Respondent);
        assert!(rows.iter().all(|r| r.record == 0));
    }
}
