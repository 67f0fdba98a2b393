//! Role filtering against the target tax id.

use crate::error::ConfigError;
use crate::models::{ProcessRecord, Role};
use std::fmt;

/// Keep only ASCII digits, so `90.400.888/0001-42` becomes `90400888000142`.
pub fn normalize_tax_id(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// A normalized, non-empty target tax id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetId(String);

impl TargetId {
    pub fn new(raw: &str) -> Result<Self, ConfigError> {
        let digits = normalize_tax_id(raw);
        if digits.is_empty() {
            return Err(ConfigError::InvalidTarget(raw.to_string()));
        }
        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// True iff at least one party has `role` and the given tax id.
pub fn has_party_with_role(record: &ProcessRecord, role: &Role, tax_id: &str) -> bool {
    let wanted = normalize_tax_id(tax_id);
    record
        .parties
        .iter()
        .any(|p| &p.role == role && p.tax_id.as_deref() == Some(wanted.as_str()))
}

/// The records where the target sits on `role`, in original order.
pub fn records_with_role<'a>(
    records: &'a [ProcessRecord],
    role: &'a Role,
    target: &'a TargetId,
) -> impl Iterator<Item = &'a ProcessRecord> + 'a {
    records
        .iter()
        .filter(move |r| has_party_with_role(r, role, target.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Party;

    fn party(role: Role, tax_id: Option<&str>) -> Party {
        Party {
            role,
            tax_id: tax_id.map(String::from),
            name: None,
            lawyers: Vec::new(),
        }
    }

    fn record(parties: Vec<Party>) -> ProcessRecord {
        ProcessRecord {
            parties,
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_tax_id() {
        assert_eq!(normalize_tax_id("90.400.888/0001-42"), "90400888000142");
        assert_eq!(normalize_tax_id("abc"), "");
    }

    #[test]
    fn test_target_id_rejects_empty() {
        assert!(TargetId::new("--/.").is_err());
        assert_eq!(
            TargetId::new("90.400.888/0001-42").unwrap().as_str(),
            "90400888000142"
        );
    }

    #[test]
    fn test_has_party_with_role() {
        let r = record(vec![
            party(Role::Claimant, Some("90400888000142")),
            party(Role::Respondent, Some("11222333000181")),
        ]);

        assert!(has_party_with_role(&r, &Role::Claimant, "90.400.888/0001-42"));
        assert!(!has_party_with_role(&r, &Role::Respondent, "90400888000142"));
        assert!(has_party_with_role(&r, &Role::Respondent, "11222333000181"));
    }

    #[test]
    fn test_role_predicate_is_existential() {
        let r = record(vec![
            party(Role::Claimant, Some("1")),
            party(Role::Claimant, Some("1")),
            party(Role::Respondent, Some("1")),
        ]);
        assert!(has_party_with_role(&r, &Role::Claimant, "1"));
        assert!(has_party_with_role(&r, &Role::Respondent, "1"));
    }

    #[test]
    fn test_no_parties_or_missing_tax_id() {
        assert!(!has_party_with_role(&record(vec![]), &Role::Claimant, "1"));
        let r = record(vec![party(Role::Claimant, None)]);
        assert!(!has_party_with_role(&r, &Role::Claimant, "1"));
    }

    #[test]
    fn test_records_with_role_keeps_order() {
        let target = TargetId::new("7").unwrap();
        let records = vec![
            ProcessRecord {
                id: Some("a".into()),
                ..record(vec![party(Role::Claimant, Some("7"))])
            },
            record(vec![party(Role::Respondent, Some("7"))]),
            ProcessRecord {
                id: Some("c".into()),
                ..record(vec![party(Role::Claimant, Some("7"))])
            },
        ];

        let ids: Vec<_> = records_with_role(&records, &Role::Claimant, &target)
            .map(|r| r.id.as_deref())
            .collect();
        assert_eq!(ids, vec![Some("a"), Some("c")]);
    }
}
