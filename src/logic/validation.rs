use super::KnowledgeBase;
use crate::error::{Result, SoilError};
use crate::models::{Measurement, MeasurementSet};

/// A measurement the evaluator would silently pass over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeasurementIssue {
    TypeMismatch {
        attribute: String,
        expected: &'static str,
        found: &'static str,
    },
    UnknownAttribute(String),
}

impl std::fmt::Display for MeasurementIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeasurementIssue::TypeMismatch {
                attribute,
                expected,
                found,
            } => write!(f, "{}: expected a {}, found a {}", attribute, expected, found),
            MeasurementIssue::UnknownAttribute(name) => write!(f, "{}: unknown attribute", name),
        }
    }
}

pub fn check_measurements(
    kb: &KnowledgeBase,
    measurements: &MeasurementSet,
) -> Vec<MeasurementIssue> {
    measurements
        .iter()
        .filter_map(|(name, value)| {
            let Some(spec) = kb.get(name) else {
                return Some(MeasurementIssue::UnknownAttribute(name.to_string()));
            };
            let matches = spec.optimal.is_numeric() == matches!(value, Measurement::Number(_));
            (!matches).then(|| MeasurementIssue::TypeMismatch {
                attribute: name.to_string(),
                expected: spec.optimal.kind(),
                found: value.kind(),
            })
        })
        .collect()
}

/// Fail with every problem listed when the set is not strictly well-typed.
pub fn ensure_valid(kb: &KnowledgeBase, measurements: &MeasurementSet) -> Result<()> {
    let issues = check_measurements(kb, measurements);
    if issues.is_empty() {
        return Ok(());
    }

    let listed: Vec<String> = issues.iter().map(|i| i.to_string()).collect();
    Err(SoilError::Validation(listed.join("; ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_typed_set_has_no_issues() {
        let kb = KnowledgeBase::standard();
        let set = MeasurementSet::new().with("pH", 6.2).with("NPK", "Balanced");
        assert!(check_measurements(&kb, &set).is_empty());
        assert!(ensure_valid(&kb, &set).is_ok());
    }

    #[test]
    fn reports_mismatches_and_unknowns_in_order() {
        let kb = KnowledgeBase::standard();
        let set = MeasurementSet::new()
            .with("Moisture", 20.0)
            .with("pH", "6.2")
            .with("NPK", 1.0);

        let issues = check_measurements(&kb, &set);
        assert_eq!(
            issues,
            vec![
                MeasurementIssue::UnknownAttribute("Moisture".into()),
                MeasurementIssue::TypeMismatch {
                    attribute: "pH".into(),
                    expected: "number",
                    found: "label",
                },
                MeasurementIssue::TypeMismatch {
                    attribute: "NPK".into(),
                    expected: "label",
                    found: "number",
                },
            ]
        );

        let err = ensure_valid(&kb, &set).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Moisture: unknown attribute"));
        assert!(message.contains("pH: expected a number, found a label"));
    }
}
