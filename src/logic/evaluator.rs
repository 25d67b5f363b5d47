use super::KnowledgeBase;
use crate::models::{
    AttributeSpec, Diagnostic, Measurement, MeasurementSet, Optimal, Verdict, NO_ISSUE,
    NO_ORGANIC_MATTER, NO_RECOMMENDATION,
};

/// Fertility evaluator
///
/// Checks each measured attribute against its optimum in the knowledge base.
/// Bounds are inclusive. Attributes the knowledge base does not know are
/// ignored, and values of the wrong kind (a label for a numeric attribute or
/// a number for a categorical one) are skipped without counting as a
/// violation. Use `validation::check_measurements` first for strict input.
pub struct FertilityEvaluator<'a> {
    knowledge_base: &'a KnowledgeBase,
}

impl<'a> FertilityEvaluator<'a> {
    pub fn new(knowledge_base: &'a KnowledgeBase) -> Self {
        Self { knowledge_base }
    }

    pub fn evaluate(&self, measurements: &MeasurementSet) -> Verdict {
        let diagnostics: Vec<Diagnostic> = measurements
            .iter()
            .filter_map(|(name, value)| {
                let spec = self.knowledge_base.get(name)?;
                violates(spec, value).then(|| diagnose(spec))
            })
            .collect();

        if diagnostics.is_empty() {
            Verdict::Fertile
        } else {
            tracing::debug!(
                "{} of {} measurements out of range",
                diagnostics.len(),
                measurements.len()
            );
            Verdict::Infertile(diagnostics)
        }
    }
}

fn violates(spec: &AttributeSpec, value: &Measurement) -> bool {
    match (&spec.optimal, value) {
        (Optimal::Range { min, max }, Measurement::Number(v)) => !(*min..=*max).contains(v),
        (Optimal::Category { label, .. }, Measurement::Label(v)) => v != label,
        _ => {
            tracing::debug!(
                "Skipping {}: expected a {}, got a {}",
                spec.name,
                spec.optimal.kind(),
                value.kind()
            );
            false
        }
    }
}

fn diagnose(spec: &AttributeSpec) -> Diagnostic {
    Diagnostic {
        attribute: spec.name.clone(),
        issue: spec.issue.as_deref().unwrap_or(NO_ISSUE).to_string(),
        recommendation: spec
            .recommendation
            .as_deref()
            .unwrap_or(NO_RECOMMENDATION)
            .to_string(),
        organic_matter: spec
            .organic_matter
            .as_deref()
            .unwrap_or(NO_ORGANIC_MATTER)
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every attribute at the middle of its range, NPK balanced.
    fn midpoint_sample() -> MeasurementSet {
        MeasurementSet::new()
            .with("pH", 6.25)
            .with("EC", 1.3)
            .with("OC", 3.14)
            .with("N", 0.05)
            .with("P", 0.1625)
            .with("K", 2.025)
            .with("Zn", 0.003)
            .with("Fe", 0.03)
            .with("Cu", 12.5)
            .with("Mn", 0.0035)
            .with("Cl", 0.3)
            .with("CaCO3", 34.0)
            .with("OM", 4.0)
            .with("Sand", 50.0)
            .with("Silt", 30.0)
            .with("Clay", 30.0)
            .with("CEC", 15.0)
            .with("Boron", 0.75)
            .with("Magnesium", 100.0)
            .with("NPK", "Balanced")
            .with("EC2", 1.3)
            .with("PH2", 39.0)
            .with("S", 0.25)
    }

    fn expect_only(verdict: &Verdict, attributes: &[&str]) {
        assert_eq!(verdict.violating_attributes(), attributes.to_vec());
    }

    #[test]
    fn midpoints_are_fertile() {
        let kb = KnowledgeBase::standard();
        let verdict = FertilityEvaluator::new(&kb).evaluate(&midpoint_sample());
        assert_eq!(verdict, Verdict::Fertile);
    }

    #[test]
    fn low_ph_is_reported_alone() {
        let kb = KnowledgeBase::standard();
        let sample = midpoint_sample().with("pH", 5.0);
        let verdict = FertilityEvaluator::new(&kb).evaluate(&sample);

        expect_only(&verdict, &["pH"]);
        let diag = verdict.diagnostic("pH").unwrap();
        assert_eq!(
            diag.issue,
            "Soil pH is either too high (alkaline) or too low (acidic), affecting nutrient availability."
        );
        assert_eq!(
            diag.recommendation,
            "Add lime to increase pH or sulfur to decrease it."
        );
        assert_eq!(diag.organic_matter, "Compost, peat moss, or leaf mulch.");
    }

    #[test]
    fn unbalanced_npk() {
        let kb = KnowledgeBase::standard();
        let sample = midpoint_sample().with("NPK", "Unbalanced");
        let verdict = FertilityEvaluator::new(&kb).evaluate(&sample);
        expect_only(&verdict, &["NPK"]);
    }

    #[test]
    fn two_violations_keep_insertion_order() {
        let kb = KnowledgeBase::standard();
        let sample = midpoint_sample().with("pH", 5.0).with("K", 0.5);
        let verdict = FertilityEvaluator::new(&kb).evaluate(&sample);

        expect_only(&verdict, &["pH", "K"]);
        for diag in verdict.diagnostics() {
            let spec = kb.get(&diag.attribute).unwrap();
            assert_eq!(Some(&diag.issue), spec.issue.as_ref());
            assert_eq!(Some(&diag.recommendation), spec.recommendation.as_ref());
            assert_eq!(Some(&diag.organic_matter), spec.organic_matter.as_ref());
        }

        let reordered = MeasurementSet::new()
            .with("K", 0.5)
            .with("NPK", "Balanced")
            .with("pH", 7.0);
        let verdict = FertilityEvaluator::new(&kb).evaluate(&reordered);
        expect_only(&verdict, &["K", "pH"]);
    }

    #[test]
    fn numeric_bounds_are_inclusive() {
        let kb = KnowledgeBase::standard();
        let evaluator = FertilityEvaluator::new(&kb);

        for spec in kb.attributes() {
            let Optimal::Range { min, max } = spec.optimal else {
                continue;
            };
            let name = spec.name.as_str();

            for edge in [min, max] {
                let sample = MeasurementSet::new().with(name, edge);
                assert!(
                    evaluator.evaluate(&sample).is_fertile(),
                    "{} at bound {} should be fertile",
                    name,
                    edge
                );
            }
            for outside in [min - 1.0, max + 1.0] {
                let sample = MeasurementSet::new().with(name, outside);
                expect_only(&evaluator.evaluate(&sample), &[name]);
            }
        }
    }

    #[test]
    fn categorical_requires_exact_label() {
        let kb = KnowledgeBase::standard();
        let evaluator = FertilityEvaluator::new(&kb);

        let balanced = MeasurementSet::new().with("NPK", "Balanced");
        assert!(evaluator.evaluate(&balanced).is_fertile());

        for other in ["Unbalanced", "balanced", "Balanced ", ""] {
            let sample = MeasurementSet::new().with("NPK", other);
            expect_only(&evaluator.evaluate(&sample), &["NPK"]);
        }
    }

    #[test]
    fn unknown_attributes_are_ignored() {
        let kb = KnowledgeBase::standard();
        let evaluator = FertilityEvaluator::new(&kb);

        let base = midpoint_sample().with("Cu", 1.0);
        let noisy = base
            .clone()
            .with("Moisture", 99.0)
            .with("Colour", "Dark");

        assert_eq!(evaluator.evaluate(&base), evaluator.evaluate(&noisy));
        assert!(evaluator
            .evaluate(&MeasurementSet::new().with("Moisture", -5.0))
            .is_fertile());
    }

    #[test]
    fn mismatched_types_are_skipped() {
        let kb = KnowledgeBase::standard();
        let evaluator = FertilityEvaluator::new(&kb);

        let sample = midpoint_sample()
            .with("pH", "very acidic")
            .with("NPK", 1.0);
        assert_eq!(evaluator.evaluate(&sample), Verdict::Fertile);

        let sample = midpoint_sample().with("pH", "5.0").with("K", 0.5);
        expect_only(&evaluator.evaluate(&sample), &["K"]);
    }

    #[test]
    fn nan_is_out_of_range() {
        let kb = KnowledgeBase::standard();
        let sample = MeasurementSet::new().with("pH", f64::NAN);
        expect_only(&FertilityEvaluator::new(&kb).evaluate(&sample), &["pH"]);
    }

    #[test]
    fn empty_set_is_fertile() {
        let kb = KnowledgeBase::standard();
        assert!(FertilityEvaluator::new(&kb)
            .evaluate(&MeasurementSet::new())
            .is_fertile());
    }

    #[test]
    fn repeated_evaluation_is_identical() {
        let kb = KnowledgeBase::standard();
        let evaluator = FertilityEvaluator::new(&kb);
        let sample = midpoint_sample().with("Sand", 75.0).with("NPK", "Unbalanced");

        let first = evaluator.evaluate(&sample);
        for _ in 0..5 {
            assert_eq!(evaluator.evaluate(&sample), first);
        }
    }

    #[test]
    fn substitute_knowledge_base_uses_placeholders() {
        let kb = KnowledgeBase::new(vec![
            AttributeSpec::new("Moisture", Optimal::range(10.0, 30.0)),
            AttributeSpec::new("Texture", Optimal::category("Loam", &[]))
                .with_issue("Texture is not loam.")
                .with_recommendation("Amend with compost."),
        ])
        .unwrap();
        let evaluator = FertilityEvaluator::new(&kb);

        let sample = MeasurementSet::new()
            .with("Moisture", 45.0)
            .with("Texture", "Clay")
            .with("pH", 2.0);
        let verdict = evaluator.evaluate(&sample);
        expect_only(&verdict, &["Moisture", "Texture"]);

        let moisture = verdict.diagnostic("Moisture").unwrap();
        assert_eq!(moisture.issue, NO_ISSUE);
        assert_eq!(moisture.recommendation, NO_RECOMMENDATION);
        assert_eq!(moisture.organic_matter, NO_ORGANIC_MATTER);

        let texture = verdict.diagnostic("Texture").unwrap();
        assert_eq!(texture.issue, "Texture is not loam.");
        assert_eq!(texture.recommendation, "Amend with compost.");
        assert_eq!(texture.organic_matter, NO_ORGANIC_MATTER);
    }
}
