use serde::{Deserialize, Serialize};

/// Optimal condition for one soil attribute.
///
/// Numeric attributes are fertile when the measured value lies inside the
/// inclusive `[min, max]` interval. Categorical attributes are fertile only
/// when the measured label matches `label` exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Optimal {
    Range {
        min: f64,
        max: f64,
    },
    Category {
        label: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        choices: Vec<String>,
    },
}

impl Optimal {
    pub fn range(min: f64, max: f64) -> Self {
        Optimal::Range { min, max }
    }

    pub fn category(label: &str, choices: &[&str]) -> Self {
        Optimal::Category {
            label: label.to_string(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Optimal::Range { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Optimal::Range { .. } => "number",
            Optimal::Category { .. } => "label",
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Optimal::Range { min, max } => format!("{} - {}", min, max),
            Optimal::Category { label, .. } => label.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSpec {
    pub name: String,
    pub optimal: Optimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organic_matter: Option<String>,
}

impl AttributeSpec {
    pub fn new(name: impl Into<String>, optimal: Optimal) -> Self {
        Self {
            name: name.into(),
            optimal,
            unit: None,
            issue: None,
            recommendation: None,
            organic_matter: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_issue(mut self, issue: impl Into<String>) -> Self {
        self.issue = Some(issue.into());
        self
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }

    pub fn with_organic_matter(mut self, suggestion: impl Into<String>) -> Self {
        self.organic_matter = Some(suggestion.into());
        self
    }

    /// Label used by input forms, e.g. "CEC (cmol/kg)".
    pub fn display_label(&self) -> String {
        match &self.unit {
            Some(unit) => format!("{} ({})", self.name, unit),
            None => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optimal_deserializes_range_and_category() {
        let range: Optimal = serde_yaml::from_str("{ min: 6.0, max: 6.5 }").unwrap();
        assert_eq!(range, Optimal::range(6.0, 6.5));

        let category: Optimal =
            serde_yaml::from_str("{ label: Balanced, choices: [Balanced, Unbalanced] }").unwrap();
        assert_eq!(
            category,
            Optimal::category("Balanced", &["Balanced", "Unbalanced"])
        );

        let bare: Optimal = serde_yaml::from_str("{ label: Balanced }").unwrap();
        assert_eq!(bare, Optimal::category("Balanced", &[]));
    }

    #[test]
    fn optimal_kind() {
        assert!(Optimal::range(1.0, 2.0).is_numeric());
        assert!(!Optimal::category("Balanced", &[]).is_numeric());
        assert_eq!(Optimal::range(1.0, 2.0).kind(), "number");
        assert_eq!(Optimal::category("Balanced", &[]).kind(), "label");
    }

    #[test]
    fn display_label_includes_unit() {
        let spec = AttributeSpec::new("CEC", Optimal::range(10.0, 20.0)).with_unit("cmol/kg");
        assert_eq!(spec.display_label(), "CEC (cmol/kg)");

        let spec = AttributeSpec::new("pH", Optimal::range(6.0, 6.5));
        assert_eq!(spec.display_label(), "pH");
    }
}
