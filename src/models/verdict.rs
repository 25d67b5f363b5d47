use serde::{Deserialize, Serialize};

pub const NO_ISSUE: &str = "No issue specified";
pub const NO_RECOMMENDATION: &str = "No recommendation available";
pub const NO_ORGANIC_MATTER: &str = "No organic matter suggestion available";

/// Explanation attached to one attribute that fell outside its optimum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub attribute: String,
    pub issue: String,
    pub recommendation: String,
    pub organic_matter: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "issues")]
pub enum Verdict {
    Fertile,
    Infertile(Vec<Diagnostic>),
}

impl Verdict {
    pub fn is_fertile(&self) -> bool {
        matches!(self, Verdict::Fertile)
    }

    pub fn status(&self) -> &'static str {
        match self {
            Verdict::Fertile => "Fertile",
            Verdict::Infertile(_) => "Infertile",
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Verdict::Fertile => &[],
            Verdict::Infertile(diagnostics) => diagnostics,
        }
    }

    pub fn diagnostic(&self, attribute: &str) -> Option<&Diagnostic> {
        self.diagnostics().iter().find(|d| d.attribute == attribute)
    }

    pub fn violating_attributes(&self) -> Vec<&str> {
        self.diagnostics()
            .iter()
            .map(|d| d.attribute.as_str())
            .collect()
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagnostic(attribute: &str) -> Diagnostic {
        Diagnostic {
            attribute: attribute.to_string(),
            issue: "issue".to_string(),
            recommendation: "fix".to_string(),
            organic_matter: "compost".to_string(),
        }
    }

    #[test]
    fn fertile_has_no_diagnostics() {
        let verdict = Verdict::Fertile;
        assert!(verdict.is_fertile());
        assert_eq!(verdict.status(), "Fertile");
        assert!(verdict.diagnostics().is_empty());
        assert!(verdict.diagnostic("pH").is_none());
    }

    #[test]
    fn infertile_lookup() {
        let verdict = Verdict::Infertile(vec![diagnostic("pH"), diagnostic("K")]);
        assert!(!verdict.is_fertile());
        assert_eq!(verdict.to_string(), "Infertile");
        assert_eq!(verdict.violating_attributes(), vec!["pH", "K"]);
        assert_eq!(verdict.diagnostic("K").map(|d| d.attribute.as_str()), Some("K"));
        assert!(verdict.diagnostic("N").is_none());
    }

    #[test]
    fn json_shape() {
        let json = serde_json::to_value(Verdict::Fertile).unwrap();
        assert_eq!(json["status"], "Fertile");

        let json = serde_json::to_value(Verdict::Infertile(vec![diagnostic("pH")])).unwrap();
        assert_eq!(json["status"], "Infertile");
        assert_eq!(json["issues"][0]["attribute"], "pH");
        assert_eq!(json["issues"][0]["organic_matter"], "compost");
    }
}
