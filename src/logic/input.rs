use super::KnowledgeBase;
use crate::error::{Result, SoilError};
use crate::models::{AttributeSpec, Measurement, MeasurementSet, Optimal};
use std::path::Path;

/// Pre-filled form values for a typical sample.
pub const FORM_DEFAULTS: &[(&str, &str)] = &[
    ("pH", "6.5"),
    ("EC", "1.0"),
    ("OC", "3.0"),
    ("N", "0.05"),
    ("P", "0.15"),
    ("K", "2.0"),
    ("Zn", "0.003"),
    ("Fe", "0.03"),
    ("Cu", "0.0007"),
    ("Mn", "0.003"),
    ("Cl", "0.15"),
    ("CaCO3", "30"),
    ("OM", "4.0"),
    ("Sand", "50"),
    ("Silt", "25"),
    ("Clay", "25"),
    ("CEC", "15"),
    ("Boron", "0.8"),
    ("Magnesium", "0.12"),
    ("NPK", "Balanced"),
    ("EC2", "1.0"),
    ("PH2", "40"),
    ("S", "0.25"),
];

/// Default text for a form field, falling back to the optimum for
/// attributes without a stock value.
pub fn default_text(spec: &AttributeSpec) -> String {
    if let Some((_, text)) = FORM_DEFAULTS.iter().find(|(name, _)| *name == spec.name) {
        return text.to_string();
    }
    match &spec.optimal {
        Optimal::Range { min, max } => format!("{}", (min + max) / 2.0),
        Optimal::Category { label, .. } => label.clone(),
    }
}

/// Parse user-entered text into the kind of value `spec` expects.
pub fn parse_measurement(spec: &AttributeSpec, raw: &str) -> Result<Measurement> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(SoilError::MissingMeasurement(spec.name.clone()));
    }

    let invalid = || SoilError::InvalidMeasurement {
        attribute: spec.name.clone(),
        input: raw.to_string(),
    };

    match &spec.optimal {
        Optimal::Range { .. } => text
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Measurement::Number)
            .ok_or_else(invalid),
        Optimal::Category { choices, .. } => {
            if choices.is_empty() || choices.iter().any(|c| c == text) {
                Ok(Measurement::Label(text.to_string()))
            } else {
                Err(invalid())
            }
        }
    }
}

/// Build a measurement set from raw form entries.
///
/// Entries are returned in knowledge-base order. Names the knowledge base
/// does not know are dropped; the first malformed value aborts.
pub fn parse_form<'a, I>(kb: &KnowledgeBase, entries: I) -> Result<MeasurementSet>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let entries: Vec<(&str, &str)> = entries.into_iter().collect();
    let mut set = MeasurementSet::new();

    for spec in kb.attributes() {
        let Some((_, raw)) = entries.iter().find(|(name, _)| *name == spec.name) else {
            continue;
        };
        set.insert(spec.name.clone(), parse_measurement(spec, raw)?);
    }

    for (name, _) in &entries {
        if !kb.contains(name) {
            tracing::debug!("Ignoring form entry for unknown attribute {}", name);
        }
    }

    Ok(set)
}

/// Read a YAML or JSON mapping of measurements, chosen by file extension.
pub fn load_measurements(path: &Path) -> Result<MeasurementSet> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("json"));

    let set: MeasurementSet = if is_json {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };

    tracing::debug!("Loaded {} measurements from {:?}", set.len(), path);
    Ok(set)
}
