use crate::error::{Result, SoilError};
use crate::models::{AttributeSpec, Optimal};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

pub const NPK_CHOICES: &[&str] = &["Balanced", "Unbalanced"];

/// Immutable table of per-attribute optima and advice.
///
/// Built once at startup, either from the built-in agronomic table or from a
/// YAML file, and shared by reference with every evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    attributes: Vec<AttributeSpec>,
}

impl KnowledgeBase {
    /// Build from a list of specs, rejecting duplicates and malformed optima.
    pub fn new(attributes: Vec<AttributeSpec>) -> Result<Self> {
        let kb = Self { attributes };
        kb.validate()?;
        Ok(kb)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let kb: KnowledgeBase = serde_yaml::from_str(content)?;
        kb.validate()?;
        Ok(kb)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SoilError::InvalidKnowledgeBase(format!("Failed to read {:?}: {}", path, e))
        })?;
        let kb = Self::from_yaml_str(&content)?;
        tracing::info!(
            "Loaded knowledge base with {} attributes from {:?}",
            kb.len(),
            path
        );
        Ok(kb)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn get(&self, name: &str) -> Option<&AttributeSpec> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn attributes(&self) -> &[AttributeSpec] {
        &self.attributes
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    fn validate(&self) -> Result<()> {
        if self.attributes.is_empty() {
            return Err(SoilError::InvalidKnowledgeBase(
                "no attributes defined".into(),
            ));
        }

        let mut seen = HashSet::new();
        for spec in &self.attributes {
            if spec.name.trim().is_empty() {
                return Err(SoilError::InvalidKnowledgeBase(
                    "attribute with empty name".into(),
                ));
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(SoilError::InvalidKnowledgeBase(format!(
                    "duplicate attribute '{}'",
                    spec.name
                )));
            }
            match &spec.optimal {
                Optimal::Range { min, max } => {
                    if !min.is_finite() || !max.is_finite() || min > max {
                        return Err(SoilError::InvalidKnowledgeBase(format!(
                            "{}: invalid range {} - {}",
                            spec.name, min, max
                        )));
                    }
                }
                Optimal::Category { label, choices } => {
                    if !choices.is_empty() && !choices.contains(label) {
                        return Err(SoilError::InvalidKnowledgeBase(format!(
                            "{}: optimal label '{}' is not one of its choices",
                            spec.name, label
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// The agronomic reference table shipped with the tool.
    pub fn standard() -> Self {
        let attributes = STANDARD_TABLE
            .iter()
            .map(|row| {
                let optimal = match row.optimal {
                    StandardOptimal::Range(min, max) => Optimal::range(min, max),
                    StandardOptimal::Label(label) => Optimal::category(label, NPK_CHOICES),
                };
                let mut spec = AttributeSpec::new(row.name, optimal)
                    .with_issue(row.issue)
                    .with_recommendation(row.recommendation)
                    .with_organic_matter(row.organic_matter);
                if let Some(unit) = row.unit {
                    spec = spec.with_unit(unit);
                }
                spec
            })
            .collect();

        Self { attributes }
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::standard()
    }
}

enum StandardOptimal {
    Range(f64, f64),
    Label(&'static str),
}

struct StandardRow {
    name: &'static str,
    optimal: StandardOptimal,
    unit: Option<&'static str>,
    issue: &'static str,
    recommendation: &'static str,
    organic_matter: &'static str,
}

const STANDARD_TABLE: &[StandardRow] = &[
    StandardRow {
        name: "pH",
        optimal: StandardOptimal::Range(6.0, 6.5),
        unit: None,
        issue: "Soil pH is either too high (alkaline) or too low (acidic), affecting nutrient availability.",
        recommendation: "Add lime to increase pH or sulfur to decrease it.",
        organic_matter: "Compost, peat moss, or leaf mulch.",
    },
    StandardRow {
        name: "EC",
        optimal: StandardOptimal::Range(0.8, 1.8),
        unit: Some("%"),
        issue: "High electrical conductivity (EC) indicates excessive salinity, which can reduce plant growth.",
        recommendation: "Ensure proper drainage or leach the soil to reduce salinity.",
        organic_matter: "Well-composted organic matter or green manure.",
    },
    StandardRow {
        name: "OC",
        optimal: StandardOptimal::Range(0.28, 6.00),
        unit: Some("%"),
        issue: "Low organic carbon (OC) results in poor soil structure and fertility.",
        recommendation: "Incorporate organic matter like compost or manure.",
        organic_matter: "Compost, vermicompost, or farmyard manure.",
    },
    StandardRow {
        name: "N",
        optimal: StandardOptimal::Range(0.03, 0.07),
        unit: Some("%"),
        issue: "Low nitrogen (N) levels cause poor plant growth and reduced crop yield.",
        recommendation: "Add nitrogen-rich fertilizers like urea or ammonium nitrate.",
        organic_matter: "Animal manure, green manure, or composted kitchen waste.",
    },
    StandardRow {
        name: "P",
        optimal: StandardOptimal::Range(0.10, 0.225),
        unit: Some("%"),
        issue: "Low phosphorus (P) levels result in poor root development and weak plant growth.",
        recommendation: "Use phosphate fertilizers such as superphosphate or bone meal.",
        organic_matter: "Bone meal, rock phosphate, or poultry manure.",
    },
    StandardRow {
        name: "K",
        optimal: StandardOptimal::Range(1.28, 2.77),
        unit: Some("%"),
        issue: "Potassium (K) deficiency leads to poor root growth and reduced disease resistance.",
        recommendation: "Apply potash-based fertilizers like potassium sulfate.",
        organic_matter: "Wood ash, banana peels, or composted manure.",
    },
    StandardRow {
        name: "Zn",
        optimal: StandardOptimal::Range(0.001, 0.005),
        unit: Some("%"),
        issue: "Zinc (Zn) deficiency results in poor growth and chlorosis.",
        recommendation: "Use zinc sulfate or foliar sprays of zinc solution.",
        organic_matter: "Zinc-enriched compost or poultry litter.",
    },
    StandardRow {
        name: "Fe",
        optimal: StandardOptimal::Range(0.01, 0.05),
        unit: Some("%"),
        issue: "Iron (Fe) deficiency causes yellowing of leaves and poor plant growth.",
        recommendation: "Incorporate iron chelates or iron-rich organic compost.",
        organic_matter: "Iron-rich compost or organic mulch.",
    },
    StandardRow {
        name: "Cu",
        optimal: StandardOptimal::Range(5.0, 20.0),
        unit: Some("%"),
        issue: "Copper (Cu) deficiency leads to stunted growth and poor seed production.",
        recommendation: "Add copper sulfate or use copper-based foliar sprays.",
        organic_matter: "Copper-enriched compost or bio-fertilizers.",
    },
    StandardRow {
        name: "Mn",
        optimal: StandardOptimal::Range(0.002, 0.005),
        unit: Some("%"),
        issue: "Manganese (Mn) deficiency causes poor root development and chlorosis.",
        recommendation: "Apply manganese sulfate or use chelated manganese fertilizers.",
        organic_matter: "Manganese-enriched compost or organic fertilizers.",
    },
    StandardRow {
        name: "Cl",
        optimal: StandardOptimal::Range(0.1, 0.5),
        unit: Some("%"),
        issue: "Excess chloride (Cl) reduces plant growth and may cause toxicity.",
        recommendation: "Ensure proper drainage or use gypsum to balance chloride levels.",
        organic_matter: "Well-rotted manure or gypsum-based organic matter.",
    },
    StandardRow {
        name: "CaCO3",
        optimal: StandardOptimal::Range(20.0, 48.0),
        unit: Some("%"),
        issue: "Too much calcium carbonate (CaCO3) can raise soil pH and cause nutrient imbalances.",
        recommendation: "Add lime to adjust calcium carbonate levels.",
        organic_matter: "Crushed eggshells or agricultural lime.",
    },
    StandardRow {
        name: "OM",
        optimal: StandardOptimal::Range(3.0, 5.0),
        unit: Some("%"),
        issue: "Lack of organic matter (OM) results in poor soil structure and low water retention.",
        recommendation: "Increase organic matter by adding compost or green manure.",
        organic_matter: "Composted manure, peat, or cover crops.",
    },
    StandardRow {
        name: "Sand",
        optimal: StandardOptimal::Range(40.0, 60.0),
        unit: Some("%"),
        issue: "High sand content results in poor water retention and nutrient holding capacity.",
        recommendation: "Improve soil structure by mixing in organic matter.",
        organic_matter: "Organic compost or well-aged manure.",
    },
    StandardRow {
        name: "Silt",
        optimal: StandardOptimal::Range(20.0, 40.0),
        unit: Some("%"),
        issue: "High silt content can cause compaction and poor drainage.",
        recommendation: "Avoid soil compaction and use cover crops to balance silt levels.",
        organic_matter: "Organic mulch or cover crops like legumes.",
    },
    StandardRow {
        name: "Clay",
        optimal: StandardOptimal::Range(20.0, 40.0),
        unit: Some("%"),
        issue: "Excessive clay content can cause poor drainage and aeration, leading to root diseases.",
        recommendation: "Add organic matter to improve aeration and drainage.",
        organic_matter: "Organic compost or gypsum.",
    },
    StandardRow {
        name: "CEC",
        optimal: StandardOptimal::Range(10.0, 20.0),
        unit: Some("cmol/kg"),
        issue: "Low Cation Exchange Capacity (CEC) means the soil can't hold enough nutrients for plants.",
        recommendation: "Add organic matter to increase cation exchange capacity.",
        organic_matter: "High-organic-matter compost or humus-rich soil.",
    },
    StandardRow {
        name: "Boron",
        optimal: StandardOptimal::Range(0.5, 1.0),
        unit: Some("ppm"),
        issue: "Boron deficiency affects flowering and fruit development.",
        recommendation: "Apply borax or boric acid in small quantities.",
        organic_matter: "Borax-treated compost or bio-fertilizers.",
    },
    StandardRow {
        name: "Magnesium",
        optimal: StandardOptimal::Range(50.0, 150.0),
        unit: Some("%"),
        issue: "Low magnesium levels reduce chlorophyll production and cause leaf discoloration.",
        recommendation: "Use magnesium sulfate (Epsom salts) or dolomite lime.",
        organic_matter: "Dolomite lime or magnesium-enriched compost.",
    },
    StandardRow {
        name: "NPK",
        optimal: StandardOptimal::Label("Balanced"),
        unit: None,
        issue: "Imbalanced NPK ratio leads to poor plant growth and nutrient deficiencies.",
        recommendation: "Balance NPK by using appropriate fertilizers for the deficient element.",
        organic_matter: "Balanced organic fertilizers or compost tea.",
    },
    StandardRow {
        name: "EC2",
        optimal: StandardOptimal::Range(0.8, 1.8),
        unit: Some("%"),
        issue: "High EC indicates salinity, which can reduce soil fertility and plant growth.",
        recommendation: "Ensure proper irrigation and drainage to maintain EC.",
        organic_matter: "Composted organic matter or biochar.",
    },
    StandardRow {
        name: "PH2",
        optimal: StandardOptimal::Range(36.0, 42.0),
        unit: None,
        issue: "Inappropriate pH levels reduce nutrient availability.",
        recommendation: "Adjust soil pH with lime or sulfur based on the requirement.",
        organic_matter: "Organic sulfur amendments or compost.",
    },
    StandardRow {
        name: "S",
        optimal: StandardOptimal::Range(0.1, 0.4),
        unit: Some("%"),
        issue: "Low sulfur (S) levels affect protein synthesis and reduce crop yield.",
        recommendation: "Incorporate sulfur fertilizers like gypsum or elemental sulfur.",
        organic_matter: "Sulfur-rich compost or gypsum.",
    },
];
