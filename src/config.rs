use crate::error::{Result, SoilError};
use crate::logic::report::DEFAULT_REPORT_NAME;
use crate::logic::KnowledgeBase;
use dialoguer::{Confirm, Input};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Optional YAML knowledge base replacing the built-in table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_base: Option<PathBuf>,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    #[serde(default = "default_report_name")]
    pub file_name: String,
}

fn default_report_name() -> String {
    DEFAULT_REPORT_NAME.to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_name: default_report_name(),
        }
    }
}

impl Config {
    /// Load config from the override path or the standard locations.
    /// Without any config file the defaults are used.
    pub fn load(config_override: Option<&PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => {
                if !p.exists() {
                    return Err(SoilError::Config(format!(
                        "Config file not found at {:?}",
                        p
                    )));
                }
                p.clone()
            }
            None => match Self::find_config_path() {
                Some(p) => p,
                None => {
                    tracing::debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| SoilError::Config(format!("Failed to read config: {}", e)))?;

        let config = Self::from_yaml_str(&config_str)?;
        tracing::debug!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // Substitute environment variables
        let content = Self::substitute_env_vars(content);

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content)
            .map_err(|e| SoilError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Search for config.yaml in standard locations.
    fn find_config_path() -> Option<PathBuf> {
        // Try current directory first
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        // Try XDG config directory
        let xdg_config = dirs::config_dir()?.join("soilfert").join("config.yaml");
        xdg_config.exists().then_some(xdg_config)
    }

    /// Default path for writing new config files (~/.config/soilfert/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SoilError::Config("Cannot determine config directory".into()))?
            .join("soilfert");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("Soil fertility evaluator setup");
        println!();

        println!("Reports");
        let directory: String = Input::new()
            .with_prompt("  Report directory (blank for current directory)")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| SoilError::Config(format!("Input error: {}", e)))?;

        let file_name: String = Input::new()
            .with_prompt("  Report file name")
            .default(DEFAULT_REPORT_NAME.into())
            .interact_text()
            .map_err(|e| SoilError::Config(format!("Input error: {}", e)))?;

        println!();

        println!("Knowledge base");
        let use_custom = Confirm::new()
            .with_prompt("  Load ranges and advice from a YAML file?")
            .default(false)
            .interact()
            .map_err(|e| SoilError::Config(format!("Input error: {}", e)))?;

        let knowledge_base = if use_custom {
            let path: String = Input::new()
                .with_prompt("  Knowledge base path")
                .interact_text()
                .map_err(|e| SoilError::Config(format!("Input error: {}", e)))?;
            let path = PathBuf::from(path);
            // Fail now rather than at the first evaluation
            KnowledgeBase::load(&path)?;
            Some(path)
        } else {
            None
        };

        println!();

        let config = Config {
            knowledge_base,
            report: ReportConfig {
                directory: (!directory.is_empty()).then(|| PathBuf::from(directory)),
                file_name,
            },
        };

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| SoilError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# soilfert configuration\n# Generated by `soilfert init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> String {
        let mut result = content.to_string();

        // Find all ${VAR_NAME} patterns and substitute
        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }

    /// The configured knowledge base, or the built-in table.
    pub fn knowledge_base(&self) -> Result<KnowledgeBase> {
        match &self.knowledge_base {
            Some(path) => KnowledgeBase::load(path),
            None => Ok(KnowledgeBase::standard()),
        }
    }

    /// Where reports are written. An explicit path wins, then
    /// `SOILFERT_REPORT_DIR`, then the configured directory.
    pub fn report_path(&self, override_path: Option<&PathBuf>) -> PathBuf {
        if let Some(path) = override_path {
            return path.clone();
        }

        let directory = std::env::var("SOILFERT_REPORT_DIR")
            .ok()
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
            .or_else(|| self.report.directory.clone());

        match directory {
            Some(dir) => dir.join(&self.report.file_name),
            None => PathBuf::from(&self.report.file_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::from_yaml_str("").unwrap();
        assert!(config.knowledge_base.is_none());
        assert!(config.report.directory.is_none());
        assert_eq!(config.report.file_name, "soil_report.txt");
    }

    #[test]
    fn parses_report_section() {
        let config = Config::from_yaml_str(
            "report:\n  directory: /tmp/soil\n  file_name: field_7.txt\n",
        )
        .unwrap();
        assert_eq!(config.report.directory, Some(PathBuf::from("/tmp/soil")));
        assert_eq!(config.report.file_name, "field_7.txt");
    }

    #[test]
    fn substitutes_environment_variables() {
        std::env::set_var("SOILFERT_TEST_KB_DIR", "/srv/kb");
        let config =
            Config::from_yaml_str("knowledge_base: ${SOILFERT_TEST_KB_DIR}/ranges.yaml\n").unwrap();
        assert_eq!(
            config.knowledge_base,
            Some(PathBuf::from("/srv/kb/ranges.yaml"))
        );
    }

    #[test]
    fn unset_variables_are_left_alone() {
        let out = Config::substitute_env_vars("file_name: ${SOILFERT_TEST_NEVER_SET_42}");
        assert_eq!(out, "file_name: ${SOILFERT_TEST_NEVER_SET_42}");
    }

    #[test]
    fn rejects_malformed_yaml() {
        let err = Config::from_yaml_str("report: [1, 2").unwrap_err();
        assert!(matches!(err, SoilError::Config(_)));
    }

    #[test]
    fn missing_override_is_an_error() {
        let path = PathBuf::from("/nonexistent/soilfert/config.yaml");
        assert!(matches!(Config::load(Some(&path)), Err(SoilError::Config(_))));
    }

    #[test]
    fn explicit_report_path_wins() {
        let config = Config::default();
        let explicit = PathBuf::from("out/report.txt");
        assert_eq!(config.report_path(Some(&explicit)), explicit);
    }

    #[test]
    fn default_knowledge_base_is_standard() {
        let kb = Config::default().knowledge_base().unwrap();
        assert_eq!(kb, KnowledgeBase::standard());
    }
}
