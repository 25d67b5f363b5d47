use thiserror::Error;

#[derive(Error, Debug)]
pub enum SoilError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {attribute}: '{input}'")]
    InvalidMeasurement { attribute: String, input: String },

    #[error("Missing value for {0}")]
    MissingMeasurement(String),

    #[error("Invalid knowledge base: {0}")]
    InvalidKnowledgeBase(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, SoilError>;
