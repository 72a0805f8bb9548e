use crate::validation::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("invalid submission id: {0}")]
    InvalidId(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to serialize submission: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize submission: {0}")]
    Deserialization(serde_json::Error),
    #[error("submission store lock poisoned")]
    StorePoisoned,
    #[error("failed to build webhook client: {0}")]
    HttpClient(reqwest::Error),
}

pub type SubmissionResult<T> = std::result::Result<T, SubmissionError>;
