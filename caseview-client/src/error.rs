use caseview_fields::FieldsError;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to read '{path}': {message}")]
    Read { path: String, message: String },

    #[error("Invalid JSON in '{path}': {message}")]
    Json { path: String, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Schema error: {0}")]
    Schema(#[from] FieldsError),

    #[error("Case '{0}' not found")]
    CaseNotFound(String),

    #[error("Fixture '{path}' must be a JSON array of case records")]
    NotAnArray { path: String },
}

impl From<serde_yaml::Error> for ClientError {
    fn from(err: serde_yaml::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}
