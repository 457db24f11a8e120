use thiserror::Error;

pub type FieldsResult<T> = Result<T, FieldsError>;

/// Errors raised while loading or linting schemas.
///
/// Resolution and rendering never fail; these only surface when a schema
/// document cannot be read or is structurally unusable.
#[derive(Error, Debug, Clone)]
pub enum FieldsError {
    #[error("JSON error: {0}")]
    Json(String),

    #[error("YAML error: {0}")]
    Yaml(String),

    #[error("Failed to read schema: {0}")]
    Io(String),

    #[error("Schema document is empty: no sections found")]
    EmptySchema,

    #[error("Section {index} has an empty title")]
    MissingTitle { index: usize },

    #[error("Field '{key}' in section '{section}' is missing required property '{property}'")]
    MissingProperty {
        section: String,
        key: String,
        property: String,
    },

    #[error("Field '{key}' in section '{section}' has an empty label")]
    MissingLabel { section: String, key: String },

    #[error("Duplicate field key '{key}' in section '{section}'")]
    DuplicateKey { section: String, key: String },

    #[error("Duplicate section id '{id}'")]
    DuplicateSectionId { id: String },

    #[error("Invalid path '{path}' for field '{key}': segments must be non-empty")]
    InvalidPath { key: String, path: String },
}

impl From<serde_json::Error> for FieldsError {
    fn from(err: serde_json::Error) -> Self {
        FieldsError::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for FieldsError {
    fn from(err: serde_yaml::Error) -> Self {
        FieldsError::Yaml(err.to_string())
    }
}

impl From<std::io::Error> for FieldsError {
    fn from(err: std::io::Error) -> Self {
        FieldsError::Io(err.to_string())
    }
}
