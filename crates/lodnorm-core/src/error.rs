//! Error types for lodnorm.

use thiserror::Error;

/// Top-level result type for lodnorm operations.
pub type Result<T> = std::result::Result<T, LodError>;

/// Top-level error type for lodnorm.
#[derive(Debug, Error)]
pub enum LodError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{target} Not Found - Term may not exist at LOD Authority.")]
    NotFound { target: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Fatal configuration problems, raised before any graph data is read.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required label predicate is missing in {section} configuration")]
    MissingLabelPredicate { section: String },

    #[error("authority '{authority}' has no {section} configuration")]
    MissingSection { authority: String, section: String },

    #[error("'{0}' is not a registered authority")]
    UnknownAuthority(String),

    #[error("unable to initialize sub-authority '{subauthority}' for authority '{authority}'")]
    UnknownSubauthority {
        authority: String,
        subauthority: String,
    },

    #[error("no value supplied for required url variable '{variable}'")]
    MissingTemplateValue { variable: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// A failure confined to a single field of a single result.
///
/// Never raised to the caller: the consolidator records it as a
/// [`Value::ParseError`](crate::term::Value::ParseError) marker in that field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}' could not be extracted: {reason}")]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
