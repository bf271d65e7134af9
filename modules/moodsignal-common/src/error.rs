use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MoodSignalError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MoodSignalError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        MoodSignalError::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
