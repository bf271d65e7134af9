use moodsignal_common::MoodSignalError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScoringError>;

#[derive(Error, Debug)]
pub enum ScoringError {
    /// Normalization produced no rows; there is nothing to score.
    #[error("No usable posts after normalization")]
    EmptyNormalization,

    #[error(transparent)]
    Input(#[from] MoodSignalError),

    #[error("Model artifact error: {0}")]
    Artifact(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Feature dimension mismatch: expected {expected}, got {got}")]
    Dimension { expected: usize, got: usize },
}

impl From<reqwest::Error> for ScoringError {
    fn from(e: reqwest::Error) -> Self {
        ScoringError::Model(e.to_string())
    }
}
