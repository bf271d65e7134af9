use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use moodsignal_common::MoodSignalError;
use moodsignal_scoring::ScoringError;
use moodsignal_store::StoreError;
use thiserror::Error;
use tracing::{error, warn};

/// Every failure a request can end in. Retrieval failures inside a single
/// strategy never get here; only the exhausted chain does.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Input(#[from] MoodSignalError),

    #[error("Could not retrieve any posts for {0}")]
    AllStrategiesExhausted(String),

    #[error("No usable text in the retrieved posts")]
    EmptyNormalization,

    #[error("No text score found for {0}; run /predict first")]
    MissingTextScore(String),

    #[error("No demographic data found for {0}; submit /store_demographics first")]
    MissingDemographics(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error(transparent)]
    Persistence(#[from] StoreError),
}

impl From<ScoringError> for ApiError {
    fn from(e: ScoringError) -> Self {
        match e {
            ScoringError::EmptyNormalization => ApiError::EmptyNormalization,
            ScoringError::Input(e) => ApiError::Input(e),
            other => ApiError::Model(other.to_string()),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Input(MoodSignalError::Config(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Input(_) => StatusCode::BAD_REQUEST,
            ApiError::AllStrategiesExhausted(_) => StatusCode::BAD_GATEWAY,
            ApiError::EmptyNormalization => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::MissingTextScore(_) | ApiError::MissingDemographics(_) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Model(_) => StatusCode::BAD_GATEWAY,
            ApiError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Input(MoodSignalError::Validation(msg)) => msg.clone(),
            ApiError::Persistence(_) => "Database operation failed".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, Json(serde_json::json!({"error": self.message()}))).into_response()
    }
}
