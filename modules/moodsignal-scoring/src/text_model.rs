use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, ScoringError};
use crate::normalizer::FeatureMatrix;

pub const TEXT_MODEL_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-post confidence model. Takes an `(n, 100)` token matrix and returns
/// `n` confidences.
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn predict(&self, matrix: &FeatureMatrix) -> Result<Vec<f64>>;
}

/// Mean per-post confidence. An empty matrix is an error, never a score.
pub async fn text_score(model: &dyn TextModel, matrix: &FeatureMatrix) -> Result<f64> {
    if matrix.is_empty() {
        return Err(ScoringError::EmptyNormalization);
    }

    let predictions = model.predict(matrix).await?;
    if predictions.len() != matrix.row_count() {
        return Err(ScoringError::Model(format!(
            "expected {} predictions, got {}",
            matrix.row_count(),
            predictions.len()
        )));
    }
    if let Some(bad) = predictions.iter().find(|p| !(0.0..=1.0).contains(*p)) {
        return Err(ScoringError::Model(format!("prediction out of range: {bad}")));
    }

    Ok(predictions.iter().sum::<f64>() / predictions.len() as f64)
}

// ---------------------------------------------------------------------------
// TensorFlow Serving REST
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct PredictRequest<'a> {
    instances: &'a FeatureMatrix,
}

#[derive(Deserialize)]
struct PredictResponse {
    predictions: Vec<Vec<f64>>,
}

/// Client for a model exposed through the TensorFlow Serving REST predict API.
pub struct TfServingTextModel {
    http: reqwest::Client,
    endpoint: String,
}

impl TfServingTextModel {
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::with_timeout(endpoint, TEXT_MODEL_TIMEOUT)
    }

    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl TextModel for TfServingTextModel {
    async fn predict(&self, matrix: &FeatureMatrix) -> Result<Vec<f64>> {
        let resp = self
            .http
            .post(&self.endpoint)
            .json(&PredictRequest { instances: matrix })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Text model request failed");
            return Err(ScoringError::Model(format!("HTTP {status}: {body}")));
        }

        let body: PredictResponse = resp.json().await?;
        let predictions = body
            .predictions
            .into_iter()
            .map(|row| match row.as_slice() {
                [p] => Ok(*p),
                _ => Err(ScoringError::Model(format!(
                    "expected one output per post, got {}",
                    row.len()
                ))),
            })
            .collect::<Result<Vec<f64>>>()?;

        info!(rows = predictions.len(), "Text model predictions received");
        Ok(predictions)
    }
}
