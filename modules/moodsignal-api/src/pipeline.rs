// Request orchestration: retrieval → normalization → text model → store,
// questionnaire → demographic model → store, and the final blend.

use std::sync::Arc;

use moodsignal_common::{Handle, Label, MoodSignalError, Questionnaire, Verdict};
use moodsignal_retrieval::FallbackCoordinator;
use moodsignal_scoring::{text_score, DemographicPrediction, ModelContext};
use moodsignal_store::Store;
use serde_json::Value;
use tracing::info;

use crate::error::ApiError;

/// Outcome of a text analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub handle: Handle,
    pub label: Label,
    /// Mean per-post confidence.
    pub confidence: f64,
    pub posts_analyzed: usize,
}

pub struct AnalysisPipeline {
    coordinator: FallbackCoordinator,
    models: Arc<ModelContext>,
    store: Store,
    default_max_items: usize,
}

impl AnalysisPipeline {
    pub fn new(
        coordinator: FallbackCoordinator,
        models: Arc<ModelContext>,
        store: Store,
        default_max_items: usize,
    ) -> Self {
        Self {
            coordinator,
            models,
            store,
            default_max_items,
        }
    }

    /// Fetch, normalize and score recent posts, then persist the text score.
    pub async fn analyze(
        &self,
        handle: &Handle,
        max_items: Option<usize>,
    ) -> Result<Analysis, ApiError> {
        let max_items = max_items.unwrap_or(self.default_max_items);
        if max_items == 0 {
            return Err(MoodSignalError::Validation("max_items must be at least 1".into()).into());
        }

        let posts = self.coordinator.fetch_posts(handle, max_items).await;
        if posts.is_empty() {
            return Err(ApiError::AllStrategiesExhausted(handle.to_string()));
        }

        let matrix = self.models.normalizer.normalize(&posts);
        let confidence = text_score(self.models.text_model.as_ref(), &matrix).await?;

        self.store.upsert_text_score(handle, confidence).await?;

        let label = Label::from_score(confidence);
        info!(
            handle = %handle,
            confidence,
            label = %label,
            rows = matrix.row_count(),
            "Text analysis complete"
        );

        Ok(Analysis {
            handle: handle.clone(),
            label,
            confidence,
            posts_analyzed: matrix.row_count(),
        })
    }

    /// Validate and score a questionnaire, then replace the stored record.
    pub async fn submit_demographics(
        &self,
        handle: &Handle,
        body: &Value,
    ) -> Result<DemographicPrediction, ApiError> {
        let questionnaire = Questionnaire::from_json(body)?;
        let prediction = self.models.demographic.predict(&questionnaire)?;

        self.store
            .upsert_demographics(handle, &questionnaire, prediction.class, prediction.score())
            .await?;

        info!(
            handle = %handle,
            class = prediction.class,
            score = prediction.score(),
            "Demographics stored"
        );
        Ok(prediction)
    }

    /// Blend the stored text score with a demographic score recomputed from
    /// the stored answers. Both records must exist.
    pub async fn final_verdict(&self, handle: &Handle) -> Result<Verdict, ApiError> {
        let text = self
            .store
            .text_score(handle)
            .await?
            .ok_or_else(|| ApiError::MissingTextScore(handle.to_string()))?;

        let demographics = self
            .store
            .demographics(handle)
            .await?
            .ok_or_else(|| ApiError::MissingDemographics(handle.to_string()))?;

        let prediction = self.models.demographic.predict(&demographics.questionnaire())?;
        let verdict = self.models.ensemble.score(text.text_score, prediction.score());

        info!(
            handle = %handle,
            weighted_score = verdict.weighted_score,
            label = %verdict.label,
            "Final verdict"
        );
        Ok(verdict)
    }
}
