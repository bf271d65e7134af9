use std::sync::Arc;

use moodsignal_common::Config;
use tracing::info;

use crate::demographic::DemographicModel;
use crate::ensemble::EnsembleScorer;
use crate::error::Result;
use crate::normalizer::TextNormalizer;
use crate::text_model::{TextModel, TfServingTextModel};

/// Everything scoring needs, built once at startup and shared read-only.
#[derive(Clone)]
pub struct ModelContext {
    pub normalizer: TextNormalizer,
    pub text_model: Arc<dyn TextModel>,
    pub demographic: DemographicModel,
    pub ensemble: EnsembleScorer,
}

impl ModelContext {
    pub fn new(text_model: Arc<dyn TextModel>, demographic: DemographicModel) -> Self {
        Self {
            normalizer: TextNormalizer::new(),
            text_model,
            demographic,
            ensemble: EnsembleScorer::new(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let text_model = TfServingTextModel::new(&config.text_model_url)?;
        let demographic = DemographicModel::load(&config.demographic_model_dir)?;
        info!(text_model_url = %config.text_model_url, "Model context ready");
        Ok(Self::new(Arc::new(text_model), demographic))
    }
}
