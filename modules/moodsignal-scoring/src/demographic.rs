// Questionnaire → scaled feature vector → demographic classifier.
//
// The encoder, scaler and classifier are fitted offline and exported as JSON:
//
//   encoder.json     {"categories": [[...], ...]}   one list per categorical field
//   scaler.json      {"mean": [...], "scale": [...]}
//   classifier.json  {"coefficients": [...], "intercept": f}

use std::path::Path;
use std::sync::Arc;

use moodsignal_common::questionnaire::{CATEGORICAL_FIELDS, NUMERIC_FIELDS};
use moodsignal_common::{MoodSignalError, Questionnaire};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Result, ScoringError};

pub const ENCODER_FILE: &str = "encoder.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const CLASSIFIER_FILE: &str = "classifier.json";

// ---------------------------------------------------------------------------
// Boundary traits
// ---------------------------------------------------------------------------

/// Fitted encoder for the categorical answers, in [`CATEGORICAL_FIELDS`] order.
pub trait CategoricalEncoder: Send + Sync {
    /// Number of output columns.
    fn width(&self) -> usize;

    fn encode(&self, values: &[&str; 7]) -> Result<Vec<f64>>;
}

pub trait FeatureScaler: Send + Sync {
    fn width(&self) -> usize;

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>>;
}

pub trait DemographicClassifier: Send + Sync {
    fn width(&self) -> usize;

    fn predict(&self, features: &FeatureVector) -> Result<DemographicPrediction>;
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Scaled features ready for the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DemographicPrediction {
    /// 1 when the positive class is more likely.
    pub class: u8,
    /// `[negative, positive]`
    pub probabilities: [f64; 2],
}

impl DemographicPrediction {
    /// Positive-class probability; this is the demographic score.
    pub fn score(&self) -> f64 {
        self.probabilities[1]
    }

    /// Positive-class probability as a percentage, rounded to two decimals.
    pub fn confidence_percentage(&self) -> f64 {
        (self.probabilities[1] * 100.0 * 100.0).round() / 100.0
    }
}

// ---------------------------------------------------------------------------
// OneHotEncoder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    categories: Vec<Vec<String>>,
}

impl OneHotEncoder {
    pub fn new(categories: Vec<Vec<String>>) -> Result<Self> {
        let encoder = Self { categories };
        encoder.validate()?;
        Ok(encoder)
    }

    fn validate(&self) -> Result<()> {
        if self.categories.len() != CATEGORICAL_FIELDS.len() {
            return Err(ScoringError::Artifact(format!(
                "encoder has {} category lists, expected {}",
                self.categories.len(),
                CATEGORICAL_FIELDS.len()
            )));
        }
        if let Some(i) = self.categories.iter().position(|c| c.is_empty()) {
            return Err(ScoringError::Artifact(format!(
                "encoder has no categories for {}",
                CATEGORICAL_FIELDS[i]
            )));
        }
        Ok(())
    }
}

impl CategoricalEncoder for OneHotEncoder {
    fn width(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }

    fn encode(&self, values: &[&str; 7]) -> Result<Vec<f64>> {
        let mut encoded = Vec::with_capacity(self.width());

        for ((field, value), known) in CATEGORICAL_FIELDS.iter().zip(values).zip(&self.categories) {
            let hit = known.iter().position(|k| k == value).ok_or_else(|| {
                MoodSignalError::invalid(field, format!("unknown category {value:?}"))
            })?;
            encoded.extend((0..known.len()).map(|i| if i == hit { 1.0 } else { 0.0 }));
        }

        Ok(encoded)
    }
}

// ---------------------------------------------------------------------------
// StandardScaler
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        let scaler = Self { mean, scale };
        scaler.validate()?;
        Ok(scaler)
    }

    fn validate(&self) -> Result<()> {
        if self.mean.len() != self.scale.len() {
            return Err(ScoringError::Artifact(format!(
                "scaler mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            )));
        }
        Ok(())
    }
}

impl FeatureScaler for StandardScaler {
    fn width(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.mean.len() {
            return Err(ScoringError::Dimension {
                expected: self.mean.len(),
                got: features.len(),
            });
        }

        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                // Constant columns were fitted with zero variance.
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// LogisticClassifier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticClassifier {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LogisticClassifier {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }
}

impl DemographicClassifier for LogisticClassifier {
    fn width(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, features: &FeatureVector) -> Result<DemographicPrediction> {
        if features.len() != self.coefficients.len() {
            return Err(ScoringError::Dimension {
                expected: self.coefficients.len(),
                got: features.len(),
            });
        }

        let z: f64 = self.intercept
            + features
                .values()
                .iter()
                .zip(&self.coefficients)
                .map(|(x, w)| x * w)
                .sum::<f64>();
        let p = 1.0 / (1.0 + (-z).exp());

        Ok(DemographicPrediction {
            class: u8::from(p > 0.5),
            probabilities: [1.0 - p, p],
        })
    }
}

// ---------------------------------------------------------------------------
// DemographicFeatureBuilder
// ---------------------------------------------------------------------------

/// Numeric fields followed by the encoded categorical fields, then scaled.
#[derive(Clone)]
pub struct DemographicFeatureBuilder {
    encoder: Arc<dyn CategoricalEncoder>,
    scaler: Arc<dyn FeatureScaler>,
}

impl DemographicFeatureBuilder {
    pub fn new(encoder: Arc<dyn CategoricalEncoder>, scaler: Arc<dyn FeatureScaler>) -> Result<Self> {
        let expected = NUMERIC_FIELDS.len() + encoder.width();
        if scaler.width() != expected {
            return Err(ScoringError::Artifact(format!(
                "scaler expects {} features but numeric + encoded fields give {expected}",
                scaler.width()
            )));
        }
        Ok(Self { encoder, scaler })
    }

    /// Unscaled features: numeric prefix, then one-hot columns.
    pub fn raw_features(&self, questionnaire: &Questionnaire) -> Result<Vec<f64>> {
        let encoded = self.encoder.encode(&questionnaire.categorical_values())?;
        let mut features = questionnaire.numeric_features().to_vec();
        features.extend(encoded);
        Ok(features)
    }

    pub fn build(&self, questionnaire: &Questionnaire) -> Result<FeatureVector> {
        let raw = self.raw_features(questionnaire)?;
        let scaled = self.scaler.transform(&raw)?;
        debug!(features = scaled.len(), "Built demographic features");
        Ok(FeatureVector(scaled))
    }

    /// Coerce a submitted JSON object, then build.
    pub fn build_from_json(&self, body: &Value) -> Result<FeatureVector> {
        let questionnaire = Questionnaire::from_json(body)?;
        self.build(&questionnaire)
    }

    pub fn width(&self) -> usize {
        self.scaler.width()
    }
}

// ---------------------------------------------------------------------------
// DemographicModel
// ---------------------------------------------------------------------------

/// Feature builder plus classifier, loaded once at startup.
#[derive(Clone)]
pub struct DemographicModel {
    builder: DemographicFeatureBuilder,
    classifier: Arc<dyn DemographicClassifier>,
}

impl DemographicModel {
    pub fn new(
        builder: DemographicFeatureBuilder,
        classifier: Arc<dyn DemographicClassifier>,
    ) -> Result<Self> {
        if classifier.width() != builder.width() {
            return Err(ScoringError::Artifact(format!(
                "classifier expects {} features but the builder produces {}",
                classifier.width(),
                builder.width()
            )));
        }
        Ok(Self {
            builder,
            classifier,
        })
    }

    /// Load `encoder.json`, `scaler.json` and `classifier.json` from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let encoder: OneHotEncoder = read_artifact(&dir.join(ENCODER_FILE))?;
        encoder.validate()?;
        let scaler: StandardScaler = read_artifact(&dir.join(SCALER_FILE))?;
        scaler.validate()?;
        let classifier: LogisticClassifier = read_artifact(&dir.join(CLASSIFIER_FILE))?;

        let builder = DemographicFeatureBuilder::new(Arc::new(encoder), Arc::new(scaler))?;
        let model = Self::new(builder, Arc::new(classifier))?;

        info!(dir = %dir.display(), features = model.builder.width(), "Loaded demographic model");
        Ok(model)
    }

    pub fn builder(&self) -> &DemographicFeatureBuilder {
        &self.builder
    }

    pub fn predict(&self, questionnaire: &Questionnaire) -> Result<DemographicPrediction> {
        let features = self.builder.build(questionnaire)?;
        self.classifier.predict(&features)
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ScoringError::Artifact(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&raw).map_err(|e| ScoringError::Artifact(format!("{}: {e}", path.display())))
}
