// Test doubles and fixtures for scoring.
//
// - FixedTextModel (TextModel): same confidence for every row, counts calls
// - FailingTextModel (TextModel): always errors
// - fixture_demographic_model(): small fitted model with a known score
//   (0.75 when suicidal_thoughts is "Yes", 0.5 otherwise)

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::demographic::{
    DemographicFeatureBuilder, DemographicModel, LogisticClassifier, OneHotEncoder,
    StandardScaler, CLASSIFIER_FILE, ENCODER_FILE, SCALER_FILE,
};
use crate::error::{Result, ScoringError};
use crate::normalizer::FeatureMatrix;
use crate::text_model::TextModel;

// ---------------------------------------------------------------------------
// Text models
// ---------------------------------------------------------------------------

pub struct FixedTextModel {
    confidence: f64,
    calls: AtomicUsize,
}

impl FixedTextModel {
    pub fn new(confidence: f64) -> Self {
        Self {
            confidence,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextModel for FixedTextModel {
    async fn predict(&self, matrix: &FeatureMatrix) -> Result<Vec<f64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![self.confidence; matrix.row_count()])
    }
}

pub struct FailingTextModel;

#[async_trait]
impl TextModel for FailingTextModel {
    async fn predict(&self, _matrix: &FeatureMatrix) -> Result<Vec<f64>> {
        Err(ScoringError::Model("model server unavailable".into()))
    }
}

// ---------------------------------------------------------------------------
// Demographic fixture
// ---------------------------------------------------------------------------

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub fn fixture_encoder() -> OneHotEncoder {
    OneHotEncoder::new(vec![
        strings(&["Female", "Male"]),
        strings(&["Engineer", "Student", "Teacher"]),
        strings(&["5-6 hours", "7-8 hours", "Less than 5 hours", "More than 8 hours"]),
        strings(&["Healthy", "Moderate", "Unhealthy"]),
        strings(&["BSc", "MSc", "PhD"]),
        strings(&["No", "Yes"]),
        strings(&["No", "Yes"]),
    ])
    .expect("fixture encoder is valid")
}

/// 7 numeric + 19 one-hot columns.
pub const FIXTURE_WIDTH: usize = 26;

/// Column of `suicidal_thoughts = "Yes"` in the fixture layout.
const SUICIDAL_YES: usize = 7 + 2 + 3 + 4 + 3 + 3 + 1;

pub fn fixture_scaler() -> StandardScaler {
    StandardScaler::new(vec![0.0; FIXTURE_WIDTH], vec![1.0; FIXTURE_WIDTH])
        .expect("fixture scaler is valid")
}

pub fn fixture_classifier() -> LogisticClassifier {
    let mut coefficients = vec![0.0; FIXTURE_WIDTH];
    coefficients[SUICIDAL_YES] = 3.0_f64.ln();
    LogisticClassifier::new(coefficients, 0.0)
}

pub fn fixture_demographic_model() -> DemographicModel {
    let builder =
        DemographicFeatureBuilder::new(Arc::new(fixture_encoder()), Arc::new(fixture_scaler()))
            .expect("fixture builder is valid");
    DemographicModel::new(builder, Arc::new(fixture_classifier()))
        .expect("fixture model is valid")
}

/// Write the fixture artifacts as JSON into `dir`.
pub fn write_fixture_artifacts(dir: &Path) {
    let write = |file: &str, value: Value| {
        std::fs::write(dir.join(file), value.to_string()).expect("write fixture artifact");
    };
    write(ENCODER_FILE, json!(fixture_encoder()));
    write(SCALER_FILE, json!(fixture_scaler()));
    write(CLASSIFIER_FILE, json!(fixture_classifier()));
}

/// A complete questionnaire body accepted by the fixture encoder.
pub fn sample_questionnaire_json(username: &str, suicidal_thoughts: &str) -> Value {
    json!({
        "username": username,
        "age": 24,
        "gender": "Female",
        "profession": "Student",
        "academic_pressure": 4,
        "work_pressure": 0,
        "study_satisfaction": 2,
        "job_satisfaction": 0,
        "sleep_duration": "5-6 hours",
        "dietary_habits": "Moderate",
        "degree": "BSc",
        "suicidal_thoughts": suicidal_thoughts,
        "work_study_hours": 8,
        "financial_stress": 3,
        "family_history": "No"
    })
}
