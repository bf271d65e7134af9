pub mod context;
pub mod demographic;
pub mod ensemble;
pub mod error;
pub mod normalizer;
pub mod text_model;

#[cfg(feature = "test-support")]
pub mod testing;

pub use context::ModelContext;
pub use demographic::{
    CategoricalEncoder, DemographicClassifier, DemographicFeatureBuilder, DemographicModel,
    DemographicPrediction, FeatureScaler, FeatureVector, LogisticClassifier, OneHotEncoder,
    StandardScaler,
};
pub use ensemble::EnsembleScorer;
pub use error::{Result, ScoringError};
pub use normalizer::{FeatureMatrix, TextNormalizer, MAX_LENGTH, VOCAB_SIZE};
pub use text_model::{text_score, TextModel, TfServingTextModel};
