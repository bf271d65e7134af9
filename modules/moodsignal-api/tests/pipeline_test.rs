//! AnalysisPipeline against mock strategies, fixture models and a temp store.

mod common;

use std::sync::Arc;

use moodsignal_api::ApiError;
use moodsignal_common::{Handle, Label, MoodSignalError};
use moodsignal_retrieval::testing::{call_log, MockStrategy};
use moodsignal_retrieval::RetrievalStrategy;
use moodsignal_scoring::testing::{
    fixture_demographic_model, fixture_encoder, fixture_scaler, sample_questionnaire_json,
    FixedTextModel, FIXTURE_WIDTH,
};
use moodsignal_scoring::{DemographicFeatureBuilder, DemographicModel, LogisticClassifier};

use common::{default_harness, harness, state_for};

fn handle(name: &str) -> Handle {
    Handle::parse(name).unwrap()
}

#[tokio::test]
async fn analyze_persists_text_score() {
    let h = default_harness().await;
    let alice = handle("alice");

    let analysis = h.state.pipeline.analyze(&alice, None).await.unwrap();

    assert_eq!(analysis.label, Label::Depressed);
    assert_eq!(analysis.posts_analyzed, 2);
    let stored = h.store().text_score(&alice).await.unwrap().unwrap();
    assert_eq!(stored.text_score, analysis.confidence);
}

#[tokio::test]
async fn reanalysis_overwrites_previous_score() {
    let h = default_harness().await;
    let alice = handle("alice");
    h.state.pipeline.analyze(&alice, None).await.unwrap();

    let log = call_log();
    let strategies: Vec<Arc<dyn RetrievalStrategy>> =
        vec![Arc::new(MockStrategy::returning("direct", &["fine today"], &log))];
    let second = state_for(
        h.store(),
        strategies,
        Arc::new(FixedTextModel::new(0.1)),
        fixture_demographic_model(),
    );
    let analysis = second.pipeline.analyze(&alice, None).await.unwrap();

    assert_eq!(analysis.label, Label::NotDepressed);
    let stored = h.store().text_score(&alice).await.unwrap().unwrap();
    assert!((stored.text_score - 0.1).abs() < 1e-12);
    assert_eq!(h.store().counts().await.unwrap(), (1, 0));
}

#[tokio::test]
async fn zero_max_items_rejected_before_retrieval() {
    let h = default_harness().await;

    let err = h
        .state
        .pipeline
        .analyze(&handle("alice"), Some(0))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Input(MoodSignalError::Validation(_))));
    assert!(h.log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn max_items_caps_posts_scored() {
    let model = Arc::new(FixedTextModel::new(0.3));
    let h = harness(&["one", "two", "three", "four"], model.clone()).await;

    let analysis = h
        .state
        .pipeline
        .analyze(&handle("alice"), Some(3))
        .await
        .unwrap();

    assert_eq!(analysis.posts_analyzed, 3);
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn exhausted_retrieval_does_not_touch_the_model_or_store() {
    let model = Arc::new(FixedTextModel::new(0.9));
    let h = harness(&[], model.clone()).await;
    let ghost = handle("ghost");

    let err = h.state.pipeline.analyze(&ghost, None).await.unwrap_err();

    assert!(matches!(err, ApiError::AllStrategiesExhausted(_)));
    assert_eq!(model.calls(), 0);
    assert!(h.store().text_score(&ghost).await.unwrap().is_none());
}

#[tokio::test]
async fn empty_normalization_is_an_error_not_a_score() {
    let model = Arc::new(FixedTextModel::new(0.9));
    let h = harness(&["???", "!!"], model.clone()).await;
    let alice = handle("alice");

    let err = h.state.pipeline.analyze(&alice, None).await.unwrap_err();

    assert!(matches!(err, ApiError::EmptyNormalization));
    assert_eq!(model.calls(), 0);
    assert!(h.store().text_score(&alice).await.unwrap().is_none());
}

#[tokio::test]
async fn invalid_questionnaire_is_not_stored() {
    let h = default_harness().await;
    let alice = handle("alice");
    let mut body = sample_questionnaire_json("alice", "Yes");
    body["sleep_duration"] = serde_json::json!("forever");

    let err = h
        .state
        .pipeline
        .submit_demographics(&alice, &body)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApiError::Input(MoodSignalError::InvalidField { ref field, .. }) if field == "sleep_duration"
    ));
    assert!(h.store().demographics(&alice).await.unwrap().is_none());
}

#[tokio::test]
async fn boundary_verdict_is_not_depressed() {
    let h = harness(&["steady week"], Arc::new(FixedTextModel::new(0.5))).await;
    let bob = handle("bob");

    h.state.pipeline.analyze(&bob, None).await.unwrap();
    h.state
        .pipeline
        .submit_demographics(&bob, &sample_questionnaire_json("bob", "No"))
        .await
        .unwrap();
    let verdict = h.state.pipeline.final_verdict(&bob).await.unwrap();

    assert_eq!(verdict.weighted_score, 0.5);
    assert_eq!(verdict.label, Label::NotDepressed);
}

#[tokio::test]
async fn verdict_recomputes_demographic_score_from_stored_answers() {
    let h = default_harness().await;
    let alice = handle("alice");

    h.state.pipeline.analyze(&alice, None).await.unwrap();
    let submitted = h
        .state
        .pipeline
        .submit_demographics(&alice, &sample_questionnaire_json("alice", "Yes"))
        .await
        .unwrap();
    assert!((submitted.score() - 0.75).abs() < 1e-9);

    // Same store, a classifier that ignores every feature.
    let builder =
        DemographicFeatureBuilder::new(Arc::new(fixture_encoder()), Arc::new(fixture_scaler()))
            .unwrap();
    let flat = DemographicModel::new(
        builder,
        Arc::new(LogisticClassifier::new(vec![0.0; FIXTURE_WIDTH], 0.0)),
    )
    .unwrap();
    let log = call_log();
    let strategies: Vec<Arc<dyn RetrievalStrategy>> =
        vec![Arc::new(MockStrategy::empty("direct", &log))];
    let retrained = state_for(
        h.store(),
        strategies,
        Arc::new(FixedTextModel::new(0.8)),
        flat,
    );

    let verdict = retrained.pipeline.final_verdict(&alice).await.unwrap();

    assert!((verdict.demographic_score - 0.5).abs() < 1e-12);
    assert!((verdict.weighted_score - 0.68).abs() < 1e-9);
    assert_eq!(verdict.label, Label::Depressed);
    assert!(log.lock().unwrap().is_empty());
}
