#![allow(dead_code)]

use std::sync::Arc;

use moodsignal_api::{AnalysisPipeline, AppState};
use moodsignal_retrieval::testing::{call_log, CallLog, MockStrategy};
use moodsignal_retrieval::{FallbackCoordinator, RetrievalStrategy};
use moodsignal_scoring::testing::{fixture_demographic_model, FixedTextModel};
use moodsignal_scoring::{DemographicModel, ModelContext, TextModel};
use moodsignal_store::Store;
use tempfile::TempDir;

pub const DEFAULT_MAX_ITEMS: usize = 100;

pub struct Harness {
    pub dir: TempDir,
    pub log: CallLog,
    pub state: Arc<AppState>,
}

impl Harness {
    pub fn store(&self) -> Store {
        Store::new(self.dir.path().join("moodsignal.db"))
    }
}

/// A single "direct" strategy returning `posts`, scored by `text_model`.
pub async fn harness(posts: &[&str], text_model: Arc<dyn TextModel>) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let log = call_log();
    let strategies: Vec<Arc<dyn RetrievalStrategy>> =
        vec![Arc::new(MockStrategy::returning("direct", posts, &log))];

    let store = Store::new(dir.path().join("moodsignal.db"));
    store.migrate().await.unwrap();

    let state = state_for(store, strategies, text_model, fixture_demographic_model());
    Harness { dir, log, state }
}

pub async fn default_harness() -> Harness {
    harness(
        &["Can't sleep again, everything feels heavy", "Skipped class today"],
        Arc::new(FixedTextModel::new(0.8)),
    )
    .await
}

pub fn state_for(
    store: Store,
    strategies: Vec<Arc<dyn RetrievalStrategy>>,
    text_model: Arc<dyn TextModel>,
    demographic: DemographicModel,
) -> Arc<AppState> {
    let models = Arc::new(ModelContext::new(text_model, demographic));
    Arc::new(AppState {
        pipeline: AnalysisPipeline::new(
            FallbackCoordinator::new(strategies),
            models,
            store,
            DEFAULT_MAX_ITEMS,
        ),
    })
}
