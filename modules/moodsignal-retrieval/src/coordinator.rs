// FallbackCoordinator: the public entry point for post retrieval.
// Strategies run in a fixed order; the first non-empty batch is final.

use std::sync::Arc;

use moodsignal_common::{Config, Handle, PostBatch};
use tracing::{info, warn};

use crate::error::Result;
use crate::strategies::{
    BrowserAutomationStrategy, DirectFetchStrategy, MirrorFetchStrategy, WebDriverBrowser,
};
use crate::strategy::RetrievalStrategy;

pub struct FallbackCoordinator {
    strategies: Vec<Arc<dyn RetrievalStrategy>>,
}

impl FallbackCoordinator {
    /// Strategies are tried in the order given.
    pub fn new(strategies: Vec<Arc<dyn RetrievalStrategy>>) -> Self {
        Self { strategies }
    }

    /// The standard chain: direct fetch, then mirrors, then a headless browser.
    pub fn from_config(config: &Config) -> Result<Self> {
        let direct = DirectFetchStrategy::new(&config.profile_base_url)?;
        let mirror = MirrorFetchStrategy::new(config.mirror_instances.clone())?;
        let browser = BrowserAutomationStrategy::new(
            Arc::new(WebDriverBrowser::new(&config.webdriver_url)?),
            &config.profile_base_url,
        );

        Ok(Self::new(vec![
            Arc::new(direct),
            Arc::new(mirror),
            Arc::new(browser),
        ]))
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Fetch up to `max_items` posts. Returns an empty batch when every
    /// strategy came back empty; deciding whether that is an error is up to
    /// the caller.
    pub async fn fetch_posts(&self, handle: &Handle, max_items: usize) -> PostBatch {
        info!(handle = %handle, max_items, "Fetching posts");

        for (position, strategy) in self.strategies.iter().enumerate() {
            info!(
                handle = %handle,
                strategy = strategy.name(),
                attempt = position + 1,
                "Trying retrieval strategy"
            );

            let batch = strategy.fetch(handle, max_items).await;
            if !batch.is_empty() {
                info!(
                    handle = %handle,
                    strategy = strategy.name(),
                    count = batch.len(),
                    "Retrieved posts"
                );
                return batch.capped(max_items);
            }

            warn!(handle = %handle, strategy = strategy.name(), "Strategy returned no posts");
        }

        warn!(handle = %handle, "All retrieval strategies exhausted");
        PostBatch::empty()
    }
}
