// Mirror fetch: read-only front-ends tried in configured order. The first
// mirror yielding posts wins; results are never merged across mirrors.

use std::time::Duration;

use async_trait::async_trait;
use moodsignal_common::{Handle, PostBatch};
use reqwest::StatusCode;
use tracing::{info, warn};

use crate::error::{Result, RetrievalError};
use crate::extract::collect_with_selector;
use crate::strategy::{profile_url, RetrievalStrategy};

pub const MIRROR_TIMEOUT: Duration = Duration::from_secs(10);

pub const MIRROR_POST_SELECTOR: &str = "div.tweet-content";

pub struct MirrorFetchStrategy {
    client: reqwest::Client,
    mirrors: Vec<String>,
}

impl MirrorFetchStrategy {
    pub fn new(mirrors: Vec<String>) -> Result<Self> {
        Self::with_timeout(mirrors, MIRROR_TIMEOUT)
    }

    pub fn with_timeout(mirrors: Vec<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, mirrors })
    }

    pub fn mirrors(&self) -> &[String] {
        &self.mirrors
    }

    async fn try_mirror(&self, mirror: &str, handle: &Handle, max_items: usize) -> Result<PostBatch> {
        let url = profile_url(mirror, handle)?;
        info!(mirror = %mirror, url = %url, "mirror: trying instance");

        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if status != StatusCode::OK {
            return Err(RetrievalError::Status(status.as_u16()));
        }

        let html = resp.text().await?;
        collect_with_selector(&html, MIRROR_POST_SELECTOR, max_items)
    }
}

#[async_trait]
impl RetrievalStrategy for MirrorFetchStrategy {
    fn name(&self) -> &str {
        "mirror"
    }

    async fn fetch(&self, handle: &Handle, max_items: usize) -> PostBatch {
        info!(handle = %handle, mirrors = self.mirrors.len(), "mirror: fetching posts");

        for mirror in &self.mirrors {
            match self.try_mirror(mirror, handle, max_items).await {
                Ok(batch) if !batch.is_empty() => {
                    info!(mirror = %mirror, count = batch.len(), "mirror: posts found");
                    return batch;
                }
                Ok(_) => info!(mirror = %mirror, "mirror: no posts on instance"),
                Err(e) => warn!(mirror = %mirror, error = %e, "mirror: instance failed"),
            }
        }

        warn!(handle = %handle, "mirror: all instances failed");
        PostBatch::empty()
    }
}
