// Direct fetch: one timed GET of the public profile page, parsed with
// several selectors from most to least specific.

use std::time::Duration;

use async_trait::async_trait;
use moodsignal_common::{Handle, PostBatch};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::StatusCode;
use tracing::{info, warn};

use crate::error::{Result, RetrievalError};
use crate::extract::collect_across_selectors;
use crate::strategy::{profile_url, RetrievalStrategy};

pub const DIRECT_TIMEOUT: Duration = Duration::from_secs(15);

pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36";

/// Most specific first.
pub const PROFILE_SELECTORS: [&str; 3] = [
    r#"div[data-testid="tweetText"]"#,
    r#"article div[lang="en"] span"#,
    r#"div[data-testid="tweet"] div[lang="en"]"#,
];

pub struct DirectFetchStrategy {
    client: reqwest::Client,
    profile_base: String,
}

impl DirectFetchStrategy {
    pub fn new(profile_base: &str) -> Result<Self> {
        Self::with_timeout(profile_base, DIRECT_TIMEOUT)
    }

    pub fn with_timeout(profile_base: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(DESKTOP_USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            profile_base: profile_base.to_string(),
        })
    }

    async fn try_fetch(&self, handle: &Handle, max_items: usize) -> Result<PostBatch> {
        let url = profile_url(&self.profile_base, handle)?;
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        info!(handle = %handle, status = status.as_u16(), "direct: profile response");
        if status != StatusCode::OK {
            return Err(RetrievalError::Status(status.as_u16()));
        }

        let html = resp.text().await?;
        Ok(collect_across_selectors(&html, &PROFILE_SELECTORS, max_items))
    }
}

#[async_trait]
impl RetrievalStrategy for DirectFetchStrategy {
    fn name(&self) -> &str {
        "direct"
    }

    async fn fetch(&self, handle: &Handle, max_items: usize) -> PostBatch {
        info!(handle = %handle, max_items, "direct: fetching profile page");

        match self.try_fetch(handle, max_items).await {
            Ok(batch) => {
                info!(handle = %handle, count = batch.len(), "direct: posts found");
                batch
            }
            Err(e) => {
                warn!(handle = %handle, error = %e, "direct: fetch failed");
                PostBatch::empty()
            }
        }
    }
}
