// Browser automation: headless Chrome over WebDriver, scrolling the profile
// to load more posts. The session is quit on every exit path.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moodsignal_common::{Handle, PostBatch};
use tracing::{debug, info, warn};
use webdriver_client::{Session, WebDriverClient};

use crate::error::Result;
use crate::strategy::{profile_url, RetrievalStrategy};

pub const BROWSER_POST_SELECTOR: &str = r#"div[data-testid="tweetText"]"#;

pub const HEADLESS_ARGS: [&str; 4] = [
    "--headless",
    "--disable-gpu",
    "--no-sandbox",
    "--window-size=1920,1080",
];

const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Timing and bounds for the scroll loop.
#[derive(Debug, Clone, Copy)]
pub struct ScrollPolicy {
    /// Wait after the first navigation before reading the page.
    pub settle: Duration,
    /// Wait after each scroll for new posts to render.
    pub scroll_wait: Duration,
    pub max_scrolls: u32,
}

impl Default for ScrollPolicy {
    fn default() -> Self {
        Self {
            settle: Duration::from_secs(5),
            scroll_wait: Duration::from_secs(3),
            max_scrolls: 15,
        }
    }
}

/// Launches browser sessions.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>>;
}

/// A live browser session. `quit` consumes the session.
#[async_trait]
pub trait BrowserSession: Send {
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Text of every element currently matching `css`.
    async fn texts(&mut self, css: &str) -> Result<Vec<String>>;

    async fn scroll_to_bottom(&mut self) -> Result<()>;

    async fn quit(self: Box<Self>) -> Result<()>;
}

// --- WebDriver-backed driver ---

pub struct WebDriverBrowser {
    client: WebDriverClient,
}

impl WebDriverBrowser {
    pub fn new(webdriver_url: &str) -> Result<Self> {
        Ok(Self {
            client: WebDriverClient::new(webdriver_url)?,
        })
    }
}

#[async_trait]
impl BrowserDriver for WebDriverBrowser {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        let session = self.client.new_session(&HEADLESS_ARGS).await?;
        info!(session_id = session.id(), "browser: session launched");
        Ok(Box::new(WebDriverPage { session }))
    }
}

struct WebDriverPage {
    session: Session,
}

#[async_trait]
impl BrowserSession for WebDriverPage {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        Ok(self.session.navigate(url).await?)
    }

    async fn texts(&mut self, css: &str) -> Result<Vec<String>> {
        let elements = self.session.find_elements(css).await?;
        let mut texts = Vec::with_capacity(elements.len());
        for element in &elements {
            // Elements can go stale between lookup and read while the feed re-renders.
            match self.session.element_text(element).await {
                Ok(text) => texts.push(text),
                Err(e) => debug!(error = %e, "browser: skipping unreadable element"),
            }
        }
        Ok(texts)
    }

    async fn scroll_to_bottom(&mut self) -> Result<()> {
        self.session.execute(SCROLL_TO_BOTTOM, Vec::new()).await?;
        Ok(())
    }

    async fn quit(self: Box<Self>) -> Result<()> {
        let WebDriverPage { session } = *self;
        Ok(session.delete().await?)
    }
}

// --- Strategy ---

pub struct BrowserAutomationStrategy {
    driver: Arc<dyn BrowserDriver>,
    profile_base: String,
    policy: ScrollPolicy,
}

impl BrowserAutomationStrategy {
    pub fn new(driver: Arc<dyn BrowserDriver>, profile_base: &str) -> Self {
        Self {
            driver,
            profile_base: profile_base.to_string(),
            policy: ScrollPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ScrollPolicy) -> Self {
        self.policy = policy;
        self
    }

    async fn try_fetch(&self, handle: &Handle, max_items: usize) -> Result<PostBatch> {
        let url = profile_url(&self.profile_base, handle)?;
        let mut session = self.driver.launch().await?;

        let outcome = self.scroll_collect(session.as_mut(), url.as_str(), max_items).await;

        if let Err(e) = session.quit().await {
            warn!(handle = %handle, error = %e, "browser: session quit failed");
        }

        outcome
    }

    async fn scroll_collect(
        &self,
        session: &mut dyn BrowserSession,
        url: &str,
        max_items: usize,
    ) -> Result<PostBatch> {
        session.navigate(url).await?;
        tokio::time::sleep(self.policy.settle).await;

        let mut seen = HashSet::new();
        let mut posts = Vec::new();
        let mut attempt = 0;

        while posts.len() < max_items && attempt < self.policy.max_scrolls {
            for text in session.texts(BROWSER_POST_SELECTOR).await? {
                let text = text.trim();
                if !text.is_empty() && seen.insert(text.to_string()) {
                    posts.push(text.to_string());
                }
            }
            attempt += 1;
            info!(found = posts.len(), scrolls = attempt, "browser: collected posts");

            if posts.len() >= max_items {
                break;
            }

            session.scroll_to_bottom().await?;
            tokio::time::sleep(self.policy.scroll_wait).await;
        }

        Ok(PostBatch::new(posts).capped(max_items))
    }
}

#[async_trait]
impl RetrievalStrategy for BrowserAutomationStrategy {
    fn name(&self) -> &str {
        "browser"
    }

    async fn fetch(&self, handle: &Handle, max_items: usize) -> PostBatch {
        info!(handle = %handle, max_items, "browser: fetching posts");

        match self.try_fetch(handle, max_items).await {
            Ok(batch) => {
                info!(handle = %handle, count = batch.len(), "browser: posts found");
                batch
            }
            Err(e) => {
                warn!(handle = %handle, error = %e, "browser: fetch failed");
                PostBatch::empty()
            }
        }
    }
}
