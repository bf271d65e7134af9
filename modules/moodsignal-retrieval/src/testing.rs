// Test mocks for retrieval.
//
// - MockStrategy (RetrievalStrategy): canned posts, shared call log
// - MockBrowser (BrowserDriver): scripted scroll pages, failure injection,
//   launch/quit/scroll counters

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use moodsignal_common::{Handle, PostBatch};

use crate::error::{Result, RetrievalError};
use crate::strategies::{BrowserDriver, BrowserSession};
use crate::strategy::RetrievalStrategy;

/// Shared record of which strategies ran, in call order.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

// ---------------------------------------------------------------------------
// MockStrategy
// ---------------------------------------------------------------------------

pub struct MockStrategy {
    name: String,
    posts: Vec<String>,
    log: CallLog,
}

impl MockStrategy {
    pub fn returning(name: &str, posts: &[&str], log: &CallLog) -> Self {
        Self {
            name: name.to_string(),
            posts: posts.iter().map(|p| p.to_string()).collect(),
            log: log.clone(),
        }
    }

    pub fn empty(name: &str, log: &CallLog) -> Self {
        Self::returning(name, &[], log)
    }
}

#[async_trait]
impl RetrievalStrategy for MockStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, _handle: &Handle, max_items: usize) -> PostBatch {
        self.log.lock().unwrap().push(self.name.clone());
        PostBatch::new(self.posts.clone()).capped(max_items)
    }
}

// ---------------------------------------------------------------------------
// MockBrowser
// ---------------------------------------------------------------------------

/// Where a scripted browser session should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Launch,
    Navigate,
    /// Fail reading posts on the given (1-based) read.
    Read(usize),
    /// Fail on the given (1-based) scroll.
    Scroll(usize),
}

#[derive(Default)]
pub struct BrowserCounters {
    pub launches: AtomicUsize,
    pub quits: AtomicUsize,
    pub reads: AtomicUsize,
    pub scrolls: AtomicUsize,
}

impl BrowserCounters {
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
    pub fn quits(&self) -> usize {
        self.quits.load(Ordering::SeqCst)
    }
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
    pub fn scrolls(&self) -> usize {
        self.scrolls.load(Ordering::SeqCst)
    }
}

/// Each entry in `pages` is what the n-th read returns; the last entry
/// repeats once the script runs out.
pub struct MockBrowser {
    pages: Vec<Vec<String>>,
    fail_at: Option<FailAt>,
    counters: Arc<BrowserCounters>,
}

impl MockBrowser {
    pub fn new(pages: Vec<Vec<&str>>) -> Self {
        Self {
            pages: pages
                .into_iter()
                .map(|page| page.into_iter().map(String::from).collect())
                .collect(),
            fail_at: None,
            counters: Arc::new(BrowserCounters::default()),
        }
    }

    pub fn failing_at(mut self, fail_at: FailAt) -> Self {
        self.fail_at = Some(fail_at);
        self
    }

    pub fn counters(&self) -> Arc<BrowserCounters> {
        self.counters.clone()
    }
}

#[async_trait]
impl BrowserDriver for MockBrowser {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        if self.fail_at == Some(FailAt::Launch) {
            return Err(RetrievalError::Browser("chromedriver not reachable".into()));
        }
        self.counters.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockSession {
            pages: self.pages.clone(),
            fail_at: self.fail_at,
            counters: self.counters.clone(),
        }))
    }
}

struct MockSession {
    pages: Vec<Vec<String>>,
    fail_at: Option<FailAt>,
    counters: Arc<BrowserCounters>,
}

#[async_trait]
impl BrowserSession for MockSession {
    async fn navigate(&mut self, _url: &str) -> Result<()> {
        if self.fail_at == Some(FailAt::Navigate) {
            return Err(RetrievalError::Browser("navigation timed out".into()));
        }
        Ok(())
    }

    async fn texts(&mut self, _css: &str) -> Result<Vec<String>> {
        let read = self.counters.reads.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_at == Some(FailAt::Read(read)) {
            return Err(RetrievalError::Browser("stale element reference".into()));
        }
        let index = (read - 1).min(self.pages.len().saturating_sub(1));
        Ok(self.pages.get(index).cloned().unwrap_or_default())
    }

    async fn scroll_to_bottom(&mut self) -> Result<()> {
        let scroll = self.counters.scrolls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_at == Some(FailAt::Scroll(scroll)) {
            return Err(RetrievalError::Browser("javascript error".into()));
        }
        Ok(())
    }

    async fn quit(self: Box<Self>) -> Result<()> {
        self.counters.quits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
