//! Retrieval strategies in fallback priority order: direct, mirror, browser.
//! Each is strictly more expensive than the one before it.

pub mod browser;
pub mod direct;
pub mod mirror;

pub use browser::{BrowserAutomationStrategy, BrowserDriver, BrowserSession, ScrollPolicy, WebDriverBrowser};
pub use direct::DirectFetchStrategy;
pub use mirror::MirrorFetchStrategy;
