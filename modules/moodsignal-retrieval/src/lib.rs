pub mod coordinator;
pub mod error;
pub mod extract;
pub mod strategies;
pub mod strategy;

#[cfg(feature = "test-support")]
pub mod testing;

pub use coordinator::FallbackCoordinator;
pub use error::{Result, RetrievalError};
pub use strategies::{
    BrowserAutomationStrategy, BrowserDriver, BrowserSession, DirectFetchStrategy,
    MirrorFetchStrategy, ScrollPolicy, WebDriverBrowser,
};
pub use strategy::{profile_url, RetrievalStrategy};
