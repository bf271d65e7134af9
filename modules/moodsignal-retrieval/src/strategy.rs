use async_trait::async_trait;
use moodsignal_common::{Handle, PostBatch};
use url::Url;

use crate::error::{Result, RetrievalError};

/// One way of fetching recent posts for a handle.
///
/// Implementations absorb their own failures: network errors, bad statuses,
/// parse errors and driver failures are logged and turned into an empty batch.
#[async_trait]
pub trait RetrievalStrategy: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self, handle: &Handle, max_items: usize) -> PostBatch;
}

/// `{base}/{handle}` with the handle percent-encoded as a single path segment.
pub fn profile_url(base: &str, handle: &Handle) -> Result<Url> {
    let mut url = Url::parse(base).map_err(|e| RetrievalError::Url(format!("{base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| RetrievalError::Url(format!("{base}: cannot be a base URL")))?
        .pop_if_empty()
        .push(handle.as_str());
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_handle_onto_base() {
        let handle = Handle::parse("jack").unwrap();
        let url = profile_url("https://twitter.com", &handle).unwrap();
        assert_eq!(url.as_str(), "https://twitter.com/jack");

        let url = profile_url("http://mirror.example/", &handle).unwrap();
        assert_eq!(url.as_str(), "http://mirror.example/jack");
    }

    #[test]
    fn handle_cannot_escape_its_path_segment() {
        let handle = Handle::parse("../admin?x=1").unwrap();
        let url = profile_url("https://twitter.com", &handle).unwrap();
        assert_eq!(url.path(), "/..%2Fadmin%3Fx=1");
        assert!(url.query().is_none());
    }

    #[test]
    fn rejects_unparseable_base() {
        let handle = Handle::parse("jack").unwrap();
        assert!(profile_url("not a url", &handle).is_err());
    }
}
