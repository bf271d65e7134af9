// HTML → post text extraction shared by the HTTP strategies.

use moodsignal_common::PostBatch;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::error::{Result, RetrievalError};

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| RetrievalError::Selector {
        selector: selector.to_string(),
        reason: format!("{e:?}"),
    })
}

/// Text of an element with each text node trimmed and joined by a single space.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn select_texts(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect()
}

/// Try each selector in order (most specific first), accumulating matches
/// until `max_items` is reached or the selectors run out.
pub fn collect_across_selectors(html: &str, selectors: &[&str], max_items: usize) -> PostBatch {
    let document = Html::parse_document(html);
    let mut posts = Vec::new();

    for raw in selectors {
        let selector = match parse_selector(raw) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "Skipping selector");
                continue;
            }
        };

        let found = select_texts(&document, &selector);
        debug!(selector = raw, count = found.len(), "Selector matched");
        posts.extend(found);

        if posts.len() >= max_items {
            break;
        }
    }

    PostBatch::new(posts).capped(max_items)
}

/// All matches of a single selector, capped at `max_items`.
pub fn collect_with_selector(html: &str, selector: &str, max_items: usize) -> Result<PostBatch> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(html);
    Ok(PostBatch::new(select_texts(&document, &selector)).capped(max_items))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE_HTML: &str = r#"
        <html><body>
          <div data-testid="tweetText"><span>first</span> <span>post</span></div>
          <div data-testid="tweetText">second post</div>
          <article><div lang="en"><span>third from article</span></div></article>
          <div data-testid="tweetText">   </div>
        </body></html>
    "#;

    #[test]
    fn accumulates_across_selectors_in_order() {
        let batch = collect_across_selectors(
            PROFILE_HTML,
            &[r#"div[data-testid="tweetText"]"#, r#"article div[lang="en"] span"#],
            10,
        );
        assert_eq!(
            batch.posts(),
            &["first post", "second post", "third from article"]
        );
    }

    #[test]
    fn stops_once_cap_reached() {
        let batch = collect_across_selectors(
            PROFILE_HTML,
            &[r#"div[data-testid="tweetText"]"#, r#"article div[lang="en"] span"#],
            2,
        );
        assert_eq!(batch.posts(), &["first post", "second post"]);
    }

    #[test]
    fn no_matches_is_empty() {
        let batch = collect_across_selectors("<html><p>nothing</p></html>", &["div.tweet"], 5);
        assert!(batch.is_empty());
    }

    #[test]
    fn bad_selector_is_skipped() {
        let batch = collect_across_selectors(PROFILE_HTML, &["div[[", "article span"], 5);
        assert_eq!(batch.posts(), &["third from article"]);
    }

    #[test]
    fn single_selector_extraction() {
        let html = r#"<div class="tweet-content media-body">a</div><div class="tweet-content">b</div>"#;
        let batch = collect_with_selector(html, "div.tweet-content", 10).unwrap();
        assert_eq!(batch.posts(), &["a", "b"]);
    }
}
