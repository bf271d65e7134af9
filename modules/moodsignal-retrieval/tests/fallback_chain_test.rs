//! Fallback ordering of the coordinator, driven entirely by mocks.

use std::sync::Arc;
use std::time::Duration;

use moodsignal_common::Handle;
use moodsignal_retrieval::testing::{call_log, MockBrowser, MockStrategy};
use moodsignal_retrieval::{BrowserAutomationStrategy, FallbackCoordinator, ScrollPolicy};

fn handle() -> Handle {
    Handle::parse("someone").unwrap()
}

fn instant_policy() -> ScrollPolicy {
    ScrollPolicy {
        settle: Duration::ZERO,
        scroll_wait: Duration::ZERO,
        max_scrolls: 15,
    }
}

#[tokio::test]
async fn first_non_empty_strategy_short_circuits() {
    let log = call_log();
    let coordinator = FallbackCoordinator::new(vec![
        Arc::new(MockStrategy::returning("direct", &["a", "b", "c"], &log)),
        Arc::new(MockStrategy::returning("mirror", &["x"], &log)),
        Arc::new(MockStrategy::returning("browser", &["y"], &log)),
    ]);

    let batch = coordinator.fetch_posts(&handle(), 100).await;

    assert_eq!(batch.posts(), &["a", "b", "c"]);
    assert_eq!(*log.lock().unwrap(), vec!["direct"]);
}

#[tokio::test]
async fn under_filled_batch_is_still_final() {
    let log = call_log();
    let coordinator = FallbackCoordinator::new(vec![
        Arc::new(MockStrategy::returning("direct", &["only one"], &log)),
        Arc::new(MockStrategy::returning("mirror", &["m1", "m2", "m3"], &log)),
    ]);

    let batch = coordinator.fetch_posts(&handle(), 50).await;

    assert_eq!(batch.len(), 1);
    assert_eq!(*log.lock().unwrap(), vec!["direct"]);
}

#[tokio::test]
async fn falls_through_in_priority_order() {
    let log = call_log();
    let coordinator = FallbackCoordinator::new(vec![
        Arc::new(MockStrategy::empty("direct", &log)),
        Arc::new(MockStrategy::returning("mirror", &["from mirror"], &log)),
        Arc::new(MockStrategy::returning("browser", &["from browser"], &log)),
    ]);

    let batch = coordinator.fetch_posts(&handle(), 100).await;

    assert_eq!(batch.posts(), &["from mirror"]);
    assert_eq!(*log.lock().unwrap(), vec!["direct", "mirror"]);
}

#[tokio::test]
async fn browser_result_returned_when_cheaper_strategies_fail() {
    let log = call_log();
    let browser = MockBrowser::new(vec![vec!["p1", "p2", "p1", "p3"], vec!["p3", "p4", "p5"]]);
    let counters = browser.counters();
    let coordinator = FallbackCoordinator::new(vec![
        Arc::new(MockStrategy::empty("direct", &log)),
        Arc::new(MockStrategy::empty("mirror", &log)),
        Arc::new(
            BrowserAutomationStrategy::new(Arc::new(browser), "https://twitter.com")
                .with_policy(instant_policy()),
        ),
    ]);

    let batch = coordinator.fetch_posts(&handle(), 5).await;

    assert_eq!(batch.posts(), &["p1", "p2", "p3", "p4", "p5"]);
    assert_eq!(*log.lock().unwrap(), vec!["direct", "mirror"]);
    assert_eq!(counters.quits(), 1);
}

#[tokio::test]
async fn all_empty_yields_empty_batch() {
    let log = call_log();
    let coordinator = FallbackCoordinator::new(vec![
        Arc::new(MockStrategy::empty("direct", &log)),
        Arc::new(MockStrategy::empty("mirror", &log)),
        Arc::new(MockStrategy::empty("browser", &log)),
    ]);

    let batch = coordinator.fetch_posts(&handle(), 100).await;

    assert!(batch.is_empty());
    assert_eq!(*log.lock().unwrap(), vec!["direct", "mirror", "browser"]);
}

#[tokio::test]
async fn result_is_capped_at_max_items() {
    let log = call_log();
    let coordinator = FallbackCoordinator::new(vec![Arc::new(MockStrategy::returning(
        "direct",
        &["1", "2", "3", "4"],
        &log,
    ))]);

    let batch = coordinator.fetch_posts(&handle(), 2).await;
    assert_eq!(batch.posts(), &["1", "2"]);
}
