//! Collection store lifecycle against a scripted client: retry budget,
//! timeout fallback, latest-fetch-wins arbitration, staleness, and
//! cancellation. Paused-clock tests make the 10-second deadline and the
//! 5-minute staleness window run instantly.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use guidepost::client::{ContentClient, Result as ClientResult};
use guidepost::state::{ContentItem, FetchPhase, Guide};
use guidepost::store::{CollectionStore, StoreSettings};
use tokio::time::Duration;

/// One scripted response for a `list_items` call.
enum Script {
    /// Settle after `delay` with the given result.
    Reply {
        delay: Duration,
        result: std::result::Result<Vec<ContentItem>, String>,
    },
    /// Never settle; only the store's deadline or cancellation ends it.
    Hang,
}

/// Fake record store: pops one script per `list_items` call and counts
/// attempts. An exhausted plan serves `fallback`.
struct ScriptedClient {
    plan: Mutex<VecDeque<Script>>,
    fallback: Vec<ContentItem>,
    calls: AtomicUsize,
}

impl ScriptedClient {
    fn new(plan: Vec<Script>) -> Self {
        Self {
            plan: Mutex::new(plan.into()),
            fallback: vec![item("fallback")],
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ContentClient for ScriptedClient {
    async fn list_items(&self, _resource: &str) -> ClientResult<Vec<ContentItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.plan.lock().expect("plan lock").pop_front();
        match step {
            Some(Script::Reply { delay, result }) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                result.map_err(Into::into)
            }
            Some(Script::Hang) => {
                std::future::pending::<ClientResult<Vec<ContentItem>>>().await
            }
            None => Ok(self.fallback.clone()),
        }
    }

    async fn list_categories(&self, _resource: &str) -> ClientResult<Vec<String>> {
        Ok(Vec::new())
    }

    async fn list_guides(&self) -> ClientResult<Vec<Guide>> {
        Ok(Vec::new())
    }
}

fn item(id: &str) -> ContentItem {
    ContentItem {
        id: id.to_string(),
        display_text: format!("{id} text"),
        category: "Saving".to_string(),
        tags: Vec::new(),
        linked_guide_id: None,
        created_at: Utc.timestamp_opt(1_700_000_000, 0).single().unwrap_or_default(),
    }
}

fn init_logs() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

fn ok(delay_ms: u64, ids: &[&str]) -> Script {
    Script::Reply {
        delay: Duration::from_millis(delay_ms),
        result: Ok(ids.iter().map(|id| item(id)).collect()),
    }
}

fn err(message: &str) -> Script {
    Script::Reply {
        delay: Duration::ZERO,
        result: Err(message.to_string()),
    }
}

#[tokio::test(start_paused = true)]
async fn failures_within_budget_recover_silently() {
    init_logs();
    let client = Arc::new(ScriptedClient::new(vec![
        err("connection reset"),
        err("connection reset"),
        ok(0, &["p1", "p2"]),
    ]));
    let mut store = CollectionStore::new(
        Arc::clone(&client),
        "posts-retry-recovers",
        StoreSettings::default(),
    );
    store.fetch();
    assert_eq!(*store.phase(), FetchPhase::Loading);
    assert_eq!(*store.settle().await, FetchPhase::Ready);
    // Two retries after the first failure: third attempt succeeds
    assert_eq!(client.calls(), 3);
    assert_eq!(store.items().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn budget_exhaustion_surfaces_failure_after_three_attempts() {
    let client = Arc::new(ScriptedClient::new(vec![
        err("bad gateway"),
        err("bad gateway"),
        err("bad gateway"),
        // A fourth attempt would succeed, but the budget is spent
        ok(0, &["p1"]),
    ]));
    let mut store = CollectionStore::new(
        Arc::clone(&client),
        "posts-retry-exhausted",
        StoreSettings::default(),
    );
    store.fetch();
    let phase = store.settle().await.clone();
    assert_eq!(
        phase,
        FetchPhase::Failed {
            message: "bad gateway".to_string()
        }
    );
    assert_eq!(client.calls(), 3);
    assert!(store.items().is_empty());

    // Manual retry issues a fresh request and recovers
    store.refresh();
    assert_eq!(*store.settle().await, FetchPhase::Ready);
    assert_eq!(client.calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn deadline_expiry_times_out_and_drops_the_late_response() {
    let client = Arc::new(ScriptedClient::new(vec![
        ok(20_000, &["late"]),
        ok(0, &["fresh"]),
    ]));
    let mut store = CollectionStore::new(
        Arc::clone(&client),
        "posts-timeout",
        StoreSettings::default(),
    );
    store.fetch();
    assert_eq!(*store.settle().await, FetchPhase::TimedOut);

    // The 20-second reply would land now if the request were still alive;
    // the timed-out state must not budge.
    tokio::time::sleep(Duration::from_secs(30)).await;
    store.apply_pending();
    assert_eq!(*store.phase(), FetchPhase::TimedOut);
    assert!(store.items().is_empty());

    // retry() resets the deadline and re-issues the fetch
    store.refresh();
    assert_eq!(*store.settle().await, FetchPhase::Ready);
    assert_eq!(store.items()[0].id, "fresh");
}

#[tokio::test(start_paused = true)]
async fn superseding_refresh_wins_over_the_earlier_fetch() {
    let client = Arc::new(ScriptedClient::new(vec![
        ok(5_000, &["first-request"]),
        ok(0, &["second-request"]),
    ]));
    let mut store = CollectionStore::new(
        Arc::clone(&client),
        "posts-supersede",
        StoreSettings::default(),
    );
    store.fetch();
    store.refresh();
    assert_eq!(*store.settle().await, FetchPhase::Ready);
    assert_eq!(store.items()[0].id, "second-request");

    // Let the first request finish late; its outcome must be discarded
    tokio::time::sleep(Duration::from_secs(6)).await;
    store.apply_pending();
    assert_eq!(*store.phase(), FetchPhase::Ready);
    assert_eq!(store.items()[0].id, "second-request");
}

#[tokio::test(start_paused = true)]
async fn fresh_snapshots_serve_remounts_without_refetching() {
    init_logs();
    let client = Arc::new(ScriptedClient::new(Vec::new()));
    let settings = StoreSettings::default();

    let mut first = CollectionStore::new(Arc::clone(&client), "posts-stale", settings);
    first.fetch();
    assert_eq!(*first.settle().await, FetchPhase::Ready);
    assert_eq!(client.calls(), 1);
    drop(first);

    // Remount within the window: cache, no network
    let mut second = CollectionStore::new(Arc::clone(&client), "posts-stale", settings);
    second.fetch();
    assert_eq!(*second.phase(), FetchPhase::Ready);
    assert_eq!(second.items()[0].id, "fallback");
    assert_eq!(client.calls(), 1);

    // Explicit refresh always hits the network
    second.refresh();
    assert_eq!(*second.settle().await, FetchPhase::Ready);
    assert_eq!(client.calls(), 2);

    // Externally-reported mutation: invalidate, then fetch refetches
    second.invalidate();
    second.fetch();
    assert_eq!(*second.settle().await, FetchPhase::Ready);
    assert_eq!(client.calls(), 3);

    // Past the staleness window the cache no longer answers
    tokio::time::sleep(Duration::from_secs(301)).await;
    let mut third = CollectionStore::new(Arc::clone(&client), "posts-stale", settings);
    third.fetch();
    assert_eq!(*third.phase(), FetchPhase::Loading);
    assert_eq!(*third.settle().await, FetchPhase::Ready);
    assert_eq!(client.calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_the_request_without_touching_state() {
    let client = Arc::new(ScriptedClient::new(vec![Script::Hang]));
    let mut store = CollectionStore::new(
        Arc::clone(&client),
        "posts-cancel",
        StoreSettings::default(),
    );
    store.fetch();
    assert_eq!(*store.phase(), FetchPhase::Loading);
    tokio::task::yield_now().await;
    assert_eq!(client.calls(), 1);

    store.cancel();
    // No outcome may arrive or apply after cancellation
    tokio::time::sleep(Duration::from_secs(60)).await;
    store.apply_pending();
    assert_eq!(*store.phase(), FetchPhase::Loading);
    assert!(store.items().is_empty());
}
