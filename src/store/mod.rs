//! Collection store: fetch lifecycle for one view's content collection.
//!
//! The store owns the only asynchronous, side-effecting behavior in the
//! browsing core. It obtains a collection through an injected
//! [`ContentClient`], retries transient failures with backoff, enforces a
//! deadline that cancels the in-flight request, arbitrates concurrent
//! requests with monotonic ids so the newest fetch always wins, and serves
//! recent snapshots from the process-wide cache. Outcomes arrive on an
//! internal channel and are folded into [`FetchPhase`] by
//! [`CollectionStore::apply_pending`] (event-loop style) or
//! [`CollectionStore::settle`] (async style); fetch errors never propagate
//! as `Err` across this boundary.

mod cache;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, sleep, timeout};

use crate::client::{ContentClient, Result};
use crate::state::{ContentItem, FetchPhase, Guide};

/// Tunables for the fetch lifecycle, usually derived from
/// [`crate::config::Settings`].
#[derive(Clone, Copy, Debug)]
pub struct StoreSettings {
    /// Deadline for the whole attempt sequence; expiry surfaces
    /// [`FetchPhase::TimedOut`] and cancels the request.
    pub fetch_timeout: Duration,
    /// How long a successful snapshot stays fresh enough to serve a mount
    /// without a network call.
    pub staleness_window: Duration,
    /// Retries after the first failed attempt (2 retries = 3 attempts
    /// total) before surfacing [`FetchPhase::Failed`].
    pub retry_limit: u32,
    /// Base delay between attempts; grows linearly with the attempt number.
    pub retry_backoff: Duration,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(10),
            staleness_window: Duration::from_secs(300),
            retry_limit: 2,
            retry_backoff: Duration::from_millis(250),
        }
    }
}

/// Message from a fetch task back to the store.
#[derive(Debug)]
enum FetchOutcome {
    /// The request settled with a collection.
    Loaded {
        /// Request token; stale tokens are discarded.
        id: u64,
        /// Replacement collection, wholesale.
        items: Vec<ContentItem>,
    },
    /// The request failed after exhausting retries.
    Failed {
        /// Request token; stale tokens are discarded.
        id: u64,
        /// Failure description for the retry affordance.
        message: String,
    },
    /// The deadline expired before the request settled.
    TimedOut {
        /// Request token; stale tokens are discarded.
        id: u64,
    },
    /// Best-effort facet option payload; not part of the fetch state
    /// machine, so it carries no token.
    FacetOptions {
        /// Category values for the category facet, when the call succeeded.
        categories: Option<Vec<String>>,
        /// Guide records for linked-title resolution, when the call
        /// succeeded.
        guides: Option<Vec<Guide>>,
    },
}

/// Holds one view's collection together with its fetch status.
///
/// Owned by a single view; dropping the store cancels any in-flight
/// request. The client handle is injected so tests can substitute a fake.
pub struct CollectionStore<C> {
    /// Injected remote read handle.
    client: Arc<C>,
    /// Resource this store fetches (e.g. `posts`, `ctas`).
    resource: String,
    /// Lifecycle tunables.
    settings: StoreSettings,
    /// Current fetch lifecycle phase.
    phase: FetchPhase,
    /// Authoritative collection snapshot; replaced wholesale on fetch.
    items: Vec<ContentItem>,
    /// Category options for the category facet.
    categories: Vec<String>,
    /// Guide id to title, for linked-guide display and sorting.
    guides: HashMap<String, String>,
    /// Next request token to hand out.
    next_request_id: u64,
    /// Token of the only request whose outcome is authoritative.
    latest_request_id: u64,
    /// Sender cloned into fetch tasks.
    outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
    /// Receiver drained by `apply_pending`/`settle`.
    outcome_rx: mpsc::UnboundedReceiver<FetchOutcome>,
    /// Handle of the outstanding fetch task, if any.
    in_flight: Option<JoinHandle<()>>,
}

impl<C: ContentClient + 'static> CollectionStore<C> {
    /// What: Build a store for one resource.
    ///
    /// Inputs:
    /// - `client`: Shared remote read handle.
    /// - `resource`: Resource name used for fetching and cache keying.
    /// - `settings`: Lifecycle tunables.
    ///
    /// Output:
    /// - Store in [`FetchPhase::Idle`]; the owning view calls
    ///   [`Self::fetch`] on mount.
    #[must_use]
    pub fn new(client: Arc<C>, resource: impl Into<String>, settings: StoreSettings) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            client,
            resource: resource.into(),
            settings,
            phase: FetchPhase::Idle,
            items: Vec::new(),
            categories: Vec::new(),
            guides: HashMap::new(),
            next_request_id: 0,
            latest_request_id: 0,
            outcome_tx,
            outcome_rx,
            in_flight: None,
        }
    }

    /// Current fetch lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> &FetchPhase {
        &self.phase
    }

    /// Collection snapshot in fetch order; filter and sort are the
    /// engines' job.
    #[must_use]
    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    /// Category options loaded for the category facet.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Resource this store was built for.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// What: Resolve a guide id to its display title.
    ///
    /// Inputs:
    /// - `id`: Guide id from [`ContentItem::linked_guide_id`].
    ///
    /// Output:
    /// - `Some(title)` when the companion collection knows the id; `None`
    ///   for dangling references. Shaped to plug into
    ///   [`crate::logic::sort_items`] as the resolver.
    #[must_use]
    pub fn guide_title(&self, id: &str) -> Option<String> {
        self.guides.get(id).cloned()
    }

    /// What: Mount-time load.
    ///
    /// Inputs: none
    ///
    /// Output:
    /// - Serves a fresh cached snapshot without touching the network when
    ///   one exists; otherwise issues a request and enters
    ///   [`FetchPhase::Loading`].
    pub fn fetch(&mut self) {
        if let Some(items) = cache::fresh_items(&self.resource, self.settings.staleness_window) {
            tracing::debug!(
                resource = %self.resource,
                count = items.len(),
                "serving cached snapshot"
            );
            self.items = items;
            self.phase = FetchPhase::Ready;
            return;
        }
        self.start_request();
    }

    /// What: Explicit retry/refresh.
    ///
    /// Inputs: none
    ///
    /// Output:
    /// - Always issues a new network request regardless of snapshot
    ///   freshness; this is the retry action for [`FetchPhase::Failed`]
    ///   and [`FetchPhase::TimedOut`], and it resets the deadline.
    pub fn refresh(&mut self) {
        self.start_request();
    }

    /// What: Abort the in-flight request without touching state.
    ///
    /// Inputs: none
    ///
    /// Output:
    /// - The task is aborted and its token poisoned, so even an
    ///   already-queued outcome cannot mutate the store. The phase is left
    ///   exactly as it was. Dropping the store does the same implicitly.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        // Poison the token: nothing outstanding can match it anymore.
        self.latest_request_id = self.next_request_id;
        self.next_request_id += 1;
        tracing::debug!(resource = %self.resource, "fetch cancelled");
    }

    /// What: Drop this resource's cached snapshot.
    ///
    /// Inputs: none
    ///
    /// Output:
    /// - The next [`Self::fetch`] goes to the network. Call after an
    ///   externally-reported mutation of the underlying records.
    pub fn invalidate(&self) {
        cache::invalidate(&self.resource);
    }

    /// What: Kick off a best-effort load of facet options.
    ///
    /// Inputs: none
    ///
    /// Output:
    /// - Fetches the category list and the guide collection in the
    ///   background. Failures are logged and leave previous options in
    ///   place; this never affects the fetch state machine.
    pub fn load_facet_options(&self) {
        let client = Arc::clone(&self.client);
        let resource = self.resource.clone();
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let (cats, guides) =
                tokio::join!(client.list_categories(&resource), client.list_guides());
            let categories = match cats {
                Ok(c) => Some(c),
                Err(e) => {
                    tracing::warn!(resource = %resource, error = %e, "category list unavailable");
                    None
                }
            };
            let guides = match guides {
                Ok(g) => Some(g),
                Err(e) => {
                    tracing::warn!(error = %e, "guide list unavailable");
                    None
                }
            };
            let _ = tx.send(FetchOutcome::FacetOptions { categories, guides });
        });
    }

    /// What: Fold any queued fetch outcomes into state without blocking.
    ///
    /// Inputs: none
    ///
    /// Output:
    /// - Applies every outcome currently in the channel; stale tokens are
    ///   discarded. Intended for event-loop ticks.
    pub fn apply_pending(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.apply(outcome);
        }
    }

    /// What: Await the outcome of the current request.
    ///
    /// Inputs: none
    ///
    /// Output:
    /// - Resolves once the store leaves [`FetchPhase::Loading`], applying
    ///   outcomes (and discarding stale ones) as they arrive. Returns the
    ///   settled phase. Resolves immediately when nothing is loading; do
    ///   not call after [`Self::cancel`] while a request was outstanding,
    ///   since no outcome will ever match.
    pub async fn settle(&mut self) -> &FetchPhase {
        while self.phase == FetchPhase::Loading {
            let Some(outcome) = self.outcome_rx.recv().await else {
                break;
            };
            self.apply(outcome);
        }
        &self.phase
    }

    /// Issue a new request: fresh token, `Loading` phase, spawned task
    /// running the retrying fetch under the deadline.
    fn start_request(&mut self) {
        let id = self.next_request_id;
        self.next_request_id += 1;
        self.latest_request_id = id;
        self.phase = FetchPhase::Loading;

        let client = Arc::clone(&self.client);
        let resource = self.resource.clone();
        let tx = self.outcome_tx.clone();
        let deadline = self.settings.fetch_timeout;
        let retry_limit = self.settings.retry_limit;
        let backoff = self.settings.retry_backoff;
        tracing::info!(resource = %resource, request = id, "fetching collection");
        self.in_flight = Some(tokio::spawn(async move {
            match timeout(
                deadline,
                fetch_with_retries(client.as_ref(), &resource, retry_limit, backoff),
            )
            .await
            {
                Ok(Ok(items)) => {
                    let _ = tx.send(FetchOutcome::Loaded { id, items });
                }
                Ok(Err(e)) => {
                    tracing::warn!(resource = %resource, request = id, error = %e, "collection fetch failed");
                    let _ = tx.send(FetchOutcome::Failed {
                        id,
                        message: e.to_string(),
                    });
                }
                Err(_) => {
                    // The inner future is dropped here, which aborts the
                    // underlying request; no late response can arrive.
                    tracing::warn!(resource = %resource, request = id, "collection fetch timed out");
                    let _ = tx.send(FetchOutcome::TimedOut { id });
                }
            }
        }));
    }

    /// Fold one outcome into state, discarding stale tokens.
    fn apply(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Loaded { id, items } if id == self.latest_request_id => {
                tracing::info!(
                    resource = %self.resource,
                    request = id,
                    count = items.len(),
                    "collection loaded"
                );
                cache::store_items(&self.resource, &items);
                self.items = items;
                self.phase = FetchPhase::Ready;
                self.in_flight = None;
            }
            FetchOutcome::Failed { id, message } if id == self.latest_request_id => {
                self.phase = FetchPhase::Failed { message };
                self.in_flight = None;
            }
            FetchOutcome::TimedOut { id } if id == self.latest_request_id => {
                self.phase = FetchPhase::TimedOut;
                self.in_flight = None;
            }
            FetchOutcome::FacetOptions { categories, guides } => {
                if let Some(c) = categories {
                    self.categories = c;
                }
                if let Some(g) = guides {
                    self.guides = g.into_iter().map(|g| (g.id, g.title)).collect();
                }
            }
            FetchOutcome::Loaded { id, .. }
            | FetchOutcome::Failed { id, .. }
            | FetchOutcome::TimedOut { id } => {
                tracing::debug!(
                    resource = %self.resource,
                    request = id,
                    latest = self.latest_request_id,
                    "discarding stale fetch outcome"
                );
            }
        }
    }
}

impl<C> Drop for CollectionStore<C> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

/// What: Run the remote listing with bounded retries and linear backoff.
///
/// Inputs:
/// - `client`: Remote read handle.
/// - `resource`: Resource to list.
/// - `retry_limit`: Retries after the first failure.
/// - `backoff`: Base delay; attempt `n` waits `backoff * n`.
///
/// Output:
/// - First successful item list, or the last error once the budget is
///   spent.
async fn fetch_with_retries<C: ContentClient>(
    client: &C,
    resource: &str,
    retry_limit: u32,
    backoff: Duration,
) -> Result<Vec<ContentItem>> {
    let mut attempt: u32 = 0;
    loop {
        match client.list_items(resource).await {
            Ok(items) => return Ok(items),
            Err(e) if attempt < retry_limit => {
                attempt += 1;
                tracing::warn!(
                    resource = %resource,
                    attempt,
                    error = %e,
                    "collection fetch attempt failed; retrying"
                );
                sleep(backoff * attempt).await;
            }
            Err(e) => return Err(e),
        }
    }
}
