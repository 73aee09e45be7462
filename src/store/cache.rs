//! Process-wide snapshot cache implementing the staleness window.
//!
//! Collections are discarded with their owning view, but a view remounted
//! shortly after (back navigation, tab switches) should not refetch. The
//! cache keeps the last successful snapshot per resource so a fetch within
//! the staleness window is served from memory. Explicit refreshes bypass it
//! and overwrite the entry on arrival.

use std::num::NonZeroUsize;
use std::sync::{Mutex, OnceLock};

use lru::LruCache;
use tokio::time::{Duration, Instant};

use crate::state::ContentItem;

/// Distinct resources worth remembering concurrently.
const CACHE_CAPACITY: usize = 16;

/// One cached collection snapshot.
#[derive(Debug, Clone)]
struct Snapshot {
    /// Items as fetched, in response order.
    items: Vec<ContentItem>,
    /// When the snapshot was stored; freshness is measured from here.
    stored_at: Instant,
}

/// Shared cache handle, created on first use.
static SNAPSHOTS: OnceLock<Mutex<LruCache<String, Snapshot>>> = OnceLock::new();

fn cache() -> &'static Mutex<LruCache<String, Snapshot>> {
    SNAPSHOTS.get_or_init(|| {
        Mutex::new(LruCache::new(
            NonZeroUsize::new(CACHE_CAPACITY)
                .unwrap_or_else(|| NonZeroUsize::new(1).expect("non-zero capacity")),
        ))
    })
}

/// What: Serve a resource's snapshot when it is still fresh.
///
/// Inputs:
/// - `resource`: Resource name the snapshot was stored under.
/// - `window`: Staleness window; snapshots older than this are ignored.
///
/// Output:
/// - `Some(items)` for a snapshot younger than `window`; `None` when the
///   resource is unknown or stale.
pub(crate) fn fresh_items(resource: &str, window: Duration) -> Option<Vec<ContentItem>> {
    let mut guard = cache().lock().ok()?;
    let snap = guard.get(resource)?;
    if snap.stored_at.elapsed() < window {
        Some(snap.items.clone())
    } else {
        None
    }
}

/// What: Record a successful fetch for later remounts.
///
/// Inputs:
/// - `resource`: Resource name to key the snapshot under.
/// - `items`: Fetched collection; replaces any previous snapshot wholesale.
pub(crate) fn store_items(resource: &str, items: &[ContentItem]) {
    if let Ok(mut guard) = cache().lock() {
        guard.put(
            resource.to_string(),
            Snapshot {
                items: items.to_vec(),
                stored_at: Instant::now(),
            },
        );
    }
}

/// What: Drop a resource's snapshot.
///
/// Inputs:
/// - `resource`: Resource name to forget.
///
/// Output:
/// - The next fetch for this resource goes to the network. Called after an
///   externally-reported mutation of the underlying records.
pub(crate) fn invalidate(resource: &str) {
    if let Ok(mut guard) = cache().lock() {
        guard.pop(resource);
    }
}
