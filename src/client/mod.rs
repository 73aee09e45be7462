//! Remote read boundary for the external record store.
//!
//! The store never talks to the network directly; it goes through a
//! [`ContentClient`] handle injected at construction, so tests can
//! substitute a scripted fake. [`HttpContentClient`] is the production
//! implementation against the record store's REST surface. Cancellation is
//! dropping the returned future.

use serde_json::Value;

use crate::state::{ContentItem, Guide};
use crate::util::{arrs, ss, ts_of};

/// Result alias for remote calls; failures are surfaced as store state, so
/// a boxed error with a readable message is all callers need.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Read-only access to the external record store.
///
/// Implementations must be cheap to share behind an `Arc` and safe to call
/// from spawned tasks; the returned futures are `Send` so the store can run
/// them under its own deadline.
pub trait ContentClient: Send + Sync {
    /// List the content records of one resource (e.g. posts or CTAs).
    fn list_items(
        &self,
        resource: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ContentItem>>> + Send;

    /// List the category values available for one resource.
    fn list_categories(
        &self,
        resource: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;

    /// List the companion guide collection used to resolve linked titles.
    fn list_guides(&self) -> impl std::future::Future<Output = Result<Vec<Guide>>> + Send;
}

/// Server-side ordering hint sent with record listings. Purely a courtesy
/// to the backend; authoritative ordering comes from the sort engine.
const DEFAULT_ORDER: &str = "-created";

/// HTTP implementation of [`ContentClient`] against the record store.
#[derive(Clone, Debug)]
pub struct HttpContentClient {
    /// Shared connection pool.
    http: reqwest::Client,
    /// Record store base URL without a trailing slash.
    base_url: String,
}

impl HttpContentClient {
    /// What: Build a client for a record store base URL.
    ///
    /// Inputs:
    /// - `base_url`: Root of the record store API; trailing slashes are
    ///   stripped.
    ///
    /// Output:
    /// - Client with a fresh connection pool.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base.trim_end_matches('/').to_string(),
        }
    }

    /// GET a URL and parse the body as JSON, turning HTTP error statuses
    /// into readable failures.
    async fn get_json(&self, url: &str) -> Result<Value> {
        tracing::debug!(url = %url, "record store request");
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(format!("record store returned {status} for {url}").into());
        }
        Ok(resp.json::<Value>().await?)
    }
}

impl ContentClient for HttpContentClient {
    async fn list_items(&self, resource: &str) -> Result<Vec<ContentItem>> {
        let url = format!(
            "{}/collections/{resource}/records?sort={DEFAULT_ORDER}",
            self.base_url
        );
        let v = self.get_json(&url).await?;
        Ok(parse_items(&v))
    }

    async fn list_categories(&self, resource: &str) -> Result<Vec<String>> {
        let url = format!("{}/collections/{resource}/categories", self.base_url);
        let v = self.get_json(&url).await?;
        Ok(parse_categories(&v))
    }

    async fn list_guides(&self) -> Result<Vec<Guide>> {
        let url = format!("{}/collections/guides/records", self.base_url);
        let v = self.get_json(&url).await?;
        Ok(parse_guides(&v))
    }
}

/// Records may arrive as a bare array or wrapped in an `items`/`records`
/// envelope depending on the endpoint.
fn record_array(v: &Value) -> &[Value] {
    if let Some(arr) = v.as_array() {
        return arr;
    }
    for key in ["items", "records"] {
        if let Some(arr) = v.get(key).and_then(Value::as_array) {
            return arr;
        }
    }
    &[]
}

/// What: Normalize loosely-shaped content records into [`ContentItem`]s.
///
/// Inputs:
/// - `v`: Response body; bare array or `items`/`records` envelope.
///
/// Output:
/// - Items in response order. Records without an id or display text are
///   skipped; post-shaped (`title`/`category`) and CTA-shaped
///   (`text`/`page_location`/`guide_id`) records both normalize.
pub(crate) fn parse_items(v: &Value) -> Vec<ContentItem> {
    let mut items = Vec::new();
    for rec in record_array(v) {
        let Some(id) = ss(rec, &["id", "_id"]).filter(|s| !s.is_empty()) else {
            continue;
        };
        let Some(display_text) = ss(rec, &["title", "text", "name"]).filter(|s| !s.is_empty())
        else {
            continue;
        };
        let linked_guide_id =
            ss(rec, &["guide_id", "linked_guide_id", "guide"]).filter(|s| !s.is_empty());
        items.push(ContentItem {
            id,
            display_text,
            category: ss(rec, &["category", "page_location", "location"]).unwrap_or_default(),
            tags: arrs(rec, &["tags", "themes"]),
            linked_guide_id,
            created_at: ts_of(rec, &["created", "created_at", "createdAt"]).unwrap_or_default(),
        });
    }
    items
}

/// Normalize guide records, keeping only resolvable id/title pairs.
pub(crate) fn parse_guides(v: &Value) -> Vec<Guide> {
    let mut guides = Vec::new();
    for rec in record_array(v) {
        let Some(id) = ss(rec, &["id", "_id"]).filter(|s| !s.is_empty()) else {
            continue;
        };
        let Some(title) = ss(rec, &["title", "name"]).filter(|s| !s.is_empty()) else {
            continue;
        };
        guides.push(Guide { id, title });
    }
    guides
}

/// Normalize a category listing; accepts plain strings or `{name}` objects.
pub(crate) fn parse_categories(v: &Value) -> Vec<String> {
    record_array(v)
        .iter()
        .filter_map(|e| {
            e.as_str()
                .map(ToOwned::to_owned)
                .or_else(|| ss(e, &["name", "category"]))
        })
        .filter(|c| !c.is_empty())
        .collect()
}
