//! Core value types shared by the store, the filter/sort engines, and the
//! view layer.

use chrono::{DateTime, Utc};

/// Category filter value that matches every item.
pub const CATEGORY_ALL: &str = "All";

/// One content record in a browsable collection.
///
/// Generalizes the library's post and call-to-action records: both carry a
/// display label, a single classification string, theme tags, and an
/// optional reference to a guide.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ContentItem {
    /// Opaque identifier, unique within a collection snapshot.
    pub id: String,
    /// Primary human-readable label (post title / CTA text); search and
    /// name sorting run against this field.
    pub display_text: String,
    /// Single classification string (post category / CTA page location).
    pub category: String,
    /// Unordered theme tags; may be empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Referenced guide id, when the item links to one. Link-status
    /// filtering tests presence only, never resolvability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_guide_id: Option<String>,
    /// Creation timestamp; default sort key in date-ordered views.
    pub created_at: DateTime<Utc>,
}

impl ContentItem {
    /// What: Whether this item references a guide.
    ///
    /// Inputs: none
    ///
    /// Output: `true` when `linked_guide_id` is present and non-empty.
    #[must_use]
    pub fn is_linked(&self) -> bool {
        self.linked_guide_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

/// A guide record from the companion collection; only its title is needed
/// here, to resolve display names when sorting by linked guide.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Guide {
    /// Opaque guide identifier referenced by [`ContentItem::linked_guide_id`].
    pub id: String,
    /// Guide title shown in linked-guide columns and used for sorting.
    pub title: String,
}

/// Link-status facet over [`ContentItem::linked_guide_id`] presence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LinkStatus {
    /// No link-status constraint.
    #[default]
    All,
    /// Only items referencing a guide.
    Linked,
    /// Only items without a guide reference.
    Unlinked,
}

/// Active filter values for one view. All facets are independent predicates
/// combined conjunctively; defaults match everything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FacetState {
    /// Free-text search; empty means no constraint.
    pub search: String,
    /// Chosen category, or [`CATEGORY_ALL`] / empty for no constraint.
    pub category: String,
    /// Chosen theme tag; empty means no constraint.
    pub tag: String,
    /// Link-status constraint.
    pub link_status: LinkStatus,
}

impl Default for FacetState {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: CATEGORY_ALL.to_string(),
            tag: String::new(),
            link_status: LinkStatus::All,
        }
    }
}

/// Sortable fields for content lists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortField {
    /// Sort by [`ContentItem::display_text`].
    #[default]
    Title,
    /// Sort by the resolved title of the linked guide; items without one
    /// sort with an empty key.
    LinkedGuide,
    /// Sort by [`ContentItem::created_at`].
    CreatedAt,
}

impl SortField {
    /// Return the string key used in settings files for this sort field.
    ///
    /// Inputs: none
    ///
    /// Output: Static config key string.
    #[must_use]
    pub const fn as_config_key(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::LinkedGuide => "linked_guide",
            Self::CreatedAt => "created",
        }
    }

    /// Parse a sort field from its settings key or legacy aliases.
    ///
    /// Inputs: `s` config string (case-insensitive).
    ///
    /// Output: `Some(SortField)` on recognized value; `None` otherwise.
    #[must_use]
    pub fn from_config_key(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "title" | "name" | "text" => Some(Self::Title),
            "linked_guide" | "guide" => Some(Self::LinkedGuide),
            "created" | "created_at" | "date" => Some(Self::CreatedAt),
            _ => None,
        }
    }
}

/// Sort direction for the active field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest key first.
    #[default]
    Ascending,
    /// Largest key first.
    Descending,
}

impl SortDirection {
    /// What: The opposite direction.
    ///
    /// Inputs: none
    ///
    /// Output: `Descending` for `Ascending` and vice versa.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Active sort key and direction for one view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortState {
    /// Field currently sorted by.
    pub field: SortField,
    /// Direction applied to that field.
    pub direction: SortDirection,
}

impl SortState {
    /// What: Apply a user sort request to the current state.
    ///
    /// Inputs:
    /// - `field`: Field the user asked to sort by.
    ///
    /// Output:
    /// - Requesting the active field flips the direction; requesting a
    ///   different field activates it with `Ascending` direction.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Ascending;
        }
    }
}

/// Fetch lifecycle of a collection store.
///
/// `Idle` is only observable before the owning view mounts; `Ready` can be
/// superseded by a later `Loading` on refetch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FetchPhase {
    /// Constructed but not yet asked to fetch.
    #[default]
    Idle,
    /// A request is outstanding.
    Loading,
    /// The collection was fetched (or served from cache) successfully.
    Ready,
    /// The request failed after exhausting retries.
    Failed {
        /// Human-readable failure description for the retry affordance.
        message: String,
    },
    /// The request did not settle within the deadline; the stale request
    /// was cancelled and a manual retry restarts the full fetch.
    TimedOut,
}

/// Capability flags handed down by the auth collaborator. Carried on view
/// state for presentation gating; the filter/sort engines never consult it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Whether the current user may manage content (admin screens).
    pub manage_content: bool,
}
