//! Pure derivation of what a content list view renders.
//!
//! Maps the store's fetch phase plus the view's facet/sort state onto a
//! [`ListView`], keeping "no data at all" distinct from "nothing matches
//! the filters". No I/O, no rendering; the site shell owns the pixels.

use crate::logic::{filter_items, sort_items};
use crate::state::{ContentItem, FetchPhase, ViewState};

/// What a content list renders for one combination of fetch phase and
/// view state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListView {
    /// A request is outstanding; show a progress indicator.
    Loading,
    /// The fetch hit its deadline; show the distinct retry affordance.
    TimedOut,
    /// The fetch failed after retries; show a retry affordance.
    Failed {
        /// Failure description surfaced alongside the retry action.
        message: String,
    },
    /// The source collection is empty; neutral, not an error.
    NoData,
    /// Facets filtered every item out; distinct from [`ListView::NoData`].
    NoMatches,
    /// Filtered, sorted rows ready to render.
    Items(Vec<ContentItem>),
}

impl ListView {
    /// What: Whether this view shows a manual retry action.
    ///
    /// Inputs: none
    ///
    /// Output: `true` for the timed-out and failed views.
    #[must_use]
    pub const fn offers_retry(&self) -> bool {
        matches!(self, Self::TimedOut | Self::Failed { .. })
    }

    /// What: Short status line for the non-list views.
    ///
    /// Inputs: none
    ///
    /// Output: User-facing copy; `None` when rows are rendered instead.
    #[must_use]
    pub fn headline(&self) -> Option<&str> {
        match self {
            Self::Loading => Some("Loading the library…"),
            Self::TimedOut => {
                Some("The library is taking too long to respond. Check your connection and retry.")
            }
            Self::Failed { message } => Some(message),
            Self::NoData => Some("Nothing has been published here yet."),
            Self::NoMatches => Some("No content matches the current filters."),
            Self::Items(_) => None,
        }
    }
}

/// What: Derive the renderable view for one list.
///
/// Inputs:
/// - `phase`: Store fetch phase.
/// - `items`: Store collection snapshot.
/// - `view`: The view's facet/sort state.
/// - `resolve_guide`: Guide id to title lookup for linked-guide sorting.
///
/// Output:
/// - The matching [`ListView`]; `Idle` renders as `Loading` since the
///   owner fetches on mount.
#[must_use]
pub fn build_list_view<F>(
    phase: &FetchPhase,
    items: &[ContentItem],
    view: &ViewState,
    resolve_guide: F,
) -> ListView
where
    F: Fn(&str) -> Option<String>,
{
    match phase {
        FetchPhase::Idle | FetchPhase::Loading => ListView::Loading,
        FetchPhase::TimedOut => ListView::TimedOut,
        FetchPhase::Failed { message } => ListView::Failed {
            message: message.clone(),
        },
        FetchPhase::Ready => {
            if items.is_empty() {
                return ListView::NoData;
            }
            let filtered = filter_items(items, &view.facets);
            if filtered.is_empty() {
                return ListView::NoMatches;
            }
            ListView::Items(sort_items(&filtered, &view.sort, resolve_guide))
        }
    }
}
