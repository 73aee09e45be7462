//! Sort engine: stable single-field ordering of filtered collections.

use std::cmp::Ordering;

use crate::state::{ContentItem, SortDirection, SortField, SortState};
use crate::util::cmp_ci;

/// What: Produce a sorted copy of a collection under the active sort state.
///
/// Inputs:
/// - `items`: Filtered collection; not mutated.
/// - `sort`: Active field and direction.
/// - `resolve_guide`: Lookup from guide id to display title, supplied by the
///   caller (usually backed by the store's guide map).
///
/// Output:
/// - New vector, totally ordered by the active comparator. Items comparing
///   equal keep their relative input order (stable sort); no implicit
///   secondary tie-break.
///
/// Details:
/// - Text fields compare lowercased lexicographically.
/// - `CreatedAt` compares by timestamp.
/// - When sorting by linked guide, an item without a resolvable guide sorts
///   with the empty string as its key (first in ascending order).
/// - Descending negates the comparator result rather than reversing the
///   ascending output, so ties keep input order in both directions.
#[must_use]
pub fn sort_items<F>(items: &[ContentItem], sort: &SortState, resolve_guide: F) -> Vec<ContentItem>
where
    F: Fn(&str) -> Option<String>,
{
    let mut out: Vec<ContentItem> = items.to_vec();
    out.sort_by(|a, b| {
        let ord = compare_by_field(a, b, sort.field, &resolve_guide);
        match sort.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    out
}

/// Ascending comparison of two items under one sort field.
fn compare_by_field<F>(a: &ContentItem, b: &ContentItem, field: SortField, resolve_guide: &F) -> Ordering
where
    F: Fn(&str) -> Option<String>,
{
    match field {
        SortField::Title => cmp_ci(&a.display_text, &b.display_text),
        SortField::LinkedGuide => {
            let ka = guide_sort_key(a, resolve_guide);
            let kb = guide_sort_key(b, resolve_guide);
            cmp_ci(&ka, &kb)
        }
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

/// Effective text key for linked-guide sorting; empty when the item has no
/// guide or the id does not resolve.
fn guide_sort_key<F>(item: &ContentItem, resolve_guide: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    item.linked_guide_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .and_then(|id| resolve_guide(id))
        .unwrap_or_default()
}
