//! Facet engine: pure conjunctive filtering of content collections.

use crate::state::{CATEGORY_ALL, ContentItem, FacetState, LinkStatus};
use crate::util::contains_ci;

/// What: Test one item against every active facet (logical AND).
///
/// Inputs:
/// - `item`: Candidate content item.
/// - `facets`: Active facet values.
///
/// Output:
/// - `true` iff the item passes search, category, tag, and link-status
///   predicates individually.
///
/// Details:
/// - Search matches case-insensitively against the display text OR the
///   category string; an empty search always matches.
/// - Category compares exactly, except the all sentinel and the empty
///   string, which always match.
/// - A non-empty tag must be present in the item's tag set.
/// - Link status tests presence of the guide reference only.
#[must_use]
pub fn matches_facets(item: &ContentItem, facets: &FacetState) -> bool {
    matches_search(item, &facets.search)
        && matches_category(item, &facets.category)
        && matches_tag(item, &facets.tag)
        && matches_link_status(item, facets.link_status)
}

/// What: Apply the active facets to a collection, preserving input order.
///
/// Inputs:
/// - `items`: Collection snapshot to filter; not mutated.
/// - `facets`: Active facet values; not mutated.
///
/// Output:
/// - New vector with every item that passes all active facets, in input
///   order. An empty result is a valid result, never an error.
#[must_use]
pub fn filter_items(items: &[ContentItem], facets: &FacetState) -> Vec<ContentItem> {
    let mut filtered: Vec<ContentItem> = Vec::with_capacity(items.len());
    for it in items {
        if matches_facets(it, facets) {
            filtered.push(it.clone());
        }
    }
    filtered
}

/// Search facet: empty term matches; otherwise case-insensitive substring
/// of display text or category.
fn matches_search(item: &ContentItem, term: &str) -> bool {
    term.is_empty() || contains_ci(&item.display_text, term) || contains_ci(&item.category, term)
}

/// Category facet: the all sentinel (or empty selection) matches; anything
/// else compares exactly.
fn matches_category(item: &ContentItem, category: &str) -> bool {
    category.is_empty() || category == CATEGORY_ALL || item.category == category
}

/// Tag facet: empty selection matches; otherwise membership in the item's
/// tag set.
fn matches_tag(item: &ContentItem, tag: &str) -> bool {
    tag.is_empty() || item.tags.iter().any(|t| t == tag)
}

/// Link-status facet over presence of the guide reference.
fn matches_link_status(item: &ContentItem, status: LinkStatus) -> bool {
    match status {
        LinkStatus::All => true,
        LinkStatus::Linked => item.is_linked(),
        LinkStatus::Unlinked => !item.is_linked(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FacetState;
    use chrono::{TimeZone, Utc};

    fn item(id: &str, text: &str, category: &str, tags: &[&str], guide: Option<&str>) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            display_text: text.to_string(),
            category: category.to_string(),
            tags: tags.iter().map(ToString::to_string).collect(),
            linked_guide_id: guide.map(ToString::to_string),
            created_at: Utc.timestamp_opt(1_700_000_000, 0).single().unwrap_or_default(),
        }
    }

    fn sample() -> Vec<ContentItem> {
        vec![
            item("1", "Zebra budgeting", "Saving", &[], None),
            item("2", "Apple of investing", "Investing", &["retirement"], Some("g1")),
            item("3", "Debt snowball", "Debt", &["payoff", "retirement"], Some("g2")),
        ]
    }

    #[test]
    /// What: Unlinked filter with all other facets inactive
    ///
    /// - Input: Mixed linked/unlinked items; link status Unlinked
    /// - Output: Only the item without a guide reference remains
    fn unlinked_filter_excludes_linked_items() {
        let facets = FacetState {
            link_status: LinkStatus::Unlinked,
            ..FacetState::default()
        };
        let out = filter_items(&sample(), &facets);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "1");
    }

    #[test]
    /// What: Case-insensitive search over display text or category
    ///
    /// - Input: Search "app" then "debt"
    /// - Output: Substring of title matches id 2; category match catches id 3
    fn search_matches_text_or_category() {
        let mut facets = FacetState {
            search: "app".into(),
            ..FacetState::default()
        };
        let out = filter_items(&sample(), &facets);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "2");

        facets.search = "DEBT".into();
        let out = filter_items(&sample(), &facets);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "3");
    }

    #[test]
    /// What: Facets combine conjunctively
    ///
    /// - Input: Tag "retirement" plus link status Linked plus search "apple"
    /// - Output: Only id 2 passes all three; relaxing search admits id 3 too
    fn facets_combine_with_and() {
        let mut facets = FacetState {
            search: "apple".into(),
            tag: "retirement".into(),
            link_status: LinkStatus::Linked,
            ..FacetState::default()
        };
        let out = filter_items(&sample(), &facets);
        assert_eq!(out.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(), ["2"]);

        facets.search.clear();
        let out = filter_items(&sample(), &facets);
        assert_eq!(
            out.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(),
            ["2", "3"]
        );
    }

    #[test]
    /// What: Category sentinel and empty string both match everything
    ///
    /// - Input: Category "All", then "", then an exact category
    /// - Output: Sentinels keep all items; exact match narrows to one
    fn category_sentinel_matches_all() {
        let mut facets = FacetState::default();
        assert_eq!(filter_items(&sample(), &facets).len(), 3);

        facets.category = String::new();
        assert_eq!(filter_items(&sample(), &facets).len(), 3);

        facets.category = "Investing".into();
        let out = filter_items(&sample(), &facets);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "2");
    }

    #[test]
    /// What: Combinations yielding nothing are valid, not errors
    ///
    /// - Input: Contradictory facets and an empty collection
    /// - Output: Empty vectors in both cases
    fn empty_results_are_valid() {
        let facets = FacetState {
            search: "zebra".into(),
            link_status: LinkStatus::Linked,
            ..FacetState::default()
        };
        assert!(filter_items(&sample(), &facets).is_empty());
        assert!(filter_items(&[], &FacetState::default()).is_empty());
    }

    #[test]
    /// What: Every returned item re-passes each predicate individually
    ///
    /// - Input: A mixed facet state over the sample collection
    /// - Output: `matches_facets` holds for each returned item
    fn returned_items_satisfy_all_predicates() {
        let facets = FacetState {
            tag: "retirement".into(),
            ..FacetState::default()
        };
        let out = filter_items(&sample(), &facets);
        assert!(!out.is_empty());
        assert!(out.iter().all(|i| matches_facets(i, &facets)));
    }
}
