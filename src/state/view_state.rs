//! Ephemeral per-view state: facets, sort, and capabilities.
//!
//! A [`ViewState`] is created with default values when a view mounts, is
//! mutated only by direct user interaction, and is discarded on navigation.
//! It is never persisted.

use crate::state::types::{Capabilities, FacetState, LinkStatus, SortField, SortState};

/// Filter and sort state owned by one consuming view.
#[derive(Clone, Debug, Default)]
pub struct ViewState {
    /// Active facet values.
    pub facets: FacetState,
    /// Active sort field and direction.
    pub sort: SortState,
    /// Capability flags from the auth collaborator.
    pub capabilities: Capabilities,
}

impl ViewState {
    /// What: Build view state with a configured default sort field.
    ///
    /// Inputs:
    /// - `default_sort`: Field active when the view mounts.
    /// - `capabilities`: Flags handed down by the auth collaborator.
    ///
    /// Output:
    /// - Fresh state with default facets and ascending sort on `default_sort`.
    #[must_use]
    pub fn new(default_sort: SortField, capabilities: Capabilities) -> Self {
        Self {
            facets: FacetState::default(),
            sort: SortState {
                field: default_sort,
                direction: crate::state::types::SortDirection::Ascending,
            },
            capabilities,
        }
    }

    /// What: Handle a user sort request, applying the toggle rule.
    ///
    /// Inputs:
    /// - `field`: Requested sort field.
    ///
    /// Output:
    /// - Same field flips direction; a new field becomes active ascending.
    pub fn request_sort(&mut self, field: SortField) {
        self.sort.toggle(field);
    }

    /// What: Reset every facet to its match-all default.
    ///
    /// Inputs: none
    ///
    /// Output:
    /// - Search and tag cleared, category back to the all sentinel,
    ///   link status back to `All`. Sort state is left untouched.
    pub fn clear_facets(&mut self) {
        self.facets = FacetState::default();
    }

    /// What: Whether any facet currently constrains the collection.
    ///
    /// Inputs: none
    ///
    /// Output:
    /// - `true` when at least one facet would exclude some item shape.
    #[must_use]
    pub fn has_active_facets(&self) -> bool {
        let f = &self.facets;
        !f.search.is_empty()
            || !(f.category.is_empty() || f.category == crate::state::types::CATEGORY_ALL)
            || !f.tag.is_empty()
            || f.link_status != LinkStatus::All
    }
}
