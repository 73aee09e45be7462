//! State types for the browsing core.
//!
//! Split into value types shared across the crate and the ephemeral
//! per-view state; public API preserved under `crate::state::*` via
//! re-exports.

pub mod types;
pub mod view_state;

pub use types::{
    CATEGORY_ALL, Capabilities, ContentItem, FacetState, FetchPhase, Guide, LinkStatus,
    SortDirection, SortField, SortState,
};
pub use view_state::ViewState;
