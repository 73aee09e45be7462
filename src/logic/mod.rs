//! Pure filter and sort engines for content collections.
//!
//! Both engines are pure functions of their inputs: they own no state,
//! never suspend, and never fail for well-typed input. The store supplies
//! the collection, the view supplies facet and sort state.

pub mod filter;
pub mod sort;

pub use filter::{filter_items, matches_facets};
pub use sort::sort_items;
