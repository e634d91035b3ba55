//! Tree search entry points.
//!
//! # Responsibility
//! - Expose the display filter used by the sidebar during type-as-you-search.
//! - Keep search result shaping inside core.

pub mod filter;
