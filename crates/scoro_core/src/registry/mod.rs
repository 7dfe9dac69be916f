//! Per-category tag registries and rank allocation.
//!
//! # Responsibility
//! - Own one classification dimension's tags and their checked state.
//! - Allocate unique positive ranks from the ranks currently in use.
//!
//! # Invariants
//! - Tags inside one category are unique by word after `canonicalize()`.
//! - Ranks are re-derived from live categories; there is no stored counter.

pub mod category;
pub mod rank;

pub use category::{titles_match, Category, CategorySummary};
pub use rank::next_free_rank;
