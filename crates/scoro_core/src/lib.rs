//! Core logic for Scoro, a positional-tag catalog over a flat file directory.
//! This crate is the single source of truth for catalog invariants.

pub mod catalog;
pub mod config;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod matcher;
pub mod model;
pub mod registry;

pub use catalog::{Catalog, ReconcileReport};
pub use config::CatalogConfig;
pub use error::{CatalogError, CatalogResult};
pub use ledger::{LedgerName, LedgerNaming, CHECKED_SENTINEL, DEFAULT_LEDGER_EXTENSION};
pub use logging::{default_log_level, init_logging, logging_status};
pub use matcher::{dedup_paths, MatchPolicy, TargetsByRank};
pub use model::tag::{Tag, TagFilter, Titles};
pub use registry::{next_free_rank, Category, CategorySummary};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
