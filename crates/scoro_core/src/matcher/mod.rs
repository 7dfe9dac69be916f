//! Positional matching over storage file names.
//!
//! # Responsibility
//! - Enumerate storage files and tokenize their stems on `_`.
//! - Select files whose tokens hit per-rank target sets (`pull`).
//!
//! # Invariants
//! - Token at 0-based position `i` is tested against the targets of rank
//!   `i + 1`; positions without a rank are ignored.
//! - Storage files are only listed, never modified.
//! - Results follow directory enumeration order.

pub mod pull;
pub mod storage;

pub use pull::{dedup_paths, match_tokens, pull, MatchPolicy, TargetsByRank};
pub use storage::{list_storage_files, stem_tokens};
