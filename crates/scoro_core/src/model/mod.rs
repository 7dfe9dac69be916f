//! Domain model for the positional-tag catalog.
//!
//! # Responsibility
//! - Define the tag record shared by ledgers, registries, and the matcher.
//! - Define argument shapes used at the catalog boundary.
//!
//! # Invariants
//! - A tag word is never empty.
//! - `checked == true` means handled; pending tags are the targets of a pull.

pub mod tag;
