//! Ledger files: the durable projection of one category's tag set.
//!
//! # Responsibility
//! - Encode/decode the line-oriented ledger format.
//! - Own the `<title>_<rank>.<ext>` file naming pattern.
//!
//! # Invariants
//! - One tag per line; a leading `;` marks a handled tag.
//! - A missing ledger file is an empty tag set, never an error.

pub mod codec;
pub mod naming;

pub use codec::{decode, decode_str, encode, encode_str, CHECKED_SENTINEL};
pub use naming::{LedgerName, LedgerNaming, DEFAULT_LEDGER_EXTENSION};
