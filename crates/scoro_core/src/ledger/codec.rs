//! Ledger text codec.
//!
//! # Invariants
//! - `encode` writes tags in the order given; callers canonicalize first.
//! - Every written line is `\n` terminated, so identical tag sets produce
//!   identical bytes.
//! - `decode` tolerates `\r\n` endings, blank lines, and repeated words.

use crate::error::{CatalogError, CatalogResult};
use crate::model::tag::Tag;
use std::fs;
use std::io;
use std::path::Path;

/// Leading character that marks a handled tag.
pub const CHECKED_SENTINEL: char = ';';

/// Reads one ledger file.
///
/// Duplicate words are returned as-is; registries collapse them.
///
/// # Errors
/// - Returns `CatalogError::Io` when the file exists but cannot be read.
pub fn decode(path: &Path) -> CatalogResult<Vec<Tag>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(decode_str(&content)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(CatalogError::io(path, err)),
    }
}

/// Parses ledger text into tags in line order.
pub fn decode_str(content: &str) -> Vec<Tag> {
    content
        .lines()
        .filter_map(|line| {
            let word = line.trim_start_matches(CHECKED_SENTINEL);
            if word.trim().is_empty() {
                return None;
            }
            Some(Tag::new(word, line.starts_with(CHECKED_SENTINEL)))
        })
        .collect()
}

/// Renders tags as ledger text.
pub fn encode_str(tags: &[Tag]) -> String {
    let mut out = String::new();
    for tag in tags {
        if tag.checked {
            out.push(CHECKED_SENTINEL);
        }
        out.push_str(&tag.word);
        out.push('\n');
    }
    out
}

/// Writes tags to `path`, replacing any previous content.
///
/// Content goes to a sibling `<name>.tmp` first and is renamed over the
/// ledger, so readers see either the old or the new content.
///
/// # Errors
/// - Returns `CatalogError::Io` when the temp file cannot be written or renamed.
pub fn encode(path: &Path, tags: &[Tag]) -> CatalogResult<()> {
    let temp_name = match path.file_name() {
        Some(name) => format!("{}.tmp", name.to_string_lossy()),
        None => "ledger.tmp".to_string(),
    };
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, encode_str(tags)).map_err(|err| CatalogError::io(&temp_path, err))?;
    fs::rename(&temp_path, path).map_err(|err| CatalogError::io(path, err))?;
    Ok(())
}
