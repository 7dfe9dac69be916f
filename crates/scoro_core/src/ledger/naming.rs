//! Ledger file naming: `<title>_<rank>.<ext>`.

use crate::error::{CatalogError, CatalogResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Extension used when configuration does not name one.
pub const DEFAULT_LEDGER_EXTENSION: &str = "lst";

static DEFAULT_LEDGER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&ledger_pattern(DEFAULT_LEDGER_EXTENSION)).expect("valid ledger name regex")
});

/// Parsed ledger file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerName {
    pub title: String,
    pub rank: u32,
}

/// Formats and recognizes ledger file names for one extension.
#[derive(Debug, Clone)]
pub struct LedgerNaming {
    extension: String,
    pattern: Regex,
}

impl LedgerNaming {
    /// Builds naming rules for `extension` (without the leading dot).
    ///
    /// # Errors
    /// - Returns `CatalogError::Config` for an empty extension or one that
    ///   contains `.` or a path separator.
    pub fn new(extension: &str) -> CatalogResult<Self> {
        let extension = extension.trim();
        if extension.is_empty() {
            return Err(CatalogError::Config(
                "ledger extension cannot be empty".to_string(),
            ));
        }
        if extension.contains(['.', '/', '\\']) {
            return Err(CatalogError::Config(format!(
                "ledger extension `{extension}` must not contain `.` or path separators"
            )));
        }

        let pattern = if extension == DEFAULT_LEDGER_EXTENSION {
            DEFAULT_LEDGER_RE.clone()
        } else {
            Regex::new(&ledger_pattern(extension))
                .map_err(|err| CatalogError::Config(format!("ledger extension pattern: {err}")))?
        };

        Ok(Self {
            extension: extension.to_string(),
            pattern,
        })
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn file_name(&self, title: &str, rank: u32) -> String {
        format!("{title}_{rank}.{}", self.extension)
    }

    pub fn path_in(&self, dir: &Path, title: &str, rank: u32) -> PathBuf {
        dir.join(self.file_name(title, rank))
    }

    /// Parses a bare file name. Returns `None` for anything that is not a
    /// ledger: wrong extension, empty title, zero or non-numeric rank.
    pub fn parse(&self, file_name: &str) -> Option<LedgerName> {
        let caps = self.pattern.captures(file_name)?;
        let rank = caps.name("rank")?.as_str().parse::<u32>().ok()?;
        if rank == 0 {
            return None;
        }
        Some(LedgerName {
            title: caps.name("title")?.as_str().to_string(),
            rank,
        })
    }
}

impl Default for LedgerNaming {
    fn default() -> Self {
        Self {
            extension: DEFAULT_LEDGER_EXTENSION.to_string(),
            pattern: DEFAULT_LEDGER_RE.clone(),
        }
    }
}

fn ledger_pattern(extension: &str) -> String {
    format!(
        r"^(?P<title>[^_/\\]+)_(?P<rank>[0-9]+)\.{}$",
        regex::escape(extension)
    )
}
