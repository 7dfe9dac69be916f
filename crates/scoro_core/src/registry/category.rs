//! Category (tag registry) for one classification dimension.
//!
//! # Responsibility
//! - Hold the known tags of one category with their checked state.
//! - Load from and save to the category's ledger file.
//! - Provide canonical (sorted, de-duplicated) order for display and
//!   persistence.
//!
//! # Invariants
//! - `add` is idempotent by word; a repeated word never changes state.
//! - Canonical order is ascending by word; among repeated words the first
//!   occurrence is kept.
//! - `clear` reaches disk immediately; every other mutation waits for `save`.

use crate::error::{CatalogError, CatalogResult};
use crate::ledger;
use crate::model::tag::{Tag, TagFilter};
use log::debug;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// Read model handed to display collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub title: String,
    pub rank: u32,
    /// Words in canonical order.
    pub words: Vec<String>,
    pub count: usize,
}

/// One classification dimension backed by a ledger file.
#[derive(Debug, Clone)]
pub struct Category {
    title: String,
    rank: u32,
    ledger_path: PathBuf,
    tags: Vec<Tag>,
}

impl Category {
    /// Creates an empty category. Does not touch the file system.
    pub fn new(title: impl Into<String>, rank: u32, ledger_path: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            rank,
            ledger_path: ledger_path.into(),
            tags: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn rank(&self) -> u32 {
        self.rank
    }

    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }

    /// Tags in current order (canonical after `load`/`save`/`canonicalize`).
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Case-insensitive title comparison.
    pub fn matches_title(&self, title: &str) -> bool {
        titles_match(&self.title, title)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.tags.iter().any(|tag| tag.word == word)
    }

    /// Creates the ledger file when missing; existing content is kept.
    ///
    /// # Errors
    /// - Returns `CatalogError::Io` when the file cannot be created.
    pub fn touch(&self) -> CatalogResult<()> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.ledger_path)
            .map(|_| ())
            .map_err(|err| CatalogError::io(&self.ledger_path, err))
    }

    /// Inserts each word not already present. Returns how many were inserted.
    pub fn add<I, S>(&mut self, words: I, checked: bool) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut inserted = 0;
        for word in words {
            let word = word.as_ref();
            if word.trim().is_empty() || self.contains(word) {
                continue;
            }
            self.tags.push(Tag::new(word, checked));
            inserted += 1;
        }
        inserted
    }

    /// Marks present words handled. Returns how many tags changed state.
    pub fn check<I, S>(&mut self, words: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_checked(words, true)
    }

    /// Marks present words pending. Returns how many tags changed state.
    pub fn uncheck<I, S>(&mut self, words: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_checked(words, false)
    }

    /// Marks every tag handled.
    pub fn all_checked(&mut self) {
        for tag in &mut self.tags {
            tag.check();
        }
    }

    /// Drops every tag and truncates the ledger file right away.
    ///
    /// # Errors
    /// - Returns `CatalogError::Io` when the ledger cannot be truncated.
    pub fn clear(&mut self) -> CatalogResult<()> {
        self.tags.clear();
        fs::write(&self.ledger_path, "").map_err(|err| CatalogError::io(&self.ledger_path, err))
    }

    /// Returns words passing `filter`, in canonical order.
    pub fn query(&self, filter: TagFilter) -> Vec<String> {
        self.canonical_view()
            .into_iter()
            .filter(|tag| filter.accepts(tag))
            .map(|tag| tag.word.clone())
            .collect()
    }

    /// Returns every word in canonical order.
    ///
    /// Repeated words (possible only if tags were built from a malformed
    /// source without canonicalizing) appear once.
    pub fn sorted_words(&self) -> Vec<String> {
        self.query(TagFilter::all())
    }

    /// Sorts tags by word and drops repeated words, keeping the first.
    pub fn canonicalize(&mut self) {
        self.tags.sort_by(|left, right| left.word.cmp(&right.word));
        self.tags.dedup_by(|next, kept| next.word == kept.word);
    }

    /// Replaces in-memory tags with the ledger's content.
    ///
    /// # Errors
    /// - Returns `CatalogError::Io` when the ledger exists but is unreadable.
    pub fn load(&mut self) -> CatalogResult<()> {
        let decoded = ledger::decode(&self.ledger_path)?;
        let line_count = decoded.len();
        self.tags = decoded;
        self.canonicalize();
        if self.tags.len() != line_count {
            debug!(
                "event=ledger_load module=registry status=ok title={} lines={} unique={}",
                self.title,
                line_count,
                self.tags.len()
            );
        }
        Ok(())
    }

    /// Writes canonical tags to the ledger.
    ///
    /// # Errors
    /// - Returns `CatalogError::Io` when the ledger cannot be written.
    pub fn save(&mut self) -> CatalogResult<()> {
        self.canonicalize();
        ledger::encode(&self.ledger_path, &self.tags)
    }

    pub fn summary(&self) -> CategorySummary {
        let words = self.sorted_words();
        CategorySummary {
            title: self.title.clone(),
            rank: self.rank,
            count: words.len(),
            words,
        }
    }

    /// Tags in canonical order without reordering the stored set.
    pub fn canonical_tags(&self) -> Vec<Tag> {
        self.canonical_view().into_iter().cloned().collect()
    }

    fn set_checked<I, S>(&mut self, words: I, checked: bool) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut changed = 0;
        for word in words {
            let word = word.as_ref();
            for tag in self.tags.iter_mut().filter(|tag| tag.word == word) {
                if tag.checked != checked {
                    tag.checked = checked;
                    changed += 1;
                }
            }
        }
        changed
    }

    fn canonical_view(&self) -> Vec<&Tag> {
        let mut view: Vec<&Tag> = self.tags.iter().collect();
        view.sort_by(|left, right| left.word.cmp(&right.word));
        view.dedup_by(|next, kept| next.word == kept.word);
        view
    }
}

/// Case-insensitive title equality used across the catalog.
pub fn titles_match(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}
