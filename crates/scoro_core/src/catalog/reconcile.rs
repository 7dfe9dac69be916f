//! Ledger discovery and storage reconciliation.
//!
//! # Invariants
//! - Ledgers found on disk dictate the rank of categories the catalog does
//!   not know yet; per title, the first file (by file name) whose rank is
//!   free wins.
//! - A title whose every ledger has a taken rank moves to the first free
//!   rank whose path is vacant, and its first ledger is renamed there. An
//!   existing ledger is never overwritten.
//! - Tokens discovered in storage file names are added as handled tags;
//!   existing tags keep their state.

use super::Catalog;
use crate::error::{CatalogError, CatalogResult};
use crate::matcher::{list_storage_files, stem_tokens};
use crate::ledger::LedgerName;
use crate::registry::{next_free_rank, titles_match, Category};
use log::{info, warn};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::time::Instant;

/// Counters from one `reconcile` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Categories registered from ledger files found on disk.
    pub discovered: usize,
    /// Storage files whose names were tokenized.
    pub storage_files: usize,
    /// Handled tags newly added from storage tokens.
    pub tokens_added: usize,
}

impl Catalog {
    /// Registers categories from unknown ledger files, then reloads every
    /// category from its ledger. Storage is not scanned.
    ///
    /// Returns the number of categories discovered.
    ///
    /// # Errors
    /// - `CatalogError::Io` when the ledger directory or a ledger is unreadable.
    pub fn renew(&mut self) -> CatalogResult<usize> {
        let discovered = self.discover_ledgers()?;
        for category in self.categories.values_mut() {
            category.load()?;
        }
        Ok(discovered)
    }

    /// Synchronizes categories with ledgers and storage file names.
    ///
    /// 1. Register categories from unknown ledger files (rank from file name).
    /// 2. Reload every category from its ledger.
    /// 3. Tokenize storage stems; token `i` goes to rank `i + 1` when present.
    /// 4. Add each distinct token as a handled tag.
    /// 5. Canonicalize every category.
    ///
    /// # Errors
    /// - `CatalogError::Io` when ledgers or the storage directory are
    ///   unreadable.
    pub fn reconcile(&mut self) -> CatalogResult<ReconcileReport> {
        let started_at = Instant::now();
        let discovered = self.renew()?;

        let mut found: BTreeMap<u32, BTreeSet<String>> = self
            .categories
            .keys()
            .map(|rank| (*rank, BTreeSet::new()))
            .collect();
        let files = list_storage_files(&self.storage_dir)?;
        for path in &files {
            for (index, token) in stem_tokens(path).into_iter().enumerate() {
                if token.is_empty() {
                    continue;
                }
                let Ok(rank) = u32::try_from(index + 1) else {
                    break;
                };
                if let Some(tokens) = found.get_mut(&rank) {
                    tokens.insert(token);
                }
            }
        }

        let mut tokens_added = 0;
        for (rank, tokens) in found {
            if let Some(category) = self.categories.get_mut(&rank) {
                tokens_added += category.add(tokens, true);
            }
        }
        for category in self.categories.values_mut() {
            category.canonicalize();
        }

        let report = ReconcileReport {
            discovered,
            storage_files: files.len(),
            tokens_added,
        };
        info!(
            "event=catalog_reconcile module=catalog status=ok categories={} discovered={} storage_files={} tokens_added={} duration_ms={}",
            self.categories.len(),
            report.discovered,
            report.storage_files,
            report.tokens_added,
            started_at.elapsed().as_millis()
        );
        Ok(report)
    }

    fn discover_ledgers(&mut self) -> CatalogResult<usize> {
        let entries =
            fs::read_dir(&self.ledger_dir).map_err(|err| CatalogError::io(&self.ledger_dir, err))?;

        let mut ledgers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| CatalogError::io(&self.ledger_dir, err))?;
            if !entry.path().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if let Some(parsed) = self.naming.parse(&file_name) {
                ledgers.push((file_name, parsed));
            }
        }
        ledgers.sort_by(|left, right| left.0.cmp(&right.0));

        // Unknown titles with their candidate ledgers, in file-name order.
        let mut unknown: Vec<Vec<(String, LedgerName)>> = Vec::new();
        for (file_name, parsed) in ledgers {
            if self.is_category(&parsed.title) {
                continue;
            }
            match unknown
                .iter_mut()
                .find(|group| titles_match(&group[0].1.title, &parsed.title))
            {
                Some(group) => group.push((file_name, parsed)),
                None => unknown.push(vec![(file_name, parsed)]),
            }
        }

        let mut discovered = 0;
        let mut conflicting = Vec::new();
        for group in unknown {
            let free = group
                .iter()
                .find(|(_, parsed)| !self.categories.contains_key(&parsed.rank));
            match free {
                Some((_, parsed)) => {
                    self.adopt_ledger(&parsed.title, parsed.rank);
                    discovered += 1;
                }
                None => conflicting.push(group),
            }
        }

        for group in conflicting {
            let (file_name, parsed) = &group[0];
            let found_path = self.ledger_dir.join(file_name);
            let fallback = self.vacant_rank(&parsed.title);
            let moved_path = self.naming.path_in(&self.ledger_dir, &parsed.title, fallback);
            fs::rename(&found_path, &moved_path)
                .map_err(|err| CatalogError::io(&found_path, err))?;
            warn!(
                "event=ledger_discover module=catalog status=rank_taken title={} rank={} fallback={}",
                parsed.title, parsed.rank, fallback
            );
            self.adopt_ledger(&parsed.title, fallback);
            discovered += 1;
        }
        Ok(discovered)
    }

    fn adopt_ledger(&mut self, title: &str, rank: u32) {
        let path = self.naming.path_in(&self.ledger_dir, title, rank);
        self.categories.insert(rank, Category::new(title, rank, path));
    }

    /// First free rank whose ledger path for `title` does not exist yet.
    fn vacant_rank(&self, title: &str) -> u32 {
        let mut used: BTreeSet<u32> = self.categories.keys().copied().collect();
        loop {
            let rank = next_free_rank(used.iter().copied());
            if !self.naming.path_in(&self.ledger_dir, title, rank).exists() {
                return rank;
            }
            used.insert(rank);
        }
    }
}
