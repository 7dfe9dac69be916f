//! Catalog: the ordered set of categories over one storage directory.
//!
//! # Responsibility
//! - Own every category, indexed by rank, and look them up by title or rank.
//! - Create/delete categories together with their ledger files.
//! - Reconcile categories with ledgers and storage file names (`reconcile`).
//! - Flush state to ledgers explicitly (`settle`, `with_settle`).
//! - Build pending-tag targets and run pulls over storage.
//!
//! # Invariants
//! - Titles are unique case-insensitively; ranks are unique and positive.
//! - Auto ranks are the smallest free positive integer at assignment time.
//! - Unknown titles and malformed arguments are logged and reported through
//!   return values; only IO failures propagate as errors.
//! - Nothing is persisted implicitly except ledger creation, `clear`, and
//!   conflict renames during discovery.

mod reconcile;

pub use reconcile::ReconcileReport;

use crate::config::CatalogConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::ledger::LedgerNaming;
use crate::matcher::storage::TOKEN_SEPARATOR;
use crate::matcher::{self, MatchPolicy, TargetsByRank};
use crate::model::tag::{Tag, TagFilter, Titles};
use crate::registry::{next_free_rank, Category};
use log::{debug, error, info, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Positional-tag catalog bound to one storage and one ledger directory.
#[derive(Debug)]
pub struct Catalog {
    categories: BTreeMap<u32, Category>,
    storage_dir: PathBuf,
    ledger_dir: PathBuf,
    output_dir: PathBuf,
    naming: LedgerNaming,
}

impl Catalog {
    /// Opens a catalog described by `config`.
    ///
    /// Creates missing directories and registers ledgers found on disk, so
    /// `initial_titles` that already have a ledger keep its rank and tags.
    /// Missing initial titles are added, then the catalog is reconciled and
    /// settled when `reconcile_on_open` is set.
    ///
    /// # Errors
    /// - `CatalogError::Config` when the configuration is invalid.
    /// - `CatalogError::Io` when directories or ledgers cannot be accessed.
    pub fn open(config: &CatalogConfig) -> CatalogResult<Self> {
        config.validate()?;
        for dir in [&config.storage_dir, &config.ledger_dir, &config.output_dir] {
            fs::create_dir_all(dir).map_err(|err| CatalogError::io(dir, err))?;
        }

        let mut catalog = Self {
            categories: BTreeMap::new(),
            storage_dir: config.storage_dir.clone(),
            ledger_dir: config.ledger_dir.clone(),
            output_dir: config.output_dir.clone(),
            naming: LedgerNaming::new(&config.ledger_extension)?,
        };
        info!(
            "event=catalog_open module=catalog status=start storage_dir={} ledger_dir={}",
            catalog.storage_dir.display(),
            catalog.ledger_dir.display()
        );

        catalog.renew()?;
        if !config.initial_titles.is_empty() {
            catalog.add_category(config.initial_titles.clone(), None)?;
        }
        if config.reconcile_on_open {
            catalog.reconcile()?;
            catalog.settle()?;
        }

        info!(
            "event=catalog_open module=catalog status=ok categories={}",
            catalog.len()
        );
        Ok(catalog)
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub fn ledger_dir(&self) -> &Path {
        &self.ledger_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Categories in rank order.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }

    /// Titles in rank order.
    pub fn category_titles(&self) -> Vec<String> {
        self.categories()
            .map(|category| category.title().to_string())
            .collect()
    }

    pub fn is_category(&self, title: &str) -> bool {
        self.category(title).is_some()
    }

    /// Looks a category up by title, ignoring case.
    pub fn category(&self, title: &str) -> Option<&Category> {
        self.categories
            .values()
            .find(|category| category.matches_title(title))
    }

    pub fn category_mut(&mut self, title: &str) -> Option<&mut Category> {
        self.categories
            .values_mut()
            .find(|category| category.matches_title(title))
    }

    pub fn category_by_rank(&self, rank: u32) -> Option<&Category> {
        self.categories.get(&rank)
    }

    /// Canonical tags of every category, keyed by title.
    pub fn contents(&self) -> BTreeMap<String, Vec<Tag>> {
        self.categories()
            .map(|category| (category.title().to_string(), category.canonical_tags()))
            .collect()
    }

    /// Adds categories that are not present yet.
    ///
    /// `rank` applies to the first newly added title; every other title gets
    /// the first free rank. A taken `rank` falls back to the first free rank.
    /// Each added category gets its ledger file created (existing content is
    /// kept). Blank titles and titles containing `_` or path separators are
    /// skipped; `Some(0)` rejects the whole call.
    ///
    /// Returns the number of categories added.
    ///
    /// # Errors
    /// - `CatalogError::Io` when a ledger file cannot be created. Categories
    ///   added before the failure stay registered.
    pub fn add_category(
        &mut self,
        titles: impl Into<Titles>,
        rank: Option<u32>,
    ) -> CatalogResult<usize> {
        let titles = titles.into();
        if titles.is_empty() {
            warn!("event=category_add module=catalog status=malformed reason=empty_title");
            return Ok(0);
        }
        if rank == Some(0) {
            warn!("event=category_add module=catalog status=malformed reason=zero_rank");
            return Ok(0);
        }

        let mut requested_rank = rank;
        let mut added = 0;
        for title in titles.into_vec() {
            let title = title.trim();
            if !is_valid_title(title) {
                warn!(
                    "event=category_add module=catalog status=malformed title={:?}",
                    title
                );
                continue;
            }
            if self.is_category(title) {
                debug!(
                    "event=category_add module=catalog status=skipped reason=exists title={}",
                    title
                );
                continue;
            }

            let rank = self.resolve_rank(title, requested_rank.take());
            self.register(title, rank)?;
            added += 1;
        }
        Ok(added)
    }

    /// Deletes categories and their ledger files.
    ///
    /// Each title is cut at its first `_`, so a ledger stem such as
    /// `colour_1` names the `colour` category. Unknown titles are logged and
    /// skipped; the rest of the batch still runs.
    ///
    /// Returns `true` when every requested title was deleted.
    ///
    /// # Errors
    /// - `CatalogError::Io` when an existing ledger cannot be removed.
    pub fn delete_category(&mut self, titles: impl Into<Titles>) -> CatalogResult<bool> {
        let titles = titles.into();
        if titles.is_empty() {
            warn!("event=category_delete module=catalog status=malformed reason=empty_title");
            return Ok(false);
        }

        let mut all_deleted = true;
        for raw in titles.into_vec() {
            let title = raw.split(TOKEN_SEPARATOR).next().unwrap_or_default().trim();
            if title.is_empty() {
                warn!(
                    "event=category_delete module=catalog status=malformed title={:?}",
                    raw
                );
                all_deleted = false;
                continue;
            }

            let Some(rank) = self.category(title).map(Category::rank) else {
                warn!(
                    "event=category_delete module=catalog status=not_found title={}",
                    title
                );
                all_deleted = false;
                continue;
            };

            if let Some(category) = self.categories.remove(&rank) {
                remove_ledger(category.ledger_path())?;
                info!(
                    "event=category_delete module=catalog status=ok title={} rank={}",
                    category.title(),
                    rank
                );
            }
        }
        Ok(all_deleted)
    }

    /// Writes every category to its ledger.
    ///
    /// Repeated calls without mutation produce identical ledger bytes.
    ///
    /// # Errors
    /// - `CatalogError::Io` on the first ledger that cannot be written.
    pub fn settle(&mut self) -> CatalogResult<()> {
        for category in self.categories.values_mut() {
            category.save()?;
        }
        debug!(
            "event=catalog_settle module=catalog status=ok categories={}",
            self.categories.len()
        );
        Ok(())
    }

    /// Runs `work` and settles afterwards on every return path.
    ///
    /// An error from `work` is returned even if settling also fails; the
    /// settle failure is logged in that case.
    pub fn with_settle<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<CatalogError>,
    {
        let outcome = work(self);
        let settled = self.settle();
        match (outcome, settled) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(err)) => Err(err.into()),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(settle_err)) => {
                error!(
                    "event=catalog_settle module=catalog status=error error={}",
                    settle_err
                );
                Err(err)
            }
        }
    }

    /// Words of one category passing `filter`. Unknown titles yield nothing.
    pub fn query(&self, title: &str, filter: TagFilter) -> Vec<String> {
        match self.category(title) {
            Some(category) => category.query(filter),
            None => {
                warn!(
                    "event=category_query module=catalog status=not_found title={}",
                    title
                );
                Vec::new()
            }
        }
    }

    /// Adds words to one category. Returns how many were inserted; `0` when
    /// the category is unknown.
    pub fn add_tags(&mut self, title: &str, words: impl Into<Titles>, checked: bool) -> usize {
        match self.category_mut(title) {
            Some(category) => category.add(words.into().into_vec(), checked),
            None => {
                warn!(
                    "event=tag_add module=catalog status=not_found title={}",
                    title
                );
                0
            }
        }
    }

    /// Marks words handled in one category, or in all when `title` is `None`.
    /// Returns how many tags changed state.
    pub fn check(&mut self, words: impl Into<Titles>, title: Option<&str>) -> usize {
        self.set_checked(words.into(), title, true)
    }

    /// Marks words pending in one category, or in all when `title` is `None`.
    /// Returns how many tags changed state.
    pub fn uncheck(&mut self, words: impl Into<Titles>, title: Option<&str>) -> usize {
        self.set_checked(words.into(), title, false)
    }

    /// Marks every tag in every category handled. Nothing is deleted.
    pub fn reset(&mut self) {
        for category in self.categories.values_mut() {
            category.all_checked();
        }
        info!(
            "event=catalog_reset module=catalog status=ok categories={}",
            self.categories.len()
        );
    }

    /// Clears every category and truncates every ledger.
    ///
    /// # Errors
    /// - `CatalogError::Io` on the first ledger that cannot be truncated.
    pub fn clear_all(&mut self) -> CatalogResult<()> {
        for category in self.categories.values_mut() {
            category.clear()?;
        }
        Ok(())
    }

    /// Pending words per rank. Every rank is present, possibly empty.
    pub fn pending_targets(&self) -> TargetsByRank {
        self.categories
            .iter()
            .map(|(rank, category)| {
                let pending: BTreeSet<String> = category
                    .tags()
                    .iter()
                    .filter(|tag| tag.is_pending())
                    .map(|tag| tag.word.clone())
                    .collect();
                (*rank, pending)
            })
            .collect()
    }

    /// Storage files matching the pending targets under `policy`.
    ///
    /// `MatchPolicy::Loose` can list one file several times; see
    /// `matcher::dedup_paths`.
    ///
    /// # Errors
    /// - `CatalogError::Io` when the storage directory cannot be listed.
    pub fn pull(&self, policy: MatchPolicy) -> CatalogResult<Vec<PathBuf>> {
        matcher::pull(&self.storage_dir, &self.pending_targets(), policy)
    }

    fn set_checked(&mut self, words: Titles, title: Option<&str>, checked: bool) -> usize {
        let words = words.into_vec();
        let apply = |category: &mut Category| {
            if checked {
                category.check(&words)
            } else {
                category.uncheck(&words)
            }
        };

        match title {
            Some(title) => match self.category_mut(title) {
                Some(category) => apply(category),
                None => {
                    warn!(
                        "event=tag_check module=catalog status=not_found title={}",
                        title
                    );
                    0
                }
            },
            None => self.categories.values_mut().map(apply).sum(),
        }
    }

    fn resolve_rank(&self, title: &str, requested: Option<u32>) -> u32 {
        match requested {
            Some(rank) if !self.categories.contains_key(&rank) => rank,
            Some(rank) => {
                let fallback = self.next_free_rank();
                warn!(
                    "event=category_add module=catalog status=rank_taken title={} rank={} fallback={}",
                    title, rank, fallback
                );
                fallback
            }
            None => self.next_free_rank(),
        }
    }

    fn next_free_rank(&self) -> u32 {
        next_free_rank(self.categories.keys().copied())
    }

    fn register(&mut self, title: &str, rank: u32) -> CatalogResult<()> {
        let path = self.naming.path_in(&self.ledger_dir, title, rank);
        let category = Category::new(title, rank, path);
        category.touch()?;
        info!(
            "event=category_add module=catalog status=ok title={} rank={}",
            title, rank
        );
        self.categories.insert(rank, category);
        Ok(())
    }
}

fn is_valid_title(title: &str) -> bool {
    !title.is_empty() && !title.contains([TOKEN_SEPARATOR, '/', '\\'])
}

fn remove_ledger(path: &Path) -> CatalogResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(CatalogError::io(path, err)),
    }
}
