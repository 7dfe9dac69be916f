//! Pull: select storage files by per-rank target tokens.
//!
//! # Invariants
//! - `Strict` accepts a file at most once.
//! - `Loose` appends a file once per matching position, so one file can appear
//!   several times; `dedup_paths` collapses that for callers who need it.

use super::storage::{list_storage_files, stem_tokens};
use crate::error::CatalogResult;
use log::info;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Target tokens per rank. Ranks map to 1-based token positions.
pub type TargetsByRank = BTreeMap<u32, BTreeSet<String>>;

/// How tokens are tested against targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Any single position hit accepts the file, once per hit.
    #[default]
    Loose,
    /// Every rank with a non-empty target set must be hit.
    Strict,
}

impl Display for MatchPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loose => write!(f, "loose"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

/// Returns how many times a file with `tokens` is accepted.
///
/// `Strict` yields 0 or 1. A file shorter than a constrained position fails
/// that constraint. With no non-empty target set at all, every file passes.
pub fn match_tokens(tokens: &[String], targets: &TargetsByRank, policy: MatchPolicy) -> usize {
    match policy {
        MatchPolicy::Strict => {
            let all_hit = targets
                .iter()
                .filter(|(_, set)| !set.is_empty())
                .all(|(rank, set)| {
                    token_at_rank(tokens, *rank).is_some_and(|token| set.contains(token))
                });
            usize::from(all_hit)
        }
        MatchPolicy::Loose => tokens
            .iter()
            .enumerate()
            .filter(|(index, token)| {
                u32::try_from(index + 1)
                    .ok()
                    .and_then(|rank| targets.get(&rank))
                    .is_some_and(|set| set.contains(token.as_str()))
            })
            .count(),
    }
}

/// Scans `storage_dir` and returns matching file paths.
///
/// # Errors
/// - Returns `CatalogError::Io` when the storage directory cannot be listed.
pub fn pull(
    storage_dir: &Path,
    targets: &TargetsByRank,
    policy: MatchPolicy,
) -> CatalogResult<Vec<PathBuf>> {
    let started_at = Instant::now();
    let files = list_storage_files(storage_dir)?;
    let scanned = files.len();

    let mut matched = Vec::new();
    for path in files {
        let hits = match_tokens(&stem_tokens(&path), targets, policy);
        for _ in 0..hits {
            matched.push(path.clone());
        }
    }

    info!(
        "event=pull module=matcher status=ok policy={} scanned={} matched={} duration_ms={}",
        policy,
        scanned,
        matched.len(),
        started_at.elapsed().as_millis()
    );
    Ok(matched)
}

/// Drops repeated paths, keeping the first occurrence and the order.
pub fn dedup_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .filter(|path| seen.insert(path.clone()))
        .collect()
}

fn token_at_rank(tokens: &[String], rank: u32) -> Option<&str> {
    let index = usize::try_from(rank).ok()?.checked_sub(1)?;
    tokens.get(index).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::{dedup_paths, match_tokens, MatchPolicy, TargetsByRank};
    use std::path::PathBuf;

    fn targets(entries: &[(u32, &[&str])]) -> TargetsByRank {
        entries
            .iter()
            .map(|(rank, words)| (*rank, words.iter().map(|word| word.to_string()).collect()))
            .collect()
    }

    fn tokens(stem: &str) -> Vec<String> {
        stem.split('_').map(str::to_string).collect()
    }

    #[test]
    fn strict_requires_every_non_empty_rank() {
        let targets = targets(&[(1, &["red", "blue"]), (2, &["small"])]);
        assert_eq!(match_tokens(&tokens("red_small"), &targets, MatchPolicy::Strict), 1);
        assert_eq!(match_tokens(&tokens("red_large"), &targets, MatchPolicy::Strict), 0);
        assert_eq!(match_tokens(&tokens("red"), &targets, MatchPolicy::Strict), 0);
    }

    #[test]
    fn strict_ignores_empty_sets_and_accepts_without_constraints() {
        let constrained = targets(&[(1, &["red"]), (2, &[])]);
        assert_eq!(
            match_tokens(&tokens("red_anything"), &constrained, MatchPolicy::Strict),
            1
        );

        let unconstrained = targets(&[(1, &[]), (2, &[])]);
        assert_eq!(
            match_tokens(&tokens("green_large"), &unconstrained, MatchPolicy::Strict),
            1
        );
        assert_eq!(
            match_tokens(&tokens("green"), &TargetsByRank::new(), MatchPolicy::Strict),
            1
        );
    }

    #[test]
    fn loose_counts_each_matching_position() {
        let targets = targets(&[(1, &["red"]), (2, &["small"])]);
        assert_eq!(match_tokens(&tokens("red_small"), &targets, MatchPolicy::Loose), 2);
        assert_eq!(match_tokens(&tokens("red_large"), &targets, MatchPolicy::Loose), 1);
        assert_eq!(match_tokens(&tokens("blue_large"), &targets, MatchPolicy::Loose), 0);
    }

    #[test]
    fn positions_beyond_known_ranks_are_ignored() {
        let targets = targets(&[(1, &["red"])]);
        assert_eq!(
            match_tokens(&tokens("red_small_extra"), &targets, MatchPolicy::Loose),
            1
        );
        assert_eq!(
            match_tokens(&tokens("red_small_extra"), &targets, MatchPolicy::Strict),
            1
        );
    }

    #[test]
    fn dedup_paths_keeps_first_occurrence_order() {
        let a = PathBuf::from("a");
        let b = PathBuf::from("b");
        let deduped = dedup_paths(vec![a.clone(), b.clone(), a.clone(), b.clone()]);
        assert_eq!(deduped, vec![a, b]);
    }
}
