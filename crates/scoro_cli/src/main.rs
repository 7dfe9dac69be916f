//! `scoro` command line entry point.
//!
//! # Responsibility
//! - Map subcommands onto catalog operations.
//! - Print category summaries and copy pulled files to the output directory.
//!
//! # Invariants
//! - Every command runs inside `Catalog::with_settle`, so ledgers are flushed
//!   on success and on error.

mod output;
mod render;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use scoro_core::{dedup_paths, init_logging, Catalog, CatalogConfig, MatchPolicy};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "scoro", version, about = "Positional-tag catalog over a file directory")]
struct Cli {
    /// JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Storage directory (overrides config).
    #[arg(long, global = true)]
    storage: Option<PathBuf>,
    /// Ledger directory (overrides config).
    #[arg(long, global = true)]
    ledgers: Option<PathBuf>,
    /// Output directory (overrides config).
    #[arg(long, global = true)]
    output: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every category with its tags.
    Status,
    /// Add categories; `--rank` applies to the first new title.
    Add {
        #[arg(required = true)]
        titles: Vec<String>,
        #[arg(long)]
        rank: Option<u32>,
    },
    /// Delete categories and their ledgers.
    Delete {
        #[arg(required = true)]
        titles: Vec<String>,
    },
    /// Add pending tags to one category.
    Tag {
        category: String,
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Mark tags handled.
    Check {
        #[arg(required = true)]
        words: Vec<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Mark tags pending.
    Uncheck {
        #[arg(required = true)]
        words: Vec<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Mark every tag handled.
    Reset,
    /// List storage files matching pending tags.
    Pull {
        /// Require every constrained position to match.
        #[arg(long)]
        strict: bool,
        /// List each file once.
        #[arg(long)]
        dedup: bool,
        /// Copy matches into the output directory.
        #[arg(long)]
        copy: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    if let Some(log_dir) = config.log_dir.as_ref() {
        init_logging(&config.log_level, log_dir).map_err(|err| anyhow!(err))?;
    }

    let mut catalog = Catalog::open(&config)?;
    catalog.with_settle(|catalog| run(cli.command, catalog))
}

fn resolve_config(cli: &Cli) -> Result<CatalogConfig> {
    let mut config = match cli.config.as_ref() {
        Some(path) => CatalogConfig::load(path)?,
        None => CatalogConfig::default(),
    };
    if let Some(dir) = cli.storage.clone() {
        config.storage_dir = dir;
    }
    if let Some(dir) = cli.ledgers.clone() {
        config.ledger_dir = dir;
    }
    if let Some(dir) = cli.output.clone() {
        config.output_dir = dir;
    }
    config.validate()?;
    Ok(config)
}

fn run(command: Command, catalog: &mut Catalog) -> Result<()> {
    match command {
        Command::Status => {
            if catalog.is_empty() {
                println!("no categories");
            }
            for category in catalog.categories() {
                print!("{}", render::render_summary(&category.summary()));
            }
        }
        Command::Add { titles, rank } => {
            let added = catalog.add_category(titles, rank)?;
            println!("added {added} categories");
        }
        Command::Delete { titles } => {
            if !catalog.delete_category(titles)? {
                println!("some categories were not found");
            }
        }
        Command::Tag { category, words } => {
            if !catalog.is_category(&category) {
                return Err(anyhow!("unknown category `{category}`"));
            }
            let added = catalog.add_tags(&category, words, false);
            println!("added {added} pending tags to {category}");
        }
        Command::Check { words, category } => {
            let changed = catalog.check(words, category.as_deref());
            println!("checked {changed} tags");
        }
        Command::Uncheck { words, category } => {
            let changed = catalog.uncheck(words, category.as_deref());
            println!("unchecked {changed} tags");
        }
        Command::Reset => catalog.reset(),
        Command::Pull {
            strict,
            dedup,
            copy,
        } => {
            let policy = if strict {
                MatchPolicy::Strict
            } else {
                MatchPolicy::Loose
            };
            let mut pulled = catalog.pull(policy)?;
            if dedup || copy {
                pulled = dedup_paths(pulled);
            }
            for path in &pulled {
                println!("{}", path.display());
            }
            if copy {
                let copied = output::copy_to_output(&pulled, catalog.output_dir())?;
                println!("copied {} files to {}", copied.len(), catalog.output_dir().display());
            }
        }
    }
    Ok(())
}
