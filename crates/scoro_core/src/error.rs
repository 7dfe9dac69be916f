//! Catalog error taxonomy.
//!
//! # Responsibility
//! - Carry storage-medium failures (ledger and storage directory IO) to callers.
//! - Carry configuration load/validation failures.
//!
//! # Invariants
//! - Soft failures (unknown category, malformed title) are never represented
//!   here; they are logged and reported through return values.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that propagate out of catalog operations.
#[derive(Debug)]
pub enum CatalogError {
    /// Ledger or storage path could not be read, written, or listed.
    Io { path: PathBuf, source: io::Error },
    /// Configuration file is unreadable or has invalid values.
    Config(String),
}

impl CatalogError {
    pub(crate) fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io failure at `{}`: {source}", path.display()),
            Self::Config(message) => write!(f, "invalid configuration: {message}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Config(_) => None,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(value: serde_json::Error) -> Self {
        Self::Config(value.to_string())
    }
}
