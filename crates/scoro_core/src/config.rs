//! Catalog configuration.
//!
//! # Responsibility
//! - Name the storage, ledger, and output directories and the ledger
//!   extension.
//! - Control startup behaviour (initial categories, full reconcile vs reload).
//!
//! # Invariants
//! - Every field has a default; a partial JSON file is valid.
//! - `validate()` runs before a configuration is handed to `Catalog::open`.

use crate::error::{CatalogError, CatalogResult};
use crate::ledger::{LedgerNaming, DEFAULT_LEDGER_EXTENSION};
use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Flat directory whose file names encode positional tokens.
    pub storage_dir: PathBuf,
    /// Directory holding one ledger file per category.
    pub ledger_dir: PathBuf,
    /// Destination used by copy collaborators.
    pub output_dir: PathBuf,
    /// Ledger file extension, without the dot.
    pub ledger_extension: String,
    /// Categories added (auto rank) before the first reconcile.
    pub initial_titles: Vec<String>,
    /// `true`: reconcile with storage and settle on open.
    /// `false`: only discover and reload ledgers.
    pub reconcile_on_open: bool,
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` leaves logging off.
    pub log_dir: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("./storage"),
            ledger_dir: PathBuf::from("./indexes"),
            output_dir: PathBuf::from("./output"),
            ledger_extension: DEFAULT_LEDGER_EXTENSION.to_string(),
            initial_titles: Vec::new(),
            reconcile_on_open: true,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CatalogConfig {
    /// Builds a default configuration rooted at `root`
    /// (`root/storage`, `root/indexes`, `root/output`).
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            storage_dir: root.join("storage"),
            ledger_dir: root.join("indexes"),
            output_dir: root.join("output"),
            ..Self::default()
        }
    }

    /// Reads a JSON configuration file.
    ///
    /// # Errors
    /// - `CatalogError::Io` when the file cannot be read.
    /// - `CatalogError::Config` when JSON is invalid or values fail validation.
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|err| CatalogError::io(path, err))?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CatalogResult<()> {
        LedgerNaming::new(&self.ledger_extension)?;
        for (name, dir) in [
            ("storage_dir", &self.storage_dir),
            ("ledger_dir", &self.ledger_dir),
            ("output_dir", &self.output_dir),
        ] {
            if dir.as_os_str().is_empty() {
                return Err(CatalogError::Config(format!("{name} cannot be empty")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CatalogConfig;
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn defaults_match_conventional_layout() {
        let config = CatalogConfig::default();
        assert_eq!(config.storage_dir, PathBuf::from("./storage"));
        assert_eq!(config.ledger_dir, PathBuf::from("./indexes"));
        assert_eq!(config.ledger_extension, "lst");
        assert!(config.reconcile_on_open);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scoro.json");
        fs::write(
            &path,
            r#"{ "storage_dir": "/data/files", "initial_titles": ["colour", "size"] }"#,
        )
        .unwrap();

        let config = CatalogConfig::load(&path).unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("/data/files"));
        assert_eq!(config.initial_titles, vec!["colour", "size"]);
        assert_eq!(config.ledger_dir, PathBuf::from("./indexes"));
    }

    #[test]
    fn invalid_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scoro.json");
        fs::write(&path, r#"{ "ledger_extension": "" }"#).unwrap();
        assert!(CatalogConfig::load(&path).is_err());
    }

    #[test]
    fn malformed_json_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scoro.json");
        fs::write(&path, "{ not json").unwrap();
        let err = CatalogConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("invalid configuration"));
    }
}
