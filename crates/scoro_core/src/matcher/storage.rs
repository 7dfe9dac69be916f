//! Storage directory enumeration and stem tokenization.

use crate::error::{CatalogError, CatalogResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Separator between positional tokens in a storage file stem.
pub const TOKEN_SEPARATOR: char = '_';

/// Lists regular, non-hidden files directly inside `dir`.
///
/// Order is whatever the file system enumerates; callers that need a stable
/// order sort the result.
///
/// # Errors
/// - Returns `CatalogError::Io` when the directory cannot be listed.
pub fn list_storage_files(dir: &Path) -> CatalogResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|err| CatalogError::io(dir, err))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| CatalogError::io(dir, err))?;
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if hidden || !path.is_file() {
            continue;
        }
        files.push(path);
    }
    Ok(files)
}

/// Splits a file's stem into positional tokens. Empty tokens are kept so
/// positions stay aligned with ranks.
pub fn stem_tokens(path: &Path) -> Vec<String> {
    match path.file_stem() {
        Some(stem) => stem
            .to_string_lossy()
            .split(TOKEN_SEPARATOR)
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}
