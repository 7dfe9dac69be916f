//! Copies pulled storage files into the output directory.

use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Copies each path into `out_dir`, keeping its file name. Returns the
/// destination paths in input order.
pub fn copy_to_output(paths: &[PathBuf], out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output dir `{}`", out_dir.display()))?;

    let mut copied = Vec::with_capacity(paths.len());
    for source in paths {
        let name = source
            .file_name()
            .with_context(|| format!("pulled path `{}` has no file name", source.display()))?;
        let target = out_dir.join(name);
        fs::copy(source, &target).with_context(|| {
            format!(
                "failed to copy `{}` to `{}`",
                source.display(),
                target.display()
            )
        })?;
        copied.push(target);
    }

    info!(
        "event=pull_copy module=cli status=ok files={} out_dir={}",
        copied.len(),
        out_dir.display()
    );
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::copy_to_output;
    use std::fs;

    #[test]
    fn copies_keep_base_name_and_content() {
        let storage = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let source = storage.path().join("red_small.txt");
        fs::write(&source, "payload").unwrap();

        let copied = copy_to_output(&[source.clone(), source], &out.path().join("pulled")).unwrap();
        assert_eq!(copied.len(), 2);
        assert_eq!(
            fs::read_to_string(out.path().join("pulled").join("red_small.txt")).unwrap(),
            "payload"
        );
    }
}
