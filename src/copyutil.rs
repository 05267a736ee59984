//! Recursive directory copy, listing, and tree comparison.
//!
//! Used to materialize package fixtures on disk and to validate pipeline
//! output against golden trees. `.git` directories are always skipped.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::errors::Result;

/// Relative paths of every file under `dir`, sorted.
pub fn list(dir: &Path) -> Result<BTreeSet<String>> {
    let mut paths = BTreeSet::new();
    for entry in walk(dir) {
        let entry = entry?;
        if entry.file_type().is_file() {
            paths.insert(relative(dir, entry.path()));
        }
    }
    Ok(paths)
}

/// Recursively copy `src` into `dst`, creating `dst` if needed.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    for entry in walk(src) {
        let entry = entry?;
        let target = dst.join(relative(src, entry.path()));
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Recursively delete `dir` and everything under it.
///
/// A directory that does not exist is not an error; cleanup paths call
/// this without checking first.
pub fn remove_all(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Compare two directory trees.
///
/// Returns the relative paths present in only one tree or differing in
/// content; an empty set means the trees are equal.
pub fn diff(a: &Path, b: &Path) -> Result<BTreeSet<String>> {
    let in_a = list(a)?;
    let in_b = list(b)?;
    let mut differing = BTreeSet::new();
    for path in in_a.union(&in_b) {
        let file_a = a.join(path);
        let file_b = b.join(path);
        if !file_a.is_file() || !file_b.is_file() {
            differing.insert(path.clone());
            continue;
        }
        if std::fs::read(&file_a)? != std::fs::read(&file_b)? {
            differing.insert(path.clone());
        }
    }
    Ok(differing)
}

/// [`diff`], with paths whose file name appears in `ignore` excluded from
/// the comparison. Golden-fixture checks use this to skip exactly the
/// reserved package manifest.
pub fn diff_ignoring(a: &Path, b: &Path, ignore: &[&str]) -> Result<BTreeSet<String>> {
    let mut differing = diff(a, b)?;
    differing.retain(|path| {
        let name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        !ignore.contains(&name.as_str())
    });
    Ok(differing)
}

fn walk(dir: &Path) -> impl Iterator<Item = walkdir::Result<walkdir::DirEntry>> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git")
}

fn relative(root: &Path, path: &Path) -> String {
    pathdiff::diff_paths(path, root)
        .unwrap_or_else(|| PathBuf::from(path))
        .to_string_lossy()
        .into_owned()
}
