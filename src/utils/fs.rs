//! File-system seam for the migration machinery.
//!
//! Every file operation the migrator performs goes through [`FileOps`],
//! so tests can induce a failure at any specific phase without mocking
//! the real file system. Production code uses [`StdFileOps`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub trait FileOps {
    fn file_exists(&self, path: &Path) -> bool;

    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Plain files directly inside `path`. Subdirectories are not listed.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// [`FileOps`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileOps;

impl FileOps for StdFileOps {
    fn file_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                entries.push(entry.path());
            }
        }
        entries.sort();
        Ok(entries)
    }

    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

/// The store file plus every auxiliary sibling that belongs to it.
///
/// A sibling is any file in the store's directory whose name starts with
/// the store's file name — the write-ahead-log/shared-memory side files
/// (`shop.db-wal`, `shop.db-shm`) follow that convention. Sorted, so the
/// main store file comes first.
pub fn related_store_files(ops: &dyn FileOps, store_path: &Path) -> io::Result<Vec<PathBuf>> {
    let Some(base) = store_path.file_name().and_then(|n| n.to_str()) else {
        return Ok(Vec::new());
    };
    let dir = store_path.parent().unwrap_or(Path::new("."));

    let mut files: Vec<PathBuf> = ops
        .list_dir(dir)?
        .into_iter()
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(base))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Remove everything inside `dir`, ignoring failures. Used to clear
/// stale staging leftovers before a hop: hygiene, not correctness.
pub fn clear_dir_best_effort(ops: &dyn FileOps, dir: &Path) {
    if let Ok(entries) = ops.list_dir(dir) {
        for entry in entries {
            let _ = ops.remove_file(&entry);
        }
    }
}
