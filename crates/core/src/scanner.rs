//! Enumerates candidate files with their modification-time fingerprints.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ScannedItem {
    pub path: PathBuf,
    pub size: u64,
    /// Mtime in milliseconds since the Unix epoch.
    pub mtime: i64,
}

/// Walks `root` and returns candidate files in enumeration order.
/// Non-recursive walks stop at the immediate children. Directories, hidden
/// entries, excluded globs and the store file itself are never candidates.
/// Entries whose metadata cannot be read are logged and skipped; the walk
/// continues.
pub fn walk(
    root: &Path,
    recursive: bool,
    excludes: &GlobSet,
    store_path: &Path,
) -> Vec<ScannedItem> {
    let store_name = store_path.file_name();
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut items = Vec::new();

    for entry in WalkDir::new(root)
        .max_depth(max_depth)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        // The root was asked for explicitly; never filter it out.
        .filter_entry(|e| e.depth() == 0 || should_descend(e.path(), excludes))
    {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };

        let path = entry.path();
        if entry.file_type().is_dir() {
            continue;
        }
        if store_name.is_some() && path.file_name() == store_name {
            continue;
        }

        let meta = match fs::metadata(path) {
            Ok(m) => m,
            Err(err) => {
                warn!("skipping unreadable entry {}: {}", path.display(), err);
                continue;
            }
        };

        let mtime = match modified_millis(&meta) {
            Some(t) => t,
            None => {
                warn!("skipping {}: no modification time", path.display());
                continue;
            }
        };

        items.push(ScannedItem {
            path: path.to_path_buf(),
            size: meta.len(),
            mtime,
        });
    }

    items
}

pub fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat)?);
    }
    Ok(builder.build()?)
}

fn modified_millis(meta: &fs::Metadata) -> Option<i64> {
    meta.modified()
        .ok()?
        .duration_since(std::time::UNIX_EPOCH)
        .ok()
        .map(|d| d.as_millis() as i64)
}

fn should_descend(path: &Path, excludes: &GlobSet) -> bool {
    !is_excluded(path, excludes) && !is_hidden(path)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

fn is_excluded(path: &Path, excludes: &GlobSet) -> bool {
    excludes.is_match(path)
}
