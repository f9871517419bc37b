//! Source collection scanner
//!
//! Walks a source root for HTML files and turns each one into a
//! [`SourceItem`] with a stable id, an mtime-derived version token, and a
//! sort key that totally orders the collection.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::error::Result;

/// One source file of the collection
#[derive(Debug, Clone)]
pub struct SourceItem {
    /// Stable identifier, the file stem. Unique within a collection;
    /// when two files share a stem the later one encountered wins.
    pub id: String,
    /// Absolute path of the source file
    pub path: PathBuf,
    /// Path relative to the collection root, used for view links
    pub rel_path: PathBuf,
    /// Opaque version token, mtime in whole seconds
    pub version: String,
    /// `"{version}:{id}"`, compared lexicographically
    pub sort_key: String,
}

impl SourceItem {
    pub fn new(id: String, path: PathBuf, rel_path: PathBuf, version: String) -> Self {
        let sort_key = format!("{}:{}", version, id);
        Self {
            id,
            path,
            rel_path,
            version,
            sort_key,
        }
    }
}

/// Scanner for a directory tree of HTML source files
pub struct CollectionScanner {
    root: PathBuf,
}

impl CollectionScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Scan the whole source tree and return items in ascending sort-key
    /// order
    pub fn scan(&self) -> Result<Vec<SourceItem>> {
        tracing::info!("Scanning collection at {}", self.root.display());
        let start = std::time::Instant::now();

        let mut by_id: BTreeMap<String, SourceItem> = BTreeMap::new();
        self.walk(&self.root, &mut by_id)?;

        let mut items: Vec<SourceItem> = by_id.into_values().collect();
        items.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));

        tracing::info!(
            "Scan complete: {} documents in {:?}",
            items.len(),
            start.elapsed()
        );
        Ok(items)
    }

    fn walk(&self, dir: &Path, by_id: &mut BTreeMap<String, SourceItem>) -> Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                self.walk(&path, by_id)?;
                continue;
            }
            if let Some(item) = self.item_for(&path)? {
                by_id.insert(item.id.clone(), item);
            }
        }
        Ok(())
    }

    fn item_for(&self, path: &Path) -> Result<Option<SourceItem>> {
        let is_html = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("html"))
            .unwrap_or(false);
        if !is_html {
            return Ok(None);
        }

        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            tracing::debug!("Skipping file without a usable stem: {}", path.display());
            return Ok(None);
        };

        let mtime = fs::metadata(path)?.modified()?;
        let secs = mtime
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let rel_path = path
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf());

        Ok(Some(SourceItem::new(
            stem.to_string(),
            path.to_path_buf(),
            rel_path,
            secs.to_string(),
        )))
    }
}
