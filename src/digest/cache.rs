//! Version cache
//!
//! One JSON object mapping document id to the version assigned when the
//! document was last digested. A lookup hit means the document needs no
//! work. The file is republished atomically on every record, so a crash
//! mid-run never leaves a torn cache; it only loses the entries that were
//! not yet recorded, which the next run simply re-digests.
//!
//! Concurrent producer runs over the same cache are unsupported.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::error::Result;
use crate::store::write_atomic;

pub struct VersionCache {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl VersionCache {
    /// Open the cache file, starting empty if it does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = fs::read(&path)?;
            serde_json::from_slice(&raw)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    pub fn lookup(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    /// Record a digested version and republish the cache file
    pub fn record(&mut self, id: &str, version: &str) -> Result<()> {
        self.entries.insert(id.to_string(), version.to_string());
        let json = serde_json::to_vec_pretty(&self.entries)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
