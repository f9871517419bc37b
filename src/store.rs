//! On-disk digest store
//!
//! One JSON blob per document id, bucketed by the first bytes of the id's
//! SHA-256 so no single directory grows unboundedly. All writes go through
//! [`write_atomic`], which is also what the feed writer and the version
//! cache use to publish files: readers either see the old file or the new
//! one, never a half-written body.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::{AppError, Result};
use crate::feed::DocumentDigest;

/// Write `contents` to `path` via a temp file and rename.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents).map_err(|e| {
        AppError::Storage(format!("Failed to write {}: {e}", tmp_path.display()))
    })?;
    fs::rename(&tmp_path, path).map_err(|e| {
        AppError::Storage(format!("Failed to publish {}: {e}", path.display()))
    })?;
    Ok(())
}

/// Store of per-document digest files
pub struct DigestStore {
    root: PathBuf,
}

impl DigestStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the digest blob for a document id
    pub fn path_for(&self, id: &str) -> PathBuf {
        let hash = format!("{:x}", Sha256::digest(id.as_bytes()));
        self.root
            .join(&hash[..2])
            .join(&hash[2..4])
            .join(format!("{id}.json"))
    }

    /// Persist one digest, creating its bucket directories as needed
    pub fn save(&self, digest: &DocumentDigest) -> Result<()> {
        let path = self.path_for(&digest.id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(digest)?;
        write_atomic(&path, &json)?;
        tracing::debug!("Saved digest for '{}' at {}", digest.id, path.display());
        Ok(())
    }
}
