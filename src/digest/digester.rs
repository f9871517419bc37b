//! Document digestion
//!
//! Runs the extractor over a source item, persists the full digest to the
//! store, and records the assigned version in the cache. A cache hit skips
//! all of that and returns the previously assigned version, which is what
//! makes repeated producer runs incremental and idempotent.

use chrono::Utc;

use crate::collection::SourceItem;
use crate::digest::{ContentExtractor, VersionCache};
use crate::error::Result;
use crate::feed::{DocumentContent, DocumentDigest, DocumentView};
use crate::store::DigestStore;

/// Build the digest record for an item from extracted content
pub fn assemble_digest(
    item: &SourceItem,
    version: &str,
    content: DocumentContent,
) -> DocumentDigest {
    DocumentDigest {
        id: item.id.clone(),
        version: version.to_string(),
        content,
        views: vec![DocumentView {
            name: "html".to_string(),
            url: item.rel_path.to_string_lossy().into_owned(),
        }],
    }
}

/// Cache-gated digestion of source items
pub struct DocumentDigester<'a> {
    extractor: &'a dyn ContentExtractor,
    store: &'a DigestStore,
    cache: &'a mut VersionCache,
    force: bool,
    digested: usize,
    skipped: usize,
}

impl<'a> DocumentDigester<'a> {
    pub fn new(
        extractor: &'a dyn ContentExtractor,
        store: &'a DigestStore,
        cache: &'a mut VersionCache,
        force: bool,
    ) -> Self {
        Self {
            extractor,
            store,
            cache,
            force,
            digested: 0,
            skipped: 0,
        }
    }

    /// Digest one item and return its version token.
    ///
    /// Extraction failures propagate and abort the enclosing batch; there
    /// is no per-document isolation.
    pub fn digest(&mut self, item: &SourceItem) -> Result<String> {
        if !self.force {
            if let Some(version) = self.cache.lookup(&item.id) {
                tracing::debug!("Cache hit for '{}', version {}", item.id, version);
                self.skipped += 1;
                return Ok(version.to_string());
            }
        }

        let content = self.extractor.extract(item)?;
        let version = Utc::now().to_rfc3339();
        let digest = assemble_digest(item, &version, content);

        self.store.save(&digest)?;
        self.cache.record(&item.id, &version)?;
        self.digested += 1;

        tracing::debug!("Digested '{}' as version {}", item.id, version);
        Ok(version)
    }

    /// Documents extracted and persisted in this run
    pub fn digested(&self) -> usize {
        self.digested
    }

    /// Documents skipped on a cache hit
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
