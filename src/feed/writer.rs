//! Batch feed writer
//!
//! Lays a scanned collection out as a chain of immutable page files plus a
//! movable entry point. Pages are numbered from 1 upwards in ascending
//! sort-key order; page `i` links back to page `i-1`, so a consumer that
//! starts at the entry point and follows `next` walks the whole collection
//! newest page first and stops at page 1.
//!
//! Chunking is positional: items are sliced into consecutive runs of
//! `chunk_size` in a single forward pass. Inserting new items earlier in
//! sort order therefore shifts which page later items land on across runs.

use std::fs;
use std::path::PathBuf;

use crate::collection::SourceItem;
use crate::digest::DocumentDigester;
use crate::error::Result;
use crate::feed::{DocumentSummary, FeedMeta, FeedPage};
use crate::store::write_atomic;

/// Outcome of one publish run
#[derive(Debug)]
pub struct PublishReport {
    pub pages: usize,
    pub documents: usize,
}

/// Writer for the on-disk page chain
pub struct FeedPageWriter {
    out_root: PathBuf,
    chunk_size: usize,
    collection_name: String,
}

impl FeedPageWriter {
    pub fn new(out_root: impl Into<PathBuf>, chunk_size: usize, collection_name: String) -> Self {
        Self {
            out_root: out_root.into(),
            chunk_size,
            collection_name,
        }
    }

    /// Digest every item and publish the page chain, then repoint the entry
    /// point at the newest page.
    ///
    /// Page files are published atomically, and the meta pointer is only
    /// republished after the highest page exists, so a concurrent reader
    /// always finds a complete chain beneath whatever entry point it reads.
    pub fn publish(
        &self,
        items: &[SourceItem],
        digester: &mut DocumentDigester,
    ) -> Result<PublishReport> {
        tracing::info!(
            "Publishing {} documents in pages of {}",
            items.len(),
            self.chunk_size
        );

        let feed_dir = self.out_root.join("feed");
        fs::create_dir_all(&feed_dir)?;

        // An empty collection still publishes one empty page so the entry
        // point always resolves to a page.
        let chunks: Vec<&[SourceItem]> = if items.is_empty() {
            vec![items]
        } else {
            items.chunks(self.chunk_size).collect()
        };

        for (index, chunk) in chunks.iter().enumerate() {
            let number = index + 1;
            let mut documents = Vec::with_capacity(chunk.len());
            for item in *chunk {
                let version = digester.digest(item)?;
                documents.push(DocumentSummary {
                    id: item.id.clone(),
                    version,
                });
            }

            let page = FeedPage {
                documents,
                next: (number > 1).then(|| format!("{}.json", number - 1)),
            };
            let path = feed_dir.join(format!("{number}.json"));
            write_atomic(&path, &serde_json::to_vec_pretty(&page)?)?;
        }

        let latest = chunks.len();
        let meta = FeedMeta {
            name: self.collection_name.clone(),
            feed: format!("feed/{latest}.json"),
        };
        write_atomic(
            &self.out_root.join("meta.json"),
            &serde_json::to_vec_pretty(&meta)?,
        )?;

        tracing::info!(
            "Published {} pages, {} digested, {} unchanged",
            latest,
            digester.digested(),
            digester.skipped()
        );
        Ok(PublishReport {
            pages: latest,
            documents: items.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::CollectionScanner;
    use crate::digest::{DocumentDigester, HtmlExtractor, VersionCache};
    use crate::store::DigestStore;
    use std::collections::HashSet;
    use std::path::Path;
    use tempfile::TempDir;

    fn seed_collection(dir: &Path, count: usize) {
        for n in 0..count {
            let name = format!("doc{n:04}.html");
            fs::write(dir.join(name), format!("<p>document {n}</p>")).unwrap();
        }
    }

    fn publish(source: &Path, out: &Path, chunk_size: usize) -> PublishReport {
        let items = CollectionScanner::new(source).scan().unwrap();
        let store = DigestStore::new(out.join("documents"));
        let mut cache = VersionCache::open(out.join("versions.json")).unwrap();
        let extractor = HtmlExtractor::new();
        let mut digester = DocumentDigester::new(&extractor, &store, &mut cache, false);
        let writer = FeedPageWriter::new(out, chunk_size, "Test Collection".to_string());
        writer.publish(&items, &mut digester).unwrap()
    }

    fn read_page(out: &Path, number: usize) -> FeedPage {
        let raw = fs::read(out.join("feed").join(format!("{number}.json"))).unwrap();
        serde_json::from_slice(&raw).unwrap()
    }

    fn read_meta(out: &Path) -> FeedMeta {
        let raw = fs::read(out.join("meta.json")).unwrap();
        serde_json::from_slice(&raw).unwrap()
    }

    #[test]
    fn test_250_items_make_3_backward_linked_pages() {
        let source = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        seed_collection(source.path(), 250);

        let report = publish(source.path(), out.path(), 100);
        assert_eq!(report.pages, 3);
        assert_eq!(report.documents, 250);

        let meta = read_meta(out.path());
        assert_eq!(meta.name, "Test Collection");
        assert_eq!(meta.feed, "feed/3.json");

        // the newest page is the short one
        let page3 = read_page(out.path(), 3);
        let page2 = read_page(out.path(), 2);
        let page1 = read_page(out.path(), 1);
        assert_eq!(page3.documents.len(), 50);
        assert_eq!(page2.documents.len(), 100);
        assert_eq!(page1.documents.len(), 100);

        assert_eq!(page3.next.as_deref(), Some("2.json"));
        assert_eq!(page2.next.as_deref(), Some("1.json"));
        assert!(page1.next.is_none());

        // every id appears exactly once across the chain
        let mut ids = HashSet::new();
        for page in [&page1, &page2, &page3] {
            for doc in &page.documents {
                assert!(ids.insert(doc.id.clone()), "duplicate id {}", doc.id);
            }
        }
        assert_eq!(ids.len(), 250);
    }

    #[test]
    fn test_no_page_exceeds_chunk_size() {
        let source = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        seed_collection(source.path(), 17);

        let report = publish(source.path(), out.path(), 5);
        assert_eq!(report.pages, 4);
        for number in 1..=4 {
            assert!(read_page(out.path(), number).documents.len() <= 5);
        }
    }

    #[test]
    fn test_republish_is_idempotent() {
        let source = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        seed_collection(source.path(), 12);

        publish(source.path(), out.path(), 5);
        let first_pages: Vec<Vec<u8>> = (1..=3)
            .map(|n| fs::read(out.path().join("feed").join(format!("{n}.json"))).unwrap())
            .collect();
        let first_versions = fs::read(out.path().join("versions.json")).unwrap();

        // unchanged source: every document is a cache hit and the chain is
        // byte-identical
        publish(source.path(), out.path(), 5);
        for (n, before) in (1..=3).zip(&first_pages) {
            let after = fs::read(out.path().join("feed").join(format!("{n}.json"))).unwrap();
            assert_eq!(&after, before, "page {n} changed across runs");
        }
        assert_eq!(
            fs::read(out.path().join("versions.json")).unwrap(),
            first_versions
        );
    }

    #[tokio::test]
    async fn test_consumer_walks_the_published_chain_newest_first() {
        use crate::feed::{FeedReader, Location};

        let source = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        seed_collection(source.path(), 250);
        publish(source.path(), out.path(), 100);

        let reader = FeedReader::new().unwrap();
        let entry = Location::Path(out.path().join("meta.json"));
        let mut traversal = reader.traverse(&entry).await.unwrap();

        let mut page_sizes = Vec::new();
        let mut ids = HashSet::new();
        while let Some(page) = traversal.next_page().await.unwrap() {
            page_sizes.push(page.documents.len());
            for doc in page.documents {
                assert!(ids.insert(doc.id.clone()), "duplicate id {}", doc.id);
            }
        }

        // the short newest page comes first, then the full older pages
        assert_eq!(page_sizes, vec![50, 100, 100]);
        assert_eq!(ids.len(), 250);
    }

    #[test]
    fn test_empty_collection_publishes_one_empty_page() {
        let source = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        let report = publish(source.path(), out.path(), 100);
        assert_eq!(report.pages, 1);
        assert_eq!(report.documents, 0);

        assert_eq!(read_meta(out.path()).feed, "feed/1.json");
        let page = read_page(out.path(), 1);
        assert!(page.documents.is_empty());
        assert!(page.next.is_none());
    }
}
