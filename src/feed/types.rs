//! Wire types shared by both feed producers and the consumer
//!
//! Everything here serializes to the JSON shapes that travel between a
//! producer and a consumer: the meta entry point, the page, and the
//! per-document digest. Both the batch writer and the live server emit
//! exactly these shapes, which is what lets one consumer walk either chain.

use serde::{Deserialize, Serialize};

/// Maximum number of document summaries in one feed response or batch page.
pub const FEED_PAGE_SIZE: usize = 100;

/// The single entry point a consumer starts from.
///
/// `feed` is a relative or absolute reference to the first page, resolved
/// against the location the meta document itself was fetched from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedMeta {
    pub name: String,
    pub feed: String,
}

/// An ordered, bounded batch of document summaries.
///
/// `next` carries the continuation cursor as an application-opaque string:
/// a page file name for the batch variant, a `?lt=` threshold query for the
/// live variant. An absent `next` is the only end-of-chain signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPage {
    pub documents: Vec<DocumentSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// One document as listed in a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: String,
    pub version: String,
}

/// The full content record of one document, fetched separately per id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentDigest {
    pub id: String,
    pub version: String,
    pub content: DocumentContent,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub views: Vec<DocumentView>,
}

/// Extracted content of a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentContent {
    pub title: String,
    pub text: String,
}

/// A named rendition of the raw source behind a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentView {
    pub name: String,
    pub url: String,
}
