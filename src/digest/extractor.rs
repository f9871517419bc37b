//! Content extraction
//!
//! The digester only ever talks to the [`ContentExtractor`] trait, so the
//! extraction tool can be swapped without touching digestion or feed code.
//! [`HtmlExtractor`] is the default: it strips markup and collapses
//! whitespace, titling the document with its id.

use std::fs;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::collection::SourceItem;
use crate::error::{AppError, Result};
use crate::feed::DocumentContent;

static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern compiles"));

/// Turns one raw source file into (title, text)
pub trait ContentExtractor {
    fn extract(&self, item: &SourceItem) -> Result<DocumentContent>;
}

/// Tag-stripping extractor for HTML sources
#[derive(Default)]
pub struct HtmlExtractor;

impl HtmlExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ContentExtractor for HtmlExtractor {
    fn extract(&self, item: &SourceItem) -> Result<DocumentContent> {
        let raw = fs::read(&item.path).map_err(|e| AppError::Extraction {
            id: item.id.clone(),
            message: e.to_string(),
        })?;
        // Archives mix encodings; decode lossily rather than reject.
        let html = String::from_utf8_lossy(&raw);

        let stripped = TAG_PATTERN.replace_all(&html, " ");
        let text = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

        Ok(DocumentContent {
            title: item.id.clone(),
            text,
        })
    }
}
