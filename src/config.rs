//! Configuration management for docfeed

use std::env;

use crate::feed::FEED_PAGE_SIZE;

#[derive(Debug, Clone)]
pub struct Config {
    /// Collection name published in the meta document
    pub collection_name: String,
    /// Batch page size; the live server always serves pages of
    /// [`FEED_PAGE_SIZE`]
    pub chunk_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            collection_name: "Document Collection".to_string(),
            chunk_size: FEED_PAGE_SIZE,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            collection_name: env::var("DOCFEED_COLLECTION_NAME")
                .unwrap_or_else(|_| "Document Collection".to_string()),
            chunk_size: env::var("DOCFEED_CHUNK_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(FEED_PAGE_SIZE),
        }
    }
}
