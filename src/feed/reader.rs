//! Feed consumer
//!
//! Walks a page chain from a single entry point: resolve the meta document,
//! follow `feed` to the first page, then follow each page's `next` against
//! the page's own location until a page has no `next`. The cursor inside
//! `next` stays opaque, which is what lets the same traversal work against
//! both the on-disk chain and the live server.
//!
//! Traversal is single-pass and non-restartable. The first transport or
//! decoding failure aborts it; there is no retry and no resume state.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, Result};
use crate::feed::{FeedMeta, FeedPage};

/// Where a feed document lives: an HTTP(S) URL or a filesystem path
#[derive(Debug, Clone)]
pub enum Location {
    Url(Url),
    Path(PathBuf),
}

impl Location {
    /// Interpret a command-line location string. Anything that does not
    /// parse as an http(s) URL is treated as a filesystem path.
    pub fn parse(raw: &str) -> Self {
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Location::Url(url),
            _ => Location::Path(PathBuf::from(raw)),
        }
    }

    /// Resolve a reference from a document fetched at this location.
    ///
    /// Handles both page-relative references ("2.json", "?lt=...") and
    /// root-relative ones ("/feed/2.json").
    pub fn resolve(&self, reference: &str) -> Result<Location> {
        match self {
            Location::Url(base) => {
                let joined = base.join(reference).map_err(|e| AppError::Schema {
                    location: base.to_string(),
                    message: format!("unresolvable reference '{reference}': {e}"),
                })?;
                Ok(Location::Url(joined))
            }
            Location::Path(base) => {
                let reference = Path::new(reference);
                if reference.is_absolute() {
                    return Ok(Location::Path(reference.to_path_buf()));
                }
                let parent = base.parent().unwrap_or_else(|| Path::new(""));
                Ok(Location::Path(parent.join(reference)))
            }
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Url(url) => write!(f, "{url}"),
            Location::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Consumer over either feed variant
#[derive(Debug)]
pub struct FeedReader {
    client: Client,
}

impl FeedReader {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("docfeed/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Transport {
                location: "client".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Resolve the entry point and start a traversal at the first page
    pub async fn traverse(&self, entry: &Location) -> Result<FeedTraversal<'_>> {
        let meta: FeedMeta = self.fetch_json(entry).await?;
        tracing::debug!("Walking collection '{}' from {}", meta.name, entry);
        let first = entry.resolve(&meta.feed)?;
        Ok(FeedTraversal {
            reader: self,
            next: Some(first),
        })
    }

    async fn fetch_json<T: DeserializeOwned>(&self, location: &Location) -> Result<T> {
        let body = match location {
            Location::Url(url) => {
                let response = self.client.get(url.clone()).send().await.map_err(|e| {
                    AppError::Transport {
                        location: url.to_string(),
                        message: e.to_string(),
                    }
                })?;
                let status = response.status();
                if !status.is_success() {
                    return Err(AppError::Transport {
                        location: url.to_string(),
                        message: format!("unexpected status {status}"),
                    });
                }
                response.bytes().await.map_err(|e| AppError::Transport {
                    location: url.to_string(),
                    message: e.to_string(),
                })?
            }
            Location::Path(path) => fs::read(path)
                .map_err(|e| AppError::Transport {
                    location: path.display().to_string(),
                    message: e.to_string(),
                })?
                .into(),
        };

        serde_json::from_slice(&body).map_err(|e| AppError::Schema {
            location: location.to_string(),
            message: e.to_string(),
        })
    }
}

/// One in-progress walk down a page chain
#[derive(Debug)]
pub struct FeedTraversal<'a> {
    reader: &'a FeedReader,
    next: Option<Location>,
}

impl FeedTraversal<'_> {
    /// Fetch the next page, or `None` once the previous page had no `next`
    pub async fn next_page(&mut self) -> Result<Option<FeedPage>> {
        let Some(location) = self.next.take() else {
            return Ok(None);
        };

        let page: FeedPage = self.reader.fetch_json(&location).await?;
        self.next = match &page.next {
            Some(reference) => Some(location.resolve(reference)?),
            None => None,
        };
        Ok(Some(page))
    }
}
