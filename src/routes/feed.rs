//! Live feed endpoints
//!
//! The live producer serves the same page shape the batch writer lays on
//! disk, but paginates with an exclusive threshold cursor over the index's
//! sort keys instead of precomputed files.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::feed::{DocumentSummary, FeedMeta, FeedPage, FEED_PAGE_SIZE};
use crate::state::AppState;

/// Query parameters for the feed endpoint
#[derive(Debug, Deserialize)]
pub struct FeedParams {
    /// Exclusive sort-key threshold; only documents strictly below it are
    /// returned
    pub lt: Option<String>,
}

/// Entry point: names the collection and where its feed starts
pub async fn meta(State(state): State<AppState>) -> Json<FeedMeta> {
    Json(FeedMeta {
        name: state.index.name().to_string(),
        feed: "feed".to_string(),
    })
}

/// One page of document summaries below the `lt` threshold, newest first.
///
/// `next` is present iff the page is full, so a short page marks the end of
/// the stream. A collection of an exact multiple of [`FEED_PAGE_SIZE`]
/// documents therefore costs one extra request that returns an empty page
/// with no `next`; that final round trip is what terminates the client.
pub async fn feed(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> Json<FeedPage> {
    let window = state.index.window(params.lt.as_deref(), FEED_PAGE_SIZE);

    let documents: Vec<DocumentSummary> = window
        .iter()
        .map(|item| DocumentSummary {
            id: item.id.clone(),
            version: item.version.clone(),
        })
        .collect();

    let next = match window.last() {
        Some(last) if documents.len() == FEED_PAGE_SIZE => {
            Some(format!("?lt={}", urlencoding::encode(&last.sort_key)))
        }
        _ => None,
    };

    Json(FeedPage { documents, next })
}
