//! Shared server state

use std::sync::Arc;

use crate::collection::FeedIndex;

/// State handed to every request handler.
///
/// The index is built once before the listener starts and never mutated;
/// handlers hold a shared read-only snapshot.
#[derive(Clone)]
pub struct AppState {
    pub index: Arc<FeedIndex>,
}

impl AppState {
    pub fn new(index: FeedIndex) -> Self {
        Self {
            index: Arc::new(index),
        }
    }
}
