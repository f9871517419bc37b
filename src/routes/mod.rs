//! Route table for the live feed server

mod feed;

use axum::{routing::get, Router};

use crate::state::AppState;

/// The full route table. Everything not listed here falls through to the
/// JSON not-found response in [`crate::server`].
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(feed::meta))
        .route("/feed", get(feed::feed))
}
