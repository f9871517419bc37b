//! Live feed server assembly

use axum::{http::Uri, Router};
use tower_http::trace::TraceLayer;

use crate::error::{AppError, Result};
use crate::routes;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

/// Assemble the application router over a prepared state snapshot
pub fn app(state: AppState) -> Router {
    routes::router()
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bind the listen address and serve until interrupted
pub async fn serve(listen: &str, state: AppState) -> Result<()> {
    let name = state.index.name().to_string();
    let documents = state.index.len();

    let listener = tokio::net::TcpListener::bind(listen).await?;
    tracing::info!(
        "Serving '{}' ({} documents) on {}",
        name,
        documents,
        listener.local_addr()?
    );
    axum::serve(listener, app(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::{CollectionScanner, FeedIndex};
    use crate::feed::{FeedReader, Location};
    use std::collections::HashSet;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn seed_collection(dir: &Path, count: usize) {
        for n in 0..count {
            let name = format!("doc{n:04}.html");
            fs::write(dir.join(name), format!("<p>document {n}</p>")).unwrap();
        }
    }

    #[tokio::test]
    async fn test_consumer_walks_the_live_feed_end_to_end() {
        let source = TempDir::new().unwrap();
        seed_collection(source.path(), 250);

        let items = CollectionScanner::new(source.path()).scan().unwrap();
        let state = AppState::new(FeedIndex::new("Live Collection".to_string(), items));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app(state)).await.unwrap();
        });

        let reader = FeedReader::new().unwrap();
        let entry = Location::parse(&format!("http://{addr}/"));
        let mut traversal = reader.traverse(&entry).await.unwrap();

        let mut page_sizes = Vec::new();
        let mut ids = HashSet::new();
        while let Some(page) = traversal.next_page().await.unwrap() {
            page_sizes.push(page.documents.len());
            for doc in page.documents {
                assert!(ids.insert(doc.id.clone()), "duplicate id {}", doc.id);
            }
        }

        assert_eq!(page_sizes, vec![100, 100, 50]);
        assert_eq!(ids.len(), 250);
    }
}
