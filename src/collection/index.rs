//! In-memory collection index for the live feed server
//!
//! Built once from a scan, sorted descending by sort key, and never mutated
//! afterwards. Request handlers receive it as an explicitly passed snapshot
//! and only ever read from it.

use super::SourceItem;

/// Read-only index over a scanned collection
pub struct FeedIndex {
    name: String,
    /// Items in descending sort-key order
    items: Vec<SourceItem>,
}

impl FeedIndex {
    pub fn new(name: String, mut items: Vec<SourceItem>) -> Self {
        items.sort_by(|a, b| b.sort_key.cmp(&a.sort_key));
        Self { name, items }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&SourceItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Items strictly below the threshold, newest first, at most `limit`.
    ///
    /// With no threshold the window starts at the newest item. The threshold
    /// is exclusive: an item whose sort key equals `lt` is not returned.
    pub fn window(&self, lt: Option<&str>, limit: usize) -> &[SourceItem] {
        let start = match lt {
            Some(lt) => self
                .items
                .partition_point(|item| item.sort_key.as_str() >= lt),
            None => 0,
        };
        let end = (start + limit).min(self.items.len());
        &self.items[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn item(id: &str, secs: u64) -> SourceItem {
        SourceItem::new(
            id.to_string(),
            PathBuf::from(format!("/collection/{id}.html")),
            PathBuf::from(format!("{id}.html")),
            secs.to_string(),
        )
    }

    fn index(items: Vec<SourceItem>) -> FeedIndex {
        FeedIndex::new("test".to_string(), items)
    }

    #[test]
    fn test_window_is_descending() {
        let idx = index(vec![item("a", 100), item("c", 300), item("b", 200)]);
        let window = idx.window(None, 10);
        let ids: Vec<&str> = window.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_window_threshold_is_exclusive() {
        let idx = index(vec![item("a", 100), item("b", 200), item("c", 300)]);
        let threshold = format!("{}:{}", 200, "b");
        let window = idx.window(Some(&threshold), 10);
        let ids: Vec<&str> = window.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn test_window_truncates_to_limit() {
        let items = (0..7).map(|n| item(&format!("d{n}"), 100 + n)).collect();
        let idx = index(items);
        assert_eq!(idx.window(None, 3).len(), 3);
    }

    #[test]
    fn test_find() {
        let idx = index(vec![item("a", 100), item("b", 200)]);
        assert_eq!(idx.find("b").map(|i| i.version.as_str()), Some("200"));
        assert!(idx.find("missing").is_none());
    }
}
