use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;

use crate::common::response::ListData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchMode {
    Paged,
    Infinite,
}

/// Cache key: resource, fetch mode and the serialized canonical query. Keying
/// by the full query is what makes a late response for an old filter state
/// harmless; it lands under its own key instead of the current one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub resource: String,
    pub mode: FetchMode,
    pub query: String,
}

/// Shared keyed store for fetched pages. No TTL; entries are replaced by
/// newer fetches of the same key or removed by explicit invalidation.
#[derive(Default)]
pub struct PageCache {
    entries: DashMap<CacheKey, ListData<Value>>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<ListData<Value>> {
        self.entries.get(key).map(|entry| entry.clone())
    }

    pub fn put(&self, key: CacheKey, data: ListData<Value>) {
        self.entries.insert(key, data);
    }

    /// Drops every entry for the resource, both paged and infinite, after a
    /// mutation made them stale.
    pub fn invalidate_resource(&self, resource: &str) {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.resource != resource);
        debug!(
            resource,
            removed = before.saturating_sub(self.entries.len()),
            "invalidated cached pages"
        );
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> ListData<Value> {
        ListData {
            content: vec![],
            total_elements: 0,
            total_pages: 0,
        }
    }

    fn key(resource: &str, mode: FetchMode, query: &str) -> CacheKey {
        CacheKey {
            resource: resource.to_string(),
            mode,
            query: query.to_string(),
        }
    }

    #[test]
    fn invalidation_covers_both_modes_for_one_resource() {
        let cache = PageCache::new();
        cache.put(key("movie", FetchMode::Paged, "page=0"), page());
        cache.put(key("movie", FetchMode::Infinite, "page=0"), page());
        cache.put(key("person", FetchMode::Paged, "page=0"), page());

        cache.invalidate_resource("movie");

        assert_eq!(cache.len(), 1);
        assert!(cache.get(&key("person", FetchMode::Paged, "page=0")).is_some());
    }

    #[test]
    fn distinct_queries_are_distinct_keys() {
        let cache = PageCache::new();
        cache.put(key("movie", FetchMode::Paged, "page=0"), page());
        cache.put(key("movie", FetchMode::Paged, "page=1"), page());
        assert_eq!(cache.len(), 2);
    }
}
