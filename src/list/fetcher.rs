use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

use serde_json::Value;
use tracing::debug;

use crate::client::cache::{CacheKey, FetchMode, PageCache};
use crate::client::descriptor::Endpoint;
use crate::client::transport::Transport;
use crate::common::error::AdminError;
use crate::common::response::{ListData, ListEnvelope};
use crate::query::filter::{FilterSet, query_pairs};

/// Fetches one page of a resource collection through the shared cache.
pub struct PageFetcher {
    resource: String,
    transport: Arc<dyn Transport>,
    cache: Arc<PageCache>,
}

impl PageFetcher {
    pub fn new(resource: &str, transport: Arc<dyn Transport>, cache: Arc<PageCache>) -> Self {
        Self {
            resource: resource.to_string(),
            transport,
            cache,
        }
    }

    pub async fn fetch(
        &self,
        endpoint: &Endpoint,
        query: &FilterSet,
        mode: FetchMode,
    ) -> Result<ListData<Value>, AdminError> {
        let key = CacheKey {
            resource: self.resource.clone(),
            mode,
            query: serde_json::to_string(query)?,
        };

        if let Some(hit) = self.cache.get(&key) {
            debug!(resource = %self.resource, "cache hit");
            return Ok(hit);
        }

        let raw = self
            .transport
            .execute(endpoint, &endpoint.path, &query_pairs(query), None)
            .await?;

        let envelope: ListEnvelope<Value> = serde_json::from_value(raw)?;
        if !envelope.result {
            let code = envelope.code.unwrap_or_else(|| "UNKNOWN".to_string());
            return Err(AdminError::Business { code });
        }

        let data = envelope
            .data
            .ok_or_else(|| AdminError::Transport("successful response without data".to_string()))?;

        self.cache.put(key, data.clone());
        Ok(data)
    }
}

/// Accumulating page state for infinite mode. `begin_load` is the
/// single-flight gate: it refuses a second load while one is outstanding,
/// which also guarantees pages are appended in request order.
#[derive(Default)]
pub struct InfiniteList {
    items: Mutex<Vec<Value>>,
    pages_loaded: AtomicU32,
    total_pages: AtomicU32,
    total_elements: AtomicU64,
    in_flight: AtomicBool,
}

impl InfiniteList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&self) {
        self.items.lock().unwrap().clear();
        self.pages_loaded.store(0, Ordering::Release);
        self.total_pages.store(0, Ordering::Release);
        self.total_elements.store(0, Ordering::Release);
        self.in_flight.store(false, Ordering::Release);
    }

    /// Next 0-based server page to request.
    pub fn next_page(&self) -> u32 {
        self.pages_loaded.load(Ordering::Acquire)
    }

    pub fn has_next_page(&self) -> bool {
        let loaded = self.pages_loaded.load(Ordering::Acquire);
        loaded == 0 || loaded < self.total_pages.load(Ordering::Acquire)
    }

    /// Claims the in-flight slot. Returns false when a load is already
    /// outstanding.
    pub fn begin_load(&self) -> bool {
        !self.in_flight.swap(true, Ordering::AcqRel)
    }

    pub fn abort_load(&self) {
        self.in_flight.store(false, Ordering::Release);
    }

    pub fn append(&self, page: ListData<Value>) -> usize {
        let appended = page.content.len();
        self.items.lock().unwrap().extend(page.content);
        self.pages_loaded.fetch_add(1, Ordering::AcqRel);
        self.total_pages.store(page.total_pages, Ordering::Release);
        self.total_elements.store(page.total_elements, Ordering::Release);
        self.in_flight.store(false, Ordering::Release);
        appended
    }

    pub fn items(&self) -> Vec<Value> {
        self.items.lock().unwrap().clone()
    }

    pub fn totals(&self) -> (u32, u64) {
        (
            self.total_pages.load(Ordering::Acquire),
            self.total_elements.load(Ordering::Acquire),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(ids: &[i64], total_pages: u32) -> ListData<Value> {
        ListData {
            content: ids.iter().map(|id| json!({ "id": id })).collect(),
            total_elements: 10,
            total_pages,
        }
    }

    #[test]
    fn single_flight_gate() {
        let list = InfiniteList::new();
        assert!(list.begin_load());
        assert!(!list.begin_load());
        list.append(page(&[1, 2], 3));
        assert!(list.begin_load());
    }

    #[test]
    fn pages_accumulate_and_track_next() {
        let list = InfiniteList::new();
        assert!(list.has_next_page());
        assert_eq!(list.next_page(), 0);

        list.append(page(&[1, 2], 2));
        assert_eq!(list.next_page(), 1);
        assert!(list.has_next_page());

        list.append(page(&[3], 2));
        assert_eq!(list.items().len(), 3);
        assert!(!list.has_next_page());
    }

    #[test]
    fn abort_releases_the_gate() {
        let list = InfiniteList::new();
        assert!(list.begin_load());
        list.abort_load();
        assert!(list.begin_load());
    }
}
