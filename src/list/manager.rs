use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::client::cache::{FetchMode, PageCache};
use crate::client::transport::Transport;
use crate::common::error::AdminError;
use crate::common::notify::Notifier;
use crate::query::filter::{FilterLayers, FilterSet, url_partial};
use crate::query::pagination::Pagination;
use crate::query::params::{PAGE_KEY, QueryBridge, WriteMode};
use crate::session::{PermissionCheck, Session};

use super::fetcher::{InfiniteList, PageFetcher};
use super::mutation::{DeleteOptions, DeleteOutcome, MutationExecutor};
use super::options::{ListOptions, RowAction, SearchField};

/// Scroll threshold (px from the bottom) at which infinite mode loads the
/// next page.
const SCROLL_LOAD_THRESHOLD: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMore {
    Appended(usize),
    AlreadyLoading,
    NoMorePages,
    NotTriggered,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub viewport_height: f64,
    pub content_height: f64,
}

impl ScrollMetrics {
    fn near_bottom(&self) -> bool {
        self.content_height - (self.scroll_top + self.viewport_height) <= SCROLL_LOAD_THRESHOLD
    }
}

/// Everything the view layer needs to render the list right now.
#[derive(Debug, Clone)]
pub struct ListSnapshot<T> {
    pub rows: Vec<T>,
    pub pagination: Pagination,
    pub loading: bool,
    pub last_error_code: Option<String>,
    /// Serialized query string the address bar should currently show.
    pub url_query: String,
}

struct ListState<T> {
    bridge: QueryBridge,
    hidden: FilterSet,
    rows: Vec<T>,
    pagination: Pagination,
    loading: bool,
    last_error_code: Option<String>,
}

/// The list management contract: one of these per resource list on a page.
/// Owns filter layering, pagination, fetching through the shared cache,
/// permission-gated actions and the delete flow. Data and callbacks only;
/// rendering belongs to the host.
pub struct ListManager<T> {
    options: ListOptions<T>,
    session: Session,
    notifier: Arc<dyn Notifier>,
    fetcher: PageFetcher,
    mutations: MutationExecutor,
    state: RwLock<ListState<T>>,
    infinite: InfiniteList,
}

impl<T> ListManager<T>
where
    T: DeserializeOwned + Clone + Send + Sync,
{
    pub fn new(
        options: ListOptions<T>,
        session: Session,
        transport: Arc<dyn Transport>,
        cache: Arc<PageCache>,
        notifier: Arc<dyn Notifier>,
        initial_query: &str,
    ) -> Self {
        let bridge = QueryBridge::from_query_string(initial_query);
        let mut pagination = Pagination::new(options.page_size);
        pagination.current = bridge.display_page();

        let fetcher = PageFetcher::new(&options.resource, Arc::clone(&transport), Arc::clone(&cache));
        let mutations = MutationExecutor::new(
            &options.resource,
            transport,
            cache,
            Arc::clone(&notifier),
        );

        Self {
            options,
            session,
            notifier,
            fetcher,
            mutations,
            state: RwLock::new(ListState {
                bridge,
                hidden: FilterSet::new(),
                rows: Vec::new(),
                pagination,
                loading: false,
                last_error_code: None,
            }),
            infinite: InfiniteList::new(),
        }
    }

    pub fn mutations(&self) -> &MutationExecutor {
        &self.mutations
    }

    fn layers(&self, state: &ListState<T>) -> FilterLayers {
        let url: FilterSet = state
            .bridge
            .read()
            .into_iter()
            .filter(|(key, _)| key.as_str() != PAGE_KEY)
            .map(|(key, value)| (key, Value::String(value)))
            .collect();
        FilterLayers {
            defaults: self.options.default_filters.clone(),
            url,
            hidden: state.hidden.clone(),
        }
    }

    /// Server-bound parameter map for the given 1-based display page.
    fn canonical_query(&self, state: &ListState<T>, display_page: u32) -> FilterSet {
        self.layers(state)
            .canonical_query(&self.options.rules, display_page, self.options.page_size)
    }

    /// Fetches the current page (paged mode) or restarts the accumulated list
    /// from page one (infinite mode). Failures notify and keep prior rows.
    pub async fn fetch(&self) -> Result<(), AdminError> {
        let (query, display_page) = {
            let mut state = self.state.write().await;
            state.loading = true;
            let display_page = match self.options.mode {
                FetchMode::Paged => state.bridge.display_page(),
                FetchMode::Infinite => {
                    self.infinite.reset();
                    1
                }
            };
            (self.canonical_query(&state, display_page), display_page)
        };

        let result = self
            .fetcher
            .fetch(&self.options.api.get_list, &query, self.options.mode)
            .await
            .and_then(|data| decode_rows::<T>(&data.content).map(|rows| (data, rows)));

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok((data, rows)) => {
                if self.options.mode == FetchMode::Infinite {
                    self.infinite.append(data.clone());
                }
                state.rows = rows;
                state.pagination.current = display_page;
                state.pagination.total_pages = data.total_pages;
                state.pagination.total_elements = data.total_elements;
                state.last_error_code = None;
                Ok(())
            }
            Err(e) => {
                // Stale-while-revalidate posture: the previous rows stay up.
                warn!(resource = %self.options.resource, "list fetch failed: {e}");
                state.last_error_code = e.code().map(str::to_string);
                self.notifier
                    .error(&format!("Failed to load {} list", self.options.resource));
                Err(e)
            }
        }
    }

    /// Writes the display page to the URL (removing it for page one) and
    /// refetches.
    pub async fn change_pagination(&self, page: u32) -> Result<(), AdminError> {
        {
            let mut state = self.state.write().await;
            let page = page.max(1);
            state.bridge.set_display_page(page);
            state.pagination.current = page;
        }
        self.fetch().await
    }

    /// Replaces the URL filters with a search-form submission and resets to
    /// page one. Keys whose rule keeps them off the server payload are
    /// page-internal and survive the replace; keys kept out of the URL go
    /// into the hidden layer instead, so they still reach the server.
    pub async fn change_query_filter(&self, filters: FilterSet) -> Result<(), AdminError> {
        {
            let mut state = self.state.write().await;
            let preserved: Vec<(String, String)> = state
                .bridge
                .read()
                .into_iter()
                .filter(|(key, _)| {
                    key.as_str() != PAGE_KEY && !self.options.rules.rule(key).send_to_server
                })
                .collect();

            let mut persisted = FilterSet::new();
            for (key, value) in filters {
                if self.options.rules.rule(&key).persist_in_url {
                    persisted.insert(key, value);
                } else if value.is_null() {
                    state.hidden.remove(&key);
                } else {
                    state.hidden.insert(key, value);
                }
            }

            let mut partial: BTreeMap<String, Option<String>> =
                url_partial(&persisted, &self.options.rules);
            for (key, value) in preserved {
                partial.entry(key).or_insert(Some(value));
            }

            state.bridge.write(partial, WriteMode::Replace);
            state.bridge.set_display_page(1);
            state.pagination.current = 1;
        }
        self.fetch().await
    }

    pub async fn set_hidden_filter(&self, key: &str, value: Value) -> Result<(), AdminError> {
        self.set_hidden_filters(FilterSet::from([(key.to_string(), value)]))
            .await
    }

    /// Merges runtime filters that never show in the URL and resets to page
    /// one, since the result set changes shape.
    pub async fn set_hidden_filters(&self, filters: FilterSet) -> Result<(), AdminError> {
        {
            let mut state = self.state.write().await;
            state.hidden.extend(filters);
            state.bridge.set_display_page(1);
            state.pagination.current = 1;
        }
        self.fetch().await
    }

    /// Drops this resource's cached pages and refetches.
    pub async fn reload(&self) -> Result<(), AdminError> {
        self.mutations.invalidate();
        self.fetch().await
    }

    /// Delete flow: runs the mutation and, when the record is gone,
    /// refetches so the page reflects the shrunk collection.
    pub async fn delete(&self, id: &str, options: DeleteOptions) -> Result<DeleteOutcome, AdminError> {
        let outcome = self
            .mutations
            .delete_by_id(&self.options.api, id, &options)
            .await?;
        if outcome == DeleteOutcome::Deleted {
            self.fetch().await?;
        }
        Ok(outcome)
    }

    /// Infinite mode: appends the next page. Refuses while a load is already
    /// in flight, so two rapid calls fetch exactly one page.
    pub async fn load_more(&self) -> Result<LoadMore, AdminError> {
        if self.options.mode != FetchMode::Infinite {
            debug!(resource = %self.options.resource, "load_more ignored in paged mode");
            return Ok(LoadMore::NoMorePages);
        }
        if !self.infinite.has_next_page() {
            return Ok(LoadMore::NoMorePages);
        }
        if !self.infinite.begin_load() {
            return Ok(LoadMore::AlreadyLoading);
        }

        let query = {
            let state = self.state.read().await;
            // next_page is already 0-based; translate back to display form.
            self.canonical_query(&state, self.infinite.next_page() + 1)
        };

        let result = self
            .fetcher
            .fetch(&self.options.api.get_list, &query, FetchMode::Infinite)
            .await;

        let result = result
            .and_then(|data| decode_rows::<T>(&data.content).map(|new_rows| (data, new_rows)));

        match result {
            Ok((data, new_rows)) => {
                let appended = self.infinite.append(data);
                let (total_pages, total_elements) = self.infinite.totals();

                let mut state = self.state.write().await;
                state.rows.extend(new_rows);
                state.pagination.total_pages = total_pages;
                state.pagination.total_elements = total_elements;
                Ok(LoadMore::Appended(appended))
            }
            Err(e) => {
                self.infinite.abort_load();
                warn!(resource = %self.options.resource, "load_more failed: {e}");
                let mut state = self.state.write().await;
                state.last_error_code = e.code().map(str::to_string);
                self.notifier
                    .error(&format!("Failed to load {} list", self.options.resource));
                Err(e)
            }
        }
    }

    /// Scroll trigger for infinite mode: fires `load_more` within 100 px of
    /// the bottom.
    pub async fn handle_scroll_load_more(&self, metrics: ScrollMetrics) -> Result<LoadMore, AdminError> {
        if !metrics.near_bottom() {
            return Ok(LoadMore::NotTriggered);
        }
        self.load_more().await
    }

    pub async fn snapshot(&self) -> ListSnapshot<T> {
        let state = self.state.read().await;
        ListSnapshot {
            rows: state.rows.clone(),
            pagination: state.pagination,
            loading: state.loading,
            last_error_code: state.last_error_code.clone(),
            url_query: state.bridge.serialize(),
        }
    }

    /// Action-column contents for one row: the action's permission gate must
    /// pass (no code means ungated) and its visibility predicate must hold.
    pub fn visible_actions(&self, row: &T) -> Vec<&RowAction<T>> {
        self.options
            .actions
            .iter()
            .filter(|action| {
                let permitted = match &action.permission_code {
                    Some(code) => self
                        .session
                        .has_permission(&PermissionCheck::codes(&[code.as_str()])),
                    None => true,
                };
                permitted && action.visible.allows(row)
            })
            .collect()
    }

    /// Gate for the add affordance: requires a create endpoint, and its
    /// permission code when it carries one.
    pub fn can_create(&self) -> bool {
        match &self.options.api.create {
            Some(endpoint) => match &endpoint.permission_code {
                Some(code) => self
                    .session
                    .has_permission(&PermissionCheck::codes(&[code.as_str()])),
                None => true,
            },
            None => false,
        }
    }

    pub fn search_fields(&self) -> &[SearchField] {
        &self.options.search_fields
    }

    pub fn status_label(&self, value: i64) -> Option<&str> {
        self.options
            .statuses
            .iter()
            .find(|status| status.value == value)
            .map(|status| status.label.as_str())
    }
}

fn decode_rows<T: DeserializeOwned>(items: &[Value]) -> Result<Vec<T>, AdminError> {
    items
        .iter()
        .map(|item| serde_json::from_value(item.clone()).map_err(AdminError::from))
        .collect()
}
