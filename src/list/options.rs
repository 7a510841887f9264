use std::sync::Arc;

use crate::client::cache::FetchMode;
use crate::client::descriptor::ResourceApi;
use crate::query::filter::{FilterRules, FilterSet};

/// Row-level affordance shown in a table's action column. Included for a row
/// iff the permission gate passes and the visibility predicate holds.
#[derive(Clone)]
pub struct RowAction<T> {
    pub kind: ActionKind,
    pub permission_code: Option<String>,
    pub visible: Visibility<T>,
}

impl<T> RowAction<T> {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            permission_code: None,
            visible: Visibility::Always,
        }
    }

    pub fn with_permission(mut self, code: &str) -> Self {
        self.permission_code = Some(code.to_string());
        self
    }

    pub fn visible_when(mut self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.visible = Visibility::When(Arc::new(predicate));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    Edit,
    Delete,
    Custom(String),
}

#[derive(Clone)]
pub enum Visibility<T> {
    Always,
    When(Arc<dyn Fn(&T) -> bool + Send + Sync>),
}

impl<T> Visibility<T> {
    pub fn allows(&self, row: &T) -> bool {
        match self {
            Visibility::Always => true,
            Visibility::When(predicate) => predicate(row),
        }
    }
}

/// Search-form field description. The view layer renders the form; a submit
/// comes back through `ListManager::change_query_filter`.
#[derive(Debug, Clone)]
pub struct SearchField {
    pub key: String,
    pub label: String,
    pub kind: SearchFieldKind,
}

#[derive(Debug, Clone)]
pub enum SearchFieldKind {
    Text,
    Select(Vec<StatusOption>),
    DateRange,
}

/// Status-column entry mapping a stored status value to its display label.
#[derive(Debug, Clone)]
pub struct StatusOption {
    pub value: i64,
    pub label: String,
}

impl StatusOption {
    pub fn new(value: i64, label: &str) -> Self {
        Self {
            value,
            label: label.to_string(),
        }
    }
}

/// Declaration a page hands to `ListManager` for one resource list.
#[derive(Clone)]
pub struct ListOptions<T> {
    pub resource: String,
    pub api: ResourceApi,
    pub default_filters: FilterSet,
    pub rules: FilterRules,
    pub page_size: u32,
    pub mode: FetchMode,
    pub search_fields: Vec<SearchField>,
    pub statuses: Vec<StatusOption>,
    pub actions: Vec<RowAction<T>>,
}

impl<T> ListOptions<T> {
    pub fn new(resource: &str, api: ResourceApi) -> Self {
        Self {
            resource: resource.to_string(),
            api,
            default_filters: FilterSet::new(),
            rules: FilterRules::new(),
            page_size: 20,
            mode: FetchMode::Paged,
            search_fields: Vec::new(),
            statuses: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn with_default_filters(mut self, filters: FilterSet) -> Self {
        self.default_filters = filters;
        self
    }

    pub fn with_rules(mut self, rules: FilterRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn infinite(mut self) -> Self {
        self.mode = FetchMode::Infinite;
        self
    }

    pub fn with_search_fields(mut self, fields: Vec<SearchField>) -> Self {
        self.search_fields = fields;
        self
    }

    pub fn with_statuses(mut self, statuses: Vec<StatusOption>) -> Self {
        self.statuses = statuses;
        self
    }

    pub fn with_actions(mut self, actions: Vec<RowAction<T>>) -> Self {
        self.actions = actions;
        self
    }
}
