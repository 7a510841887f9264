//! Framework-agnostic list management engine for the MovieHub back office.
//!
//! A page declares its resource endpoints and list options, gets back a
//! [`list::manager::ListManager`] and renders from its snapshots; filter
//! layering, pagination, the keyed page cache, permission gating, delete and
//! drag-reorder flows all live here. The view layer stays a thin shell.

pub mod client;
pub mod common;
pub mod config;
pub mod list;
pub mod query;
pub mod session;

pub use client::cache::{FetchMode, PageCache};
pub use client::descriptor::{Endpoint, ResourceApi};
pub use client::transport::{HttpTransport, Transport};
pub use common::error::AdminError;
pub use common::notify::{Notifier, TracingNotifier};
pub use list::manager::{ListManager, ListSnapshot, LoadMore, ScrollMetrics};
pub use query::filter::{FieldRule, FilterRules, FilterSet};
pub use query::pagination::Pagination;
pub use list::mutation::{DeleteOptions, DeleteOutcome};
pub use list::options::{ActionKind, ListOptions, RowAction, SearchField, StatusOption};
pub use list::reorder::{OrderingUpdate, ReorderItem, ReorderList, ReorderSync};
pub use session::{PermissionCheck, Session};
