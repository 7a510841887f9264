use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::client::descriptor::ResourceApi;
use crate::common::error::AdminError;

use super::mutation::{CommitOutcome, MutationExecutor};

/// Rows that can take part in drag reordering.
pub trait ReorderItem {
    fn item_id(&self) -> String;
}

/// One row of the bulk reordering payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderingUpdate {
    pub id: String,
    pub ordering: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// What happened to the working copy when the source list refetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderSync {
    Unchanged,
    Replaced,
    /// The server sequence changed while local swaps were uncommitted; the
    /// local order was discarded. Callers that want to warn first should
    /// check `is_changed` before triggering the refetch.
    DiscardedLocalChanges,
}

/// Client-local working copy of a sortable list. Diverges from the fetched
/// order only through `on_drag_end` and resynchronizes on every fetch.
pub struct ReorderList<T> {
    working: Vec<T>,
    original_ids: Vec<String>,
    mapper: Arc<dyn Fn(&T, usize) -> OrderingUpdate + Send + Sync>,
}

impl<T: ReorderItem + Clone> ReorderList<T> {
    pub fn new() -> Self {
        Self::with_mapper(|item: &T, index| OrderingUpdate {
            id: item.item_id(),
            ordering: index as i64,
            parent_id: None,
        })
    }
}

impl<T: ReorderItem + Clone> Default for ReorderList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ReorderItem> ReorderList<T> {
    pub fn with_mapper(mapper: impl Fn(&T, usize) -> OrderingUpdate + Send + Sync + 'static) -> Self {
        Self {
            working: Vec::new(),
            original_ids: Vec::new(),
            mapper: Arc::new(mapper),
        }
    }

    /// Adopts a freshly fetched sequence. An uncommitted local order is
    /// discarded, and the outcome says so.
    pub fn sync_from(&mut self, rows: Vec<T>) -> ReorderSync {
        let incoming_ids: Vec<String> = rows.iter().map(|r| r.item_id()).collect();
        let outcome = if incoming_ids == self.original_ids {
            ReorderSync::Unchanged
        } else if self.is_changed() {
            ReorderSync::DiscardedLocalChanges
        } else {
            ReorderSync::Replaced
        };
        self.working = rows;
        self.original_ids = incoming_ids;
        outcome
    }

    pub fn rows(&self) -> &[T] {
        &self.working
    }

    /// True iff the working id-sequence differs from the fetched one.
    pub fn is_changed(&self) -> bool {
        let working_ids: Vec<String> = self.working.iter().map(|r| r.item_id()).collect();
        working_ids != self.original_ids
    }

    /// The commit control only makes sense with at least two rows.
    pub fn can_commit(&self) -> bool {
        self.working.len() > 1
    }

    /// Drop handler: swaps the dragged row with the one at the drop index.
    pub fn on_drag_end(&mut self, from: usize, to: usize) {
        if from == to || from >= self.working.len() || to >= self.working.len() {
            return;
        }
        self.working.swap(from, to);
    }

    pub fn payload(&self) -> Vec<OrderingUpdate> {
        self.working
            .iter()
            .enumerate()
            .map(|(index, item)| (self.mapper)(item, index))
            .collect()
    }

    /// Submits the bulk reordering mutation. On success the committed order
    /// becomes the new baseline and the source cache has been invalidated, so
    /// the next fetch returns the server-confirmed sequence.
    pub async fn commit(
        &mut self,
        mutations: &MutationExecutor,
        api: &ResourceApi,
    ) -> Result<CommitOutcome, AdminError> {
        let outcome = mutations.commit_ordering(api, &self.payload()).await?;
        if outcome == CommitOutcome::Committed {
            self.original_ids = self.working.iter().map(|r| r.item_id()).collect();
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Row(&'static str);

    impl ReorderItem for Row {
        fn item_id(&self) -> String {
            self.0.to_string()
        }
    }

    fn rows() -> Vec<Row> {
        vec![Row("a"), Row("b"), Row("c")]
    }

    #[test]
    fn fresh_sync_is_unchanged_order() {
        let mut list = ReorderList::new();
        assert_eq!(list.sync_from(rows()), ReorderSync::Replaced);
        assert!(!list.is_changed());
        assert!(list.can_commit());
    }

    #[test]
    fn swap_and_swap_back() {
        let mut list = ReorderList::new();
        list.sync_from(rows());

        list.on_drag_end(0, 2);
        assert!(list.is_changed());

        // Full id-sequence comparison: reverting the swap restores equality.
        list.on_drag_end(2, 0);
        assert!(!list.is_changed());
    }

    #[test]
    fn out_of_bounds_drag_is_ignored() {
        let mut list = ReorderList::new();
        list.sync_from(rows());
        list.on_drag_end(0, 9);
        assert!(!list.is_changed());
    }

    #[test]
    fn refetch_discards_uncommitted_order() {
        let mut list = ReorderList::new();
        list.sync_from(rows());
        list.on_drag_end(0, 1);

        let outcome = list.sync_from(vec![Row("a"), Row("b"), Row("c"), Row("d")]);
        assert_eq!(outcome, ReorderSync::DiscardedLocalChanges);
        assert!(!list.is_changed());
        assert_eq!(list.rows().len(), 4);
    }

    #[test]
    fn identical_refetch_keeps_unchanged() {
        let mut list = ReorderList::new();
        list.sync_from(rows());
        assert_eq!(list.sync_from(rows()), ReorderSync::Unchanged);
    }

    #[test]
    fn commit_control_needs_more_than_one_row() {
        let mut list = ReorderList::new();
        list.sync_from(vec![Row("only")]);
        assert!(!list.can_commit());
        list.sync_from(Vec::new());
        assert!(!list.can_commit());
    }

    #[test]
    fn payload_reflects_working_order() {
        let mut list = ReorderList::new();
        list.sync_from(rows());
        list.on_drag_end(0, 2);

        let payload = list.payload();
        assert_eq!(payload[0].id, "c");
        assert_eq!(payload[0].ordering, 0);
        assert_eq!(payload[2].id, "a");
        assert_eq!(payload[2].ordering, 2);
    }

    #[test]
    fn custom_mapper_sets_parent() {
        let mut list = ReorderList::with_mapper(|row: &Row, index| OrderingUpdate {
            id: row.item_id(),
            ordering: index as i64 + 1,
            parent_id: Some("season-1".to_string()),
        });
        list.sync_from(rows());
        let payload = list.payload();
        assert_eq!(payload[0].ordering, 1);
        assert_eq!(payload[0].parent_id.as_deref(), Some("season-1"));
    }
}
