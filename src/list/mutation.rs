use std::sync::Arc;

use tracing::error;

use crate::client::cache::PageCache;
use crate::client::descriptor::ResourceApi;
use crate::client::transport::Transport;
use crate::common::error::AdminError;
use crate::common::notify::Notifier;
use crate::common::response::MutationEnvelope;

use super::reorder::OrderingUpdate;

pub struct DeleteOptions {
    pub show_notify: bool,
    pub on_error: Option<Box<dyn Fn(&str) + Send + Sync>>,
}

impl Default for DeleteOptions {
    fn default() -> Self {
        Self {
            show_notify: true,
            on_error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// Business rejection; carries the server code.
    Rejected(String),
    TransportFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    Rejected(String),
    TransportFailed,
}

/// Runs mutations against a resource and keeps the page cache honest about
/// them. Expected failures come back as outcomes, not errors; `Err` is
/// reserved for a missing endpoint in the descriptor.
pub struct MutationExecutor {
    resource: String,
    transport: Arc<dyn Transport>,
    cache: Arc<PageCache>,
    notifier: Arc<dyn Notifier>,
}

impl MutationExecutor {
    pub fn new(
        resource: &str,
        transport: Arc<dyn Transport>,
        cache: Arc<PageCache>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            resource: resource.to_string(),
            transport,
            cache,
            notifier,
        }
    }

    /// Drops every cached page for this resource.
    pub fn invalidate(&self) {
        self.cache.invalidate_resource(&self.resource);
    }

    pub async fn delete_by_id(
        &self,
        api: &ResourceApi,
        id: &str,
        options: &DeleteOptions,
    ) -> Result<DeleteOutcome, AdminError> {
        let endpoint = api.delete.as_ref().ok_or(AdminError::EndpointMissing("delete"))?;
        let path = endpoint.path_for_id(id);

        let raw = match self.transport.execute(endpoint, &path, &[], None).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(resource = %self.resource, %id, "delete request failed: {e}");
                if options.show_notify {
                    self.notifier.error(&format!("Failed to delete {}", self.resource));
                }
                return Ok(DeleteOutcome::TransportFailed);
            }
        };

        let envelope: MutationEnvelope = match serde_json::from_value(raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                error!(resource = %self.resource, %id, "delete response malformed: {e}");
                if options.show_notify {
                    self.notifier.error(&format!("Failed to delete {}", self.resource));
                }
                return Ok(DeleteOutcome::TransportFailed);
            }
        };

        if envelope.result {
            // Both paged and infinite entries are stale now.
            self.cache.invalidate_resource(&self.resource);
            if options.show_notify {
                self.notifier.success(&format!("Deleted {}", self.resource));
            }
            return Ok(DeleteOutcome::Deleted);
        }

        let code = envelope.code.unwrap_or_else(|| "UNKNOWN".to_string());
        match &options.on_error {
            Some(handler) => handler(&code),
            None if options.show_notify => {
                self.notifier.error(&format!("Failed to delete {}", self.resource));
            }
            None => {}
        }
        Ok(DeleteOutcome::Rejected(code))
    }

    pub async fn commit_ordering(
        &self,
        api: &ResourceApi,
        updates: &[OrderingUpdate],
    ) -> Result<CommitOutcome, AdminError> {
        let endpoint = api
            .update_ordering
            .as_ref()
            .ok_or(AdminError::EndpointMissing("update_ordering"))?;

        let body = serde_json::to_value(updates)?;
        let raw = match self.transport.execute(endpoint, &endpoint.path, &[], Some(body)).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(resource = %self.resource, "ordering update failed: {e}");
                self.notifier.error("Failed to update ordering");
                return Ok(CommitOutcome::TransportFailed);
            }
        };

        let envelope: MutationEnvelope = serde_json::from_value(raw)?;
        if envelope.result {
            self.cache.invalidate_resource(&self.resource);
            self.notifier.success("Ordering updated");
            return Ok(CommitOutcome::Committed);
        }

        let code = envelope.code.unwrap_or_else(|| "UNKNOWN".to_string());
        self.notifier.error("Failed to update ordering");
        Ok(CommitOutcome::Rejected(code))
    }
}
