//! Activity recording.
//!
//! Audit entries are best-effort: a failed append is logged and swallowed
//! so the primary mutation still succeeds. The activity log is an
//! observability aid, not a ledger the workflow depends on.

use std::sync::Arc;

use medvisit_core::ActivityLogEntry;
use medvisit_storage::ActivityLogStore;

/// Appends audit entries for every successful mutation.
#[derive(Clone)]
pub struct ActivityRecorder {
    store: Arc<dyn ActivityLogStore>,
}

impl ActivityRecorder {
    #[must_use]
    pub fn new(store: Arc<dyn ActivityLogStore>) -> Self {
        Self { store }
    }

    /// Records one action. Append failures are logged at `warn` and do not
    /// propagate.
    pub async fn record(
        &self,
        actor: &str,
        action: &str,
        entity_type: &str,
        entity_id: Option<&str>,
        details: Option<String>,
    ) {
        let mut entry = ActivityLogEntry::new(actor, action, entity_type);
        if let Some(id) = entity_id {
            entry = entry.with_entity_id(id);
        }
        if let Some(details) = details {
            entry = entry.with_details(details);
        }

        if let Err(err) = self.store.append(entry).await {
            tracing::warn!(actor, action, error = %err, "failed to append activity entry");
        }
    }

    /// Lists the newest entries, up to `limit`.
    ///
    /// # Errors
    ///
    /// Propagates storage failures, unlike [`record`](Self::record); a
    /// read that silently returned nothing would be misleading.
    pub async fn list(
        &self,
        limit: usize,
    ) -> Result<Vec<ActivityLogEntry>, medvisit_storage::StorageError> {
        self.store.list(limit).await
    }
}
