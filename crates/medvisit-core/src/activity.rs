//! Append-only activity log entries.

use serde::{Deserialize, Serialize};

use crate::time::{Timestamp, now_utc};

/// One audit record: a role change, an assignment change, a catalog
/// mutation, or a deletion. Entries are never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    /// Monotonically increasing sequence number assigned by the store,
    /// used for stable newest-first ordering.
    pub seq: u64,

    /// External id of the user who performed the action.
    pub actor_external_id: String,

    /// Action name, e.g. `"update_role"` or `"delete_doctor"`.
    pub action: String,

    /// Entity collection the action touched, e.g. `"user"` or `"doctor"`.
    pub entity_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    pub created_at: Timestamp,
}

impl ActivityLogEntry {
    /// Creates an entry with `seq` 0; the store assigns the real sequence
    /// number on append.
    #[must_use]
    pub fn new(
        actor_external_id: impl Into<String>,
        action: impl Into<String>,
        entity_type: impl Into<String>,
    ) -> Self {
        Self {
            seq: 0,
            actor_external_id: actor_external_id.into(),
            action: action.into(),
            entity_type: entity_type.into(),
            entity_id: None,
            details: None,
            created_at: now_utc(),
        }
    }

    #[must_use]
    pub fn with_entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_builder() {
        let entry = ActivityLogEntry::new("admin-1", "update_role", "user")
            .with_entity_id("user-7")
            .with_details("role set to admin");
        assert_eq!(entry.actor_external_id, "admin-1");
        assert_eq!(entry.entity_id.as_deref(), Some("user-7"));
        assert_eq!(entry.seq, 0);
    }

    #[test]
    fn test_entry_json_shape() {
        let entry = ActivityLogEntry::new("v1", "create_visit", "visit");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["actorExternalId"], "v1");
        assert_eq!(json["entityType"], "visit");
        assert!(json.get("entityId").is_none());
    }
}
