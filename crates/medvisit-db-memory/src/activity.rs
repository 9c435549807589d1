//! In-memory activity log.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use papaya::HashMap as PapayaHashMap;

use medvisit_core::ActivityLogEntry;
use medvisit_storage::{ActivityLogStore, StorageError};

/// Append-only activity log keyed by an atomically assigned sequence
/// number.
#[derive(Debug)]
pub struct InMemoryActivityLog {
    data: PapayaHashMap<u64, ActivityLogEntry>,
    seq: AtomicU64,
}

impl InMemoryActivityLog {
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: PapayaHashMap::new(),
            seq: AtomicU64::new(1),
        }
    }
}

impl Default for InMemoryActivityLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActivityLogStore for InMemoryActivityLog {
    async fn append(
        &self,
        mut entry: ActivityLogEntry,
    ) -> Result<ActivityLogEntry, StorageError> {
        entry.seq = self.seq.fetch_add(1, Ordering::SeqCst);
        let guard = self.data.pin();
        guard.insert(entry.seq, entry.clone());
        Ok(entry)
    }

    async fn list(&self, limit: usize) -> Result<Vec<ActivityLogEntry>, StorageError> {
        let guard = self.data.pin();
        let mut entries: Vec<ActivityLogEntry> = guard.values().cloned().collect();
        entries.sort_by(|a, b| b.seq.cmp(&a.seq));
        entries.truncate(limit);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_assigns_increasing_seq() {
        let log = InMemoryActivityLog::new();
        let first = log
            .append(ActivityLogEntry::new("a", "update_role", "user"))
            .await
            .unwrap();
        let second = log
            .append(ActivityLogEntry::new("a", "update_assignments", "user"))
            .await
            .unwrap();
        assert!(second.seq > first.seq);
    }

    #[tokio::test]
    async fn test_list_newest_first_bounded() {
        let log = InMemoryActivityLog::new();
        for i in 0..5 {
            log.append(ActivityLogEntry::new("a", format!("action-{i}"), "user"))
                .await
                .unwrap();
        }
        let entries = log.list(3).await.unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].action, "action-4");
        assert_eq!(entries[2].action, "action-2");
    }
}
