//! In-memory visit store.

use async_trait::async_trait;
use papaya::{Compute, HashMap as PapayaHashMap, Operation};

use medvisit_core::Visit;
use medvisit_storage::{StorageError, VisitStore};

const ENTITY: &str = "visit";

/// Visit store over a papaya lock-free map keyed by visit id.
#[derive(Debug, Default)]
pub struct InMemoryVisitStore {
    data: PapayaHashMap<String, Visit>,
}

impl InMemoryVisitStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: PapayaHashMap::new(),
        }
    }

    /// Newest-first by creation time, id tie-break.
    fn sort_newest_first(visits: &mut [Visit]) {
        visits.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
    }
}

#[async_trait]
impl VisitStore for InMemoryVisitStore {
    async fn insert(&self, visit: Visit) -> Result<Visit, StorageError> {
        let id = visit.id.clone();
        let guard = self.data.pin();
        let outcome = guard.compute(id.clone(), |entry| match entry {
            Some(_) => Operation::Abort(()),
            None => Operation::Insert(visit.clone()),
        });
        match outcome {
            Compute::Inserted(_, stored) => Ok(stored.clone()),
            Compute::Aborted(()) => Err(StorageError::already_exists(ENTITY, id)),
            _ => Err(StorageError::internal("unexpected compute outcome")),
        }
    }

    async fn get(&self, id: &str) -> Result<Option<Visit>, StorageError> {
        let guard = self.data.pin();
        Ok(guard.get(id).cloned())
    }

    async fn update(&self, visit: Visit) -> Result<Visit, StorageError> {
        let id = visit.id.clone();
        let guard = self.data.pin();
        let outcome = guard.compute(id.clone(), |entry| match entry {
            Some(_) => Operation::Insert(visit.clone()),
            None => Operation::Abort(()),
        });
        match outcome {
            Compute::Updated { new: (_, stored), .. } => Ok(stored.clone()),
            Compute::Aborted(()) => Err(StorageError::not_found(ENTITY, id)),
            _ => Err(StorageError::internal("unexpected compute outcome")),
        }
    }

    async fn list_all(&self, limit: usize) -> Result<Vec<Visit>, StorageError> {
        let guard = self.data.pin();
        let mut visits: Vec<Visit> = guard.values().cloned().collect();
        Self::sort_newest_first(&mut visits);
        visits.truncate(limit);
        Ok(visits)
    }

    async fn list_by_visitor(
        &self,
        visitor_id: &str,
        limit: usize,
    ) -> Result<Vec<Visit>, StorageError> {
        let guard = self.data.pin();
        let mut visits: Vec<Visit> = guard
            .values()
            .filter(|v| v.visitor_id == visitor_id)
            .cloned()
            .collect();
        Self::sort_newest_first(&mut visits);
        visits.truncate(limit);
        Ok(visits)
    }

    async fn count(&self) -> Result<usize, StorageError> {
        let guard = self.data.pin();
        Ok(guard.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medvisit_core::{VisitStatus, now_utc};

    fn visit_for(visitor: &str) -> Visit {
        Visit::new("d1", visitor, now_utc(), VisitStatus::Pending)
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = InMemoryVisitStore::new();
        let visit = visit_for("v1");
        let id = visit.id.clone();
        store.insert(visit).await.unwrap();
        assert!(store.get(&id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = InMemoryVisitStore::new();
        let err = store.update(visit_for("v1")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_by_visitor_filters() {
        let store = InMemoryVisitStore::new();
        store.insert(visit_for("v1")).await.unwrap();
        store.insert(visit_for("v2")).await.unwrap();
        store.insert(visit_for("v1")).await.unwrap();

        let mine = store.list_by_visitor("v1", 10).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|v| v.visitor_id == "v1"));
        assert_eq!(store.list_all(10).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_list_all_bounded() {
        let store = InMemoryVisitStore::new();
        for _ in 0..5 {
            store.insert(visit_for("v1")).await.unwrap();
        }
        assert_eq!(store.list_all(2).await.unwrap().len(), 2);
        assert_eq!(store.count().await.unwrap(), 5);
    }
}
