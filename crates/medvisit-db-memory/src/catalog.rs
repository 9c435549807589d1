//! In-memory catalog stores.
//!
//! One generic implementation serves doctors, medications, and medical
//! centers; the entity type carries its collection name.

use std::marker::PhantomData;

use async_trait::async_trait;
use papaya::{Compute, HashMap as PapayaHashMap, Operation};

use medvisit_core::CatalogEntity;
use medvisit_storage::{CatalogStore, StorageError};

/// Catalog store over a papaya lock-free map keyed by entity id.
#[derive(Debug)]
pub struct InMemoryCatalogStore<T> {
    data: PapayaHashMap<String, T>,
    _marker: PhantomData<T>,
}

impl<T: CatalogEntity> InMemoryCatalogStore<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: PapayaHashMap::new(),
            _marker: PhantomData,
        }
    }

    fn entity_name() -> String {
        T::KIND.to_string()
    }
}

impl<T: CatalogEntity> Default for InMemoryCatalogStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: CatalogEntity> CatalogStore<T> for InMemoryCatalogStore<T> {
    async fn insert(&self, entity: T) -> Result<T, StorageError> {
        let id = entity.id().to_string();
        let guard = self.data.pin();
        let outcome = guard.compute(id.clone(), |entry| match entry {
            Some(_) => Operation::Abort(()),
            None => Operation::Insert(entity.clone()),
        });
        match outcome {
            Compute::Inserted(_, stored) => Ok(stored.clone()),
            Compute::Aborted(()) => Err(StorageError::already_exists(Self::entity_name(), id)),
            _ => Err(StorageError::internal("unexpected compute outcome")),
        }
    }

    async fn get(&self, id: &str) -> Result<Option<T>, StorageError> {
        let guard = self.data.pin();
        Ok(guard.get(id).cloned())
    }

    async fn update(&self, entity: T) -> Result<T, StorageError> {
        let id = entity.id().to_string();
        let guard = self.data.pin();
        let outcome = guard.compute(id.clone(), |entry| match entry {
            Some(_) => Operation::Insert(entity.clone()),
            None => Operation::Abort(()),
        });
        match outcome {
            Compute::Updated { new: (_, stored), .. } => Ok(stored.clone()),
            Compute::Aborted(()) => Err(StorageError::not_found(Self::entity_name(), id)),
            _ => Err(StorageError::internal("unexpected compute outcome")),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        let guard = self.data.pin();
        match guard.remove(id) {
            Some(_) => Ok(()),
            None => Err(StorageError::not_found(Self::entity_name(), id)),
        }
    }

    async fn list(&self, limit: usize) -> Result<Vec<T>, StorageError> {
        let guard = self.data.pin();
        let mut entities: Vec<T> = guard.values().cloned().collect();
        entities.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        entities.truncate(limit);
        Ok(entities)
    }

    async fn count(&self) -> Result<usize, StorageError> {
        let guard = self.data.pin();
        Ok(guard.len())
    }
}
