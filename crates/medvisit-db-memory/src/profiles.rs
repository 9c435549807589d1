//! In-memory profile store.

use async_trait::async_trait;
use papaya::{Compute, HashMap as PapayaHashMap, Operation};

use medvisit_core::{ProfilePatch, UserProfile};
use medvisit_storage::{ProfileStore, StorageError};

const ENTITY: &str = "profile";

/// Profile store over a papaya lock-free map keyed by external id.
///
/// `upsert_if_absent` and `patch` run inside papaya's atomic per-key
/// operations, so two concurrent first-accesses for the same external id
/// cannot create duplicate documents and a patch can never interleave with
/// another writer's read-modify-write.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    data: PapayaHashMap<String, UserProfile>,
}

impl InMemoryProfileStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: PapayaHashMap::new(),
        }
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get(&self, external_id: &str) -> Result<Option<UserProfile>, StorageError> {
        let guard = self.data.pin();
        Ok(guard.get(external_id).cloned())
    }

    async fn upsert_if_absent(&self, seed: UserProfile) -> Result<UserProfile, StorageError> {
        let key = seed.external_id.clone();
        let guard = self.data.pin();
        Ok(guard.get_or_insert_with(key, || seed).clone())
    }

    async fn patch(
        &self,
        external_id: &str,
        patch: ProfilePatch,
    ) -> Result<UserProfile, StorageError> {
        let guard = self.data.pin();
        let outcome = guard.compute(external_id.to_string(), |entry| match entry {
            Some((_, profile)) => {
                let mut updated = profile.clone();
                updated.apply(patch.clone());
                Operation::Insert(updated)
            }
            None => Operation::Abort(()),
        });
        match outcome {
            Compute::Updated { new: (_, profile), .. } => Ok(profile.clone()),
            Compute::Aborted(()) => Err(StorageError::not_found(ENTITY, external_id)),
            _ => Err(StorageError::internal("unexpected compute outcome")),
        }
    }

    async fn delete(&self, external_id: &str) -> Result<(), StorageError> {
        let guard = self.data.pin();
        match guard.remove(external_id) {
            Some(_) => Ok(()),
            None => Err(StorageError::not_found(ENTITY, external_id)),
        }
    }

    async fn list_all(&self, limit: usize) -> Result<Vec<UserProfile>, StorageError> {
        let guard = self.data.pin();
        let mut profiles: Vec<UserProfile> = guard.values().cloned().collect();
        // papaya iteration order is arbitrary; creation order with an id
        // tie-break keeps listings deterministic.
        profiles.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.external_id.cmp(&b.external_id))
        });
        profiles.truncate(limit);
        Ok(profiles)
    }

    async fn count(&self) -> Result<usize, StorageError> {
        let guard = self.data.pin();
        Ok(guard.len())
    }
}
