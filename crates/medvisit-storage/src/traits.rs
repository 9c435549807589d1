//! Storage traits for the MedVisit storage abstraction layer.
//!
//! Implementations must be thread-safe (`Send + Sync`) and, for
//! [`ProfileStore`], atomic per key: `upsert_if_absent` and `patch` must not
//! interleave with another writer's read-modify-write on the same external
//! id.

use async_trait::async_trait;

use medvisit_core::{
    ActivityLogEntry, CatalogEntity, ProfilePatch, UserProfile, Visit,
};

use crate::error::StorageError;

// =============================================================================
// Profiles
// =============================================================================

/// Keyed storage for one profile document per external user id.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Reads a profile by external id.
    ///
    /// Returns `None` if no profile exists; errors are infrastructure
    /// failures only.
    async fn get(&self, external_id: &str) -> Result<Option<UserProfile>, StorageError>;

    /// Creates the profile from `seed` only if none exists for its external
    /// id, otherwise returns the existing profile unchanged.
    ///
    /// Atomic with respect to concurrent first-access on the same id, so
    /// exactly one profile document can ever exist per external id.
    async fn upsert_if_absent(&self, seed: UserProfile) -> Result<UserProfile, StorageError>;

    /// Atomically merges a partial update into the stored profile and
    /// returns the updated document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no profile exists.
    async fn patch(
        &self,
        external_id: &str,
        patch: ProfilePatch,
    ) -> Result<UserProfile, StorageError>;

    /// Deletes the profile document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no profile exists.
    async fn delete(&self, external_id: &str) -> Result<(), StorageError>;

    /// Lists profiles in creation order (id tie-break), bounded by `limit`.
    async fn list_all(&self, limit: usize) -> Result<Vec<UserProfile>, StorageError>;

    /// Number of stored profiles.
    async fn count(&self) -> Result<usize, StorageError>;
}

// =============================================================================
// Catalogs
// =============================================================================

/// Keyed storage for one catalog collection (doctors, medications, or
/// medical centers). One generic trait covers all three; the entity type
/// names the collection via [`CatalogEntity::KIND`].
#[async_trait]
pub trait CatalogStore<T: CatalogEntity>: Send + Sync {
    /// Inserts a new record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` if the id is taken.
    async fn insert(&self, entity: T) -> Result<T, StorageError>;

    /// Reads a record by id. Returns `None` if it does not exist.
    async fn get(&self, id: &str) -> Result<Option<T>, StorageError>;

    /// Replaces an existing record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the id does not exist.
    async fn update(&self, entity: T) -> Result<T, StorageError>;

    /// Deletes a record by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the id does not exist.
    async fn delete(&self, id: &str) -> Result<(), StorageError>;

    /// Lists records in creation order (id tie-break), bounded by `limit`.
    async fn list(&self, limit: usize) -> Result<Vec<T>, StorageError>;

    /// Number of stored records.
    async fn count(&self) -> Result<usize, StorageError>;
}

// =============================================================================
// Visits
// =============================================================================

/// Storage for visits logged by field representatives.
#[async_trait]
pub trait VisitStore: Send + Sync {
    /// Inserts a new visit.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` if the id is taken.
    async fn insert(&self, visit: Visit) -> Result<Visit, StorageError>;

    /// Reads a visit by id. Returns `None` if it does not exist.
    async fn get(&self, id: &str) -> Result<Option<Visit>, StorageError>;

    /// Replaces an existing visit.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the id does not exist.
    async fn update(&self, visit: Visit) -> Result<Visit, StorageError>;

    /// Lists visits newest-first by creation time, bounded by `limit`.
    async fn list_all(&self, limit: usize) -> Result<Vec<Visit>, StorageError>;

    /// Lists one visitor's visits newest-first, bounded by `limit`.
    async fn list_by_visitor(
        &self,
        visitor_id: &str,
        limit: usize,
    ) -> Result<Vec<Visit>, StorageError>;

    /// Number of stored visits.
    async fn count(&self) -> Result<usize, StorageError>;
}

// =============================================================================
// Activity log
// =============================================================================

/// Append-only audit sink. Entries are never mutated or deleted.
#[async_trait]
pub trait ActivityLogStore: Send + Sync {
    /// Appends an entry, assigning its sequence number, and returns the
    /// stored entry.
    async fn append(&self, entry: ActivityLogEntry) -> Result<ActivityLogEntry, StorageError>;

    /// Lists entries newest-first by sequence number, bounded by `limit`.
    async fn list(&self, limit: usize) -> Result<Vec<ActivityLogEntry>, StorageError>;
}
