//! In-memory storage backend for the MedVisit server.
//!
//! This crate implements every trait from `medvisit-storage` over
//! `papaya` lock-free hash maps. Per-key atomicity (the single-document
//! transactional semantics `ProfileStore` requires) comes from papaya's
//! closure-based `compute`/`get_or_insert_with` operations, never from a
//! read-then-write sequence.
//!
//! # Example
//!
//! ```ignore
//! use medvisit_db_memory::InMemoryProfileStore;
//! use medvisit_storage::ProfileStore;
//!
//! let store = InMemoryProfileStore::new();
//! let profile = store.upsert_if_absent(seed).await?;
//! ```

pub mod activity;
pub mod catalog;
pub mod profiles;
pub mod visits;

pub use activity::InMemoryActivityLog;
pub use catalog::InMemoryCatalogStore;
pub use profiles::InMemoryProfileStore;
pub use visits::InMemoryVisitStore;

// Re-export the storage traits for convenience
pub use medvisit_storage::{ActivityLogStore, CatalogStore, ProfileStore, StorageError, VisitStore};
