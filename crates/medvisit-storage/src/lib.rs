//! Storage abstraction layer for the MedVisit server.
//!
//! This crate defines the traits that all storage backends must implement.
//! The in-memory backend lives in `medvisit-db-memory`.

pub mod error;
pub mod traits;

pub use error::StorageError;
pub use traits::{ActivityLogStore, CatalogStore, ProfileStore, VisitStore};

/// Convenience result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
