//! # medvisit-auth
//!
//! Identity/role reconciliation and the assignment-scoped access engine
//! for the MedVisit server.
//!
//! This crate provides:
//! - Identity extraction from verified edge headers
//! - Role reconciliation across the identity provider and the profile store
//! - The assignment engine (profile assignment sets + catalog mutations)
//! - Assignment-scoped catalog filtering
//! - The identity-provider lifecycle sync gateway
//! - The append-only activity recorder
//!
//! ## Modules
//!
//! - [`identity`] - `Identity` extractor (IdentityBridge)
//! - [`reconciler`] - `RoleReconciler` (effective role, bootstrap, role updates)
//! - [`role`] - `EffectiveRole` tagged union
//! - [`assignments`] - `AssignmentEngine` (assignment sets + catalog CRUD)
//! - [`filter`] - `ScopedQueryFilter`
//! - [`sync`] - `SyncGateway` (lifecycle webhook reconciliation)
//! - [`audit`] - `ActivityRecorder`
//! - [`config`] - Access-engine configuration
//! - [`error`] - `AuthError` taxonomy and HTTP mapping

pub mod assignments;
pub mod audit;
pub mod config;
pub mod error;
pub mod filter;
pub mod identity;
pub mod reconciler;
pub mod role;
pub mod sync;

pub use assignments::{
    AssignmentEngine, CenterUpdate, DoctorUpdate, MedicationUpdate, NewCenter, NewDoctor,
    NewMedication,
};
pub use audit::ActivityRecorder;
pub use config::AuthConfig;
pub use error::AuthError;
pub use filter::ScopedQueryFilter;
pub use identity::Identity;
pub use reconciler::RoleReconciler;
pub use role::{AssignmentSets, EffectiveRole};
pub use sync::{LifecycleEvent, LifecyclePayload, SyncGateway};

/// Type alias for access-engine results.
pub type AuthResult<T> = Result<T, AuthError>;
