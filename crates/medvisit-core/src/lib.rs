//! Core entity types for the MedVisit server.
//!
//! This crate defines the persistent data model shared by every other
//! crate in the workspace:
//!
//! - [`profile`] - User profiles (role + assignment sets)
//! - [`catalog`] - Doctors, medications, and medical centers
//! - [`visit`] - Visits logged by field representatives
//! - [`activity`] - Append-only activity log entries
//! - [`error`] - Core error taxonomy
//! - [`time`] - RFC3339 timestamp type
//! - [`id`] - Entity id generation

pub mod activity;
pub mod catalog;
pub mod error;
pub mod id;
pub mod profile;
pub mod time;
pub mod visit;

pub use activity::ActivityLogEntry;
pub use catalog::{
    CatalogEntity, CatalogKind, Doctor, MAX_MEDICAL_CENTERS, MedicalCenter, Medication,
    MedicationUnit,
};
pub use error::{CoreError, ErrorCategory, Result};
pub use id::generate_id;
pub use profile::{AssignmentUpdate, ProfilePatch, Role, UserProfile};
pub use time::{Timestamp, now_utc};
pub use visit::{Visit, VisitMedication, VisitStatus};
