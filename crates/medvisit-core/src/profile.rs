//! User profiles.
//!
//! One profile document exists per external user id. The profile is the
//! canonical source for the user's role once it has been created; identity
//! provider claims only seed the initial role.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::time::{Timestamp, now_utc};

// =============================================================================
// Role
// =============================================================================

/// The two roles in the system.
///
/// Admins curate the shared catalogs and assignment sets; visitors see only
/// their assigned subset of each catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Visitor,
}

impl Role {
    #[must_use]
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Visitor => "visitor",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "visitor" => Ok(Self::Visitor),
            other => Err(CoreError::InvalidRole(other.to_string())),
        }
    }
}

// =============================================================================
// UserProfile
// =============================================================================

/// A user profile, keyed by the external identity provider id.
///
/// Assignment vectors preserve the order an admin supplied; membership has
/// set semantics (writes deduplicate, keeping the first occurrence).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Opaque id issued by the external identity provider.
    pub external_id: String,

    pub role: Role,

    /// Display name, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub assigned_doctors: Vec<String>,

    #[serde(default)]
    pub assigned_medications: Vec<String>,

    #[serde(default)]
    pub assigned_medical_centers: Vec<String>,

    pub created_at: Timestamp,
}

impl UserProfile {
    /// Creates a new profile with empty assignment sets.
    #[must_use]
    pub fn new(external_id: impl Into<String>, role: Role) -> Self {
        Self {
            external_id: external_id.into(),
            role,
            name: None,
            assigned_doctors: Vec::new(),
            assigned_medications: Vec::new(),
            assigned_medical_centers: Vec::new(),
            created_at: now_utc(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Applies a partial update in place. Fields left `None` are untouched.
    pub fn apply(&mut self, patch: ProfilePatch) {
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(name) = patch.name {
            self.name = Some(name);
        }
        if let Some(doctors) = patch.assigned_doctors {
            self.assigned_doctors = dedup_ids(doctors);
        }
        if let Some(medications) = patch.assigned_medications {
            self.assigned_medications = dedup_ids(medications);
        }
        if let Some(centers) = patch.assigned_medical_centers {
            self.assigned_medical_centers = dedup_ids(centers);
        }
    }
}

// =============================================================================
// Partial updates
// =============================================================================

/// Partial profile update; `None` fields are left untouched by `apply`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_doctors: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_medications: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_medical_centers: Option<Vec<String>>,
}

impl ProfilePatch {
    #[must_use]
    pub fn role(role: Role) -> Self {
        Self {
            role: Some(role),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.role.is_none()
            && self.name.is_none()
            && self.assigned_doctors.is_none()
            && self.assigned_medications.is_none()
            && self.assigned_medical_centers.is_none()
    }
}

/// Wholesale replacement of one or more assignment sets.
///
/// Provided fields replace the stored set entirely; absent fields are left
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctors: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medications: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_centers: Option<Vec<String>>,
}

impl AssignmentUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.doctors.is_none() && self.medications.is_none() && self.medical_centers.is_none()
    }
}

impl From<AssignmentUpdate> for ProfilePatch {
    fn from(update: AssignmentUpdate) -> Self {
        Self {
            assigned_doctors: update.doctors,
            assigned_medications: update.medications,
            assigned_medical_centers: update.medical_centers,
            ..Self::default()
        }
    }
}

/// Removes duplicate ids, keeping the first occurrence in order.
pub fn dedup_ids(ids: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("visitor".parse::<Role>().unwrap(), Role::Visitor);
        assert!("superuser".parse::<Role>().is_err());
        // Case-sensitive on purpose: provider claims are normalized upstream.
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"visitor\"").unwrap();
        assert_eq!(role, Role::Visitor);
        assert!(serde_json::from_str::<Role>("\"root\"").is_err());
    }

    #[test]
    fn test_new_profile_has_empty_assignments() {
        let profile = UserProfile::new("user-1", Role::Visitor);
        assert_eq!(profile.role, Role::Visitor);
        assert!(profile.assigned_doctors.is_empty());
        assert!(profile.assigned_medications.is_empty());
        assert!(profile.assigned_medical_centers.is_empty());
    }

    #[test]
    fn test_apply_patch_partial() {
        let mut profile = UserProfile::new("user-1", Role::Visitor).with_name("Ana");
        profile.assigned_doctors = vec!["d1".to_string()];

        profile.apply(ProfilePatch {
            assigned_medical_centers: Some(vec!["c9".to_string()]),
            ..ProfilePatch::default()
        });

        // Untouched fields survive; only the provided set is replaced.
        assert_eq!(profile.role, Role::Visitor);
        assert_eq!(profile.name.as_deref(), Some("Ana"));
        assert_eq!(profile.assigned_doctors, vec!["d1"]);
        assert_eq!(profile.assigned_medical_centers, vec!["c9"]);
    }

    #[test]
    fn test_apply_patch_role() {
        let mut profile = UserProfile::new("user-1", Role::Visitor);
        profile.apply(ProfilePatch::role(Role::Admin));
        assert_eq!(profile.role, Role::Admin);
    }

    #[test]
    fn test_apply_deduplicates_assignments() {
        let mut profile = UserProfile::new("user-1", Role::Visitor);
        profile.apply(ProfilePatch {
            assigned_doctors: Some(vec![
                "d2".to_string(),
                "d5".to_string(),
                "d2".to_string(),
            ]),
            ..ProfilePatch::default()
        });
        assert_eq!(profile.assigned_doctors, vec!["d2", "d5"]);
    }

    #[test]
    fn test_assignment_update_into_patch() {
        let update = AssignmentUpdate {
            medications: Some(vec!["m1".to_string()]),
            ..AssignmentUpdate::default()
        };
        let patch: ProfilePatch = update.into();
        assert!(patch.assigned_doctors.is_none());
        assert_eq!(patch.assigned_medications, Some(vec!["m1".to_string()]));
        assert!(patch.role.is_none());
    }

    #[test]
    fn test_profile_json_shape() {
        let profile = UserProfile::new("user-1", Role::Admin);
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["externalId"], "user-1");
        assert_eq!(json["role"], "admin");
        assert!(json["assignedDoctors"].as_array().unwrap().is_empty());
    }
}
