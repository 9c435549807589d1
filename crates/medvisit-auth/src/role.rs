//! The effective role used for every authorization decision.
//!
//! Rather than scattering `if role == "admin"` through query code, the
//! resolved role is a closed tagged union: admins carry no extra data,
//! visitors carry their assignment sets. Authorization branches are
//! exhaustive matches over this type.

use medvisit_core::{CatalogKind, Role, UserProfile};

use crate::error::AuthError;

/// A visitor's three assignment sets, copied out of the profile at
/// resolution time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentSets {
    pub doctors: Vec<String>,
    pub medications: Vec<String>,
    pub medical_centers: Vec<String>,
}

impl AssignmentSets {
    /// The assignment vector for one catalog, in stored (admin-supplied)
    /// order.
    #[must_use]
    pub fn ids_for(&self, kind: CatalogKind) -> &[String] {
        match kind {
            CatalogKind::Doctors => &self.doctors,
            CatalogKind::Medications => &self.medications,
            CatalogKind::MedicalCenters => &self.medical_centers,
        }
    }

    #[must_use]
    pub fn contains(&self, kind: CatalogKind, id: &str) -> bool {
        self.ids_for(kind).iter().any(|assigned| assigned == id)
    }
}

/// The role actually used for authorization, after reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectiveRole {
    Admin,
    Visitor(AssignmentSets),
}

impl EffectiveRole {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// # Errors
    ///
    /// Returns `Unauthorized` unless the role is `Admin`.
    pub fn require_admin(&self) -> Result<(), AuthError> {
        match self {
            Self::Admin => Ok(()),
            Self::Visitor(_) => Err(AuthError::unauthorized("admin role required")),
        }
    }
}

impl From<&UserProfile> for EffectiveRole {
    fn from(profile: &UserProfile) -> Self {
        match profile.role {
            Role::Admin => Self::Admin,
            Role::Visitor => Self::Visitor(AssignmentSets {
                doctors: profile.assigned_doctors.clone(),
                medications: profile.assigned_medications.clone(),
                medical_centers: profile.assigned_medical_centers.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_profile_resolves_to_admin() {
        let profile = UserProfile::new("u1", Role::Admin);
        let role = EffectiveRole::from(&profile);
        assert!(role.is_admin());
        assert!(role.require_admin().is_ok());
    }

    #[test]
    fn test_visitor_carries_assignments() {
        let mut profile = UserProfile::new("u1", Role::Visitor);
        profile.assigned_doctors = vec!["d2".to_string(), "d5".to_string()];
        profile.assigned_medical_centers = vec!["c9".to_string()];

        let role = EffectiveRole::from(&profile);
        let EffectiveRole::Visitor(sets) = &role else {
            panic!("expected visitor");
        };
        assert_eq!(sets.ids_for(CatalogKind::Doctors), ["d2", "d5"]);
        assert!(sets.contains(CatalogKind::MedicalCenters, "c9"));
        assert!(!sets.contains(CatalogKind::Doctors, "d1"));
        assert!(role.require_admin().is_err());
    }
}
