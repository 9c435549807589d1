//! The assignment engine: profile assignment sets and catalog mutations.
//!
//! All writes here are admin-gated except deletion, where the record's
//! creator may also delete it. Every successful mutation appends one
//! activity entry.

use std::sync::Arc;

use medvisit_core::{
    AssignmentUpdate, CatalogEntity, Doctor, MedicalCenter, Medication, MedicationUnit,
    ProfilePatch, UserProfile,
};
use medvisit_storage::{CatalogStore, ProfileStore, StorageError};
use serde::Deserialize;

use crate::audit::ActivityRecorder;
use crate::error::AuthError;
use crate::role::EffectiveRole;

// =============================================================================
// Input payloads
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDoctor {
    pub name: String,

    #[serde(default)]
    pub specialty: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub medical_centers: Vec<String>,
}

/// Partial doctor update; absent fields are untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorUpdate {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub specialty: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub medical_centers: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMedication {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub unit: MedicationUnit,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationUpdate {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub unit: Option<MedicationUnit>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCenter {
    pub name: String,
    pub address: String,
    pub city: String,

    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CenterUpdate {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,
}

// =============================================================================
// Engine
// =============================================================================

/// Performs assignment-set writes and catalog mutations, enforcing role
/// checks and invariants before anything reaches storage.
#[derive(Clone)]
pub struct AssignmentEngine {
    profiles: Arc<dyn ProfileStore>,
    doctors: Arc<dyn CatalogStore<Doctor>>,
    medications: Arc<dyn CatalogStore<Medication>>,
    centers: Arc<dyn CatalogStore<MedicalCenter>>,
    recorder: ActivityRecorder,
}

impl AssignmentEngine {
    #[must_use]
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        doctors: Arc<dyn CatalogStore<Doctor>>,
        medications: Arc<dyn CatalogStore<Medication>>,
        centers: Arc<dyn CatalogStore<MedicalCenter>>,
        recorder: ActivityRecorder,
    ) -> Self {
        Self {
            profiles,
            doctors,
            medications,
            centers,
            recorder,
        }
    }

    // =========================================================================
    // Assignment sets
    // =========================================================================

    /// Replaces the named assignment sets on a user's profile.
    ///
    /// Provided vectors replace the stored set wholesale (deduplicated,
    /// first occurrence wins); absent vectors are untouched.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` unless the caller is admin, `NotFound` if no
    /// profile exists for `target_external_id`.
    pub async fn set_assignments(
        &self,
        role: &EffectiveRole,
        actor: &str,
        target_external_id: &str,
        update: AssignmentUpdate,
    ) -> Result<UserProfile, AuthError> {
        role.require_admin()?;

        let patch: ProfilePatch = update.into();
        let updated = self
            .profiles
            .patch(target_external_id, patch)
            .await
            .map_err(|err| match err {
                StorageError::NotFound { .. } => AuthError::not_found("user", target_external_id),
                other => other.into(),
            })?;

        self.recorder
            .record(
                actor,
                "update_assignments",
                "user",
                Some(target_external_id),
                None,
            )
            .await;
        Ok(updated)
    }

    /// Deletes a user's profile. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` unless the caller is admin, `NotFound` if no
    /// profile exists.
    pub async fn delete_profile(
        &self,
        role: &EffectiveRole,
        actor: &str,
        target_external_id: &str,
    ) -> Result<(), AuthError> {
        role.require_admin()?;
        self.profiles
            .delete(target_external_id)
            .await
            .map_err(|err| match err {
                StorageError::NotFound { .. } => AuthError::not_found("user", target_external_id),
                other => other.into(),
            })?;

        self.recorder
            .record(actor, "delete_user", "user", Some(target_external_id), None)
            .await;
        Ok(())
    }

    // =========================================================================
    // Doctors
    // =========================================================================

    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admins, `Validation` when more than
    /// the allowed number of medical centers is linked.
    pub async fn create_doctor(
        &self,
        role: &EffectiveRole,
        actor: &str,
        input: NewDoctor,
    ) -> Result<Doctor, AuthError> {
        role.require_admin()?;

        let mut doctor = Doctor::new(input.name, input.medical_centers, actor);
        doctor.specialty = input.specialty;
        doctor.email = input.email;
        doctor.phone = input.phone;
        doctor.validate()?;

        let doctor = self.doctors.insert(doctor).await?;
        self.recorder
            .record(actor, "create_doctor", "doctor", Some(&doctor.id), None)
            .await;
        Ok(doctor)
    }

    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admins, `NotFound` for a missing id,
    /// `Validation` when the update would break the medical-center limit.
    /// Invariant violations are rejected before storage, so the stored
    /// record is unchanged on failure.
    pub async fn update_doctor(
        &self,
        role: &EffectiveRole,
        actor: &str,
        id: &str,
        update: DoctorUpdate,
    ) -> Result<Doctor, AuthError> {
        role.require_admin()?;

        let mut doctor = self
            .doctors
            .get(id)
            .await?
            .ok_or_else(|| AuthError::not_found("doctor", id))?;

        if let Some(name) = update.name {
            doctor.name = name;
        }
        if let Some(specialty) = update.specialty {
            doctor.specialty = Some(specialty);
        }
        if let Some(email) = update.email {
            doctor.email = Some(email);
        }
        if let Some(phone) = update.phone {
            doctor.phone = Some(phone);
        }
        if let Some(centers) = update.medical_centers {
            doctor.medical_centers = centers;
        }
        doctor.validate()?;

        let doctor = self.doctors.update(doctor).await?;
        self.recorder
            .record(actor, "update_doctor", "doctor", Some(id), None)
            .await;
        Ok(doctor)
    }

    /// # Errors
    ///
    /// Returns `Unauthorized` unless the caller is admin or created the
    /// record, `NotFound` for a missing id.
    pub async fn delete_doctor(
        &self,
        role: &EffectiveRole,
        actor: &str,
        id: &str,
    ) -> Result<(), AuthError> {
        Self::delete_entity(&*self.doctors, role, actor, id, "delete_doctor", &self.recorder)
            .await
    }

    // =========================================================================
    // Medications
    // =========================================================================

    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admins.
    pub async fn create_medication(
        &self,
        role: &EffectiveRole,
        actor: &str,
        input: NewMedication,
    ) -> Result<Medication, AuthError> {
        role.require_admin()?;

        let mut medication = Medication::new(input.name, input.unit, actor);
        medication.description = input.description;

        let medication = self.medications.insert(medication).await?;
        self.recorder
            .record(
                actor,
                "create_medication",
                "medication",
                Some(&medication.id),
                None,
            )
            .await;
        Ok(medication)
    }

    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admins, `NotFound` for a missing id.
    pub async fn update_medication(
        &self,
        role: &EffectiveRole,
        actor: &str,
        id: &str,
        update: MedicationUpdate,
    ) -> Result<Medication, AuthError> {
        role.require_admin()?;

        let mut medication = self
            .medications
            .get(id)
            .await?
            .ok_or_else(|| AuthError::not_found("medication", id))?;

        if let Some(name) = update.name {
            medication.name = name;
        }
        if let Some(description) = update.description {
            medication.description = Some(description);
        }
        if let Some(unit) = update.unit {
            medication.unit = unit;
        }

        let medication = self.medications.update(medication).await?;
        self.recorder
            .record(actor, "update_medication", "medication", Some(id), None)
            .await;
        Ok(medication)
    }

    /// # Errors
    ///
    /// Returns `Unauthorized` unless the caller is admin or created the
    /// record, `NotFound` for a missing id.
    pub async fn delete_medication(
        &self,
        role: &EffectiveRole,
        actor: &str,
        id: &str,
    ) -> Result<(), AuthError> {
        Self::delete_entity(
            &*self.medications,
            role,
            actor,
            id,
            "delete_medication",
            &self.recorder,
        )
        .await
    }

    // =========================================================================
    // Medical centers
    // =========================================================================

    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admins.
    pub async fn create_center(
        &self,
        role: &EffectiveRole,
        actor: &str,
        input: NewCenter,
    ) -> Result<MedicalCenter, AuthError> {
        role.require_admin()?;

        let mut center = MedicalCenter::new(input.name, input.address, input.city, actor);
        center.phone = input.phone;

        let center = self.centers.insert(center).await?;
        self.recorder
            .record(
                actor,
                "create_medical_center",
                "medical_center",
                Some(&center.id),
                None,
            )
            .await;
        Ok(center)
    }

    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admins, `NotFound` for a missing id.
    pub async fn update_center(
        &self,
        role: &EffectiveRole,
        actor: &str,
        id: &str,
        update: CenterUpdate,
    ) -> Result<MedicalCenter, AuthError> {
        role.require_admin()?;

        let mut center = self
            .centers
            .get(id)
            .await?
            .ok_or_else(|| AuthError::not_found("medical_center", id))?;

        if let Some(name) = update.name {
            center.name = name;
        }
        if let Some(address) = update.address {
            center.address = address;
        }
        if let Some(city) = update.city {
            center.city = city;
        }
        if let Some(phone) = update.phone {
            center.phone = Some(phone);
        }

        let center = self.centers.update(center).await?;
        self.recorder
            .record(actor, "update_medical_center", "medical_center", Some(id), None)
            .await;
        Ok(center)
    }

    /// # Errors
    ///
    /// Returns `Unauthorized` unless the caller is admin or created the
    /// record, `NotFound` for a missing id.
    pub async fn delete_center(
        &self,
        role: &EffectiveRole,
        actor: &str,
        id: &str,
    ) -> Result<(), AuthError> {
        Self::delete_entity(
            &*self.centers,
            role,
            actor,
            id,
            "delete_medical_center",
            &self.recorder,
        )
        .await
    }

    // =========================================================================
    // Shared deletion path
    // =========================================================================

    /// Deletion is intentionally looser than create/update: the creator of
    /// a record may remove it even after losing the admin role.
    async fn delete_entity<T: CatalogEntity>(
        store: &dyn CatalogStore<T>,
        role: &EffectiveRole,
        actor: &str,
        id: &str,
        action: &str,
        recorder: &ActivityRecorder,
    ) -> Result<(), AuthError> {
        let entity = store
            .get(id)
            .await?
            .ok_or_else(|| AuthError::not_found(T::KIND.to_string(), id))?;

        if !role.is_admin() && entity.created_by() != actor {
            return Err(AuthError::unauthorized(
                "only an admin or the record's creator may delete it",
            ));
        }

        store.delete(id).await?;
        recorder
            .record(actor, action, &T::KIND.to_string(), Some(id), None)
            .await;
        Ok(())
    }
}
