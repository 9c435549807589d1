//! Visit workflows.
//!
//! Visitors log visits against their assigned doctors; admins see every
//! visit. A visitor's create or update is validated against their
//! assignment sets, so a visit can never reference a doctor, medication,
//! or medical center outside the caller's scope. Admins are unrestricted.

use std::sync::Arc;

use medvisit_auth::{ActivityRecorder, AuthError, EffectiveRole};
use medvisit_core::{CatalogKind, Timestamp, Visit, VisitMedication, VisitStatus};
use medvisit_storage::VisitStore;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVisit {
    pub doctor_id: String,
    pub date: Timestamp,

    #[serde(default)]
    pub medical_center_id: Option<String>,

    #[serde(default)]
    pub medications: Vec<VisitMedication>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default = "default_status")]
    pub status: VisitStatus,
}

fn default_status() -> VisitStatus {
    VisitStatus::Pending
}

/// Partial visit update; absent fields are untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitUpdate {
    #[serde(default)]
    pub date: Option<Timestamp>,

    #[serde(default)]
    pub medical_center_id: Option<String>,

    #[serde(default)]
    pub medications: Option<Vec<VisitMedication>>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub status: Option<VisitStatus>,
}

/// Counts of visits by status, for the admin stats endpoint.
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitStatusCounts {
    pub completed: usize,
    pub pending: usize,
    pub cancelled: usize,
}

#[derive(Clone)]
pub struct VisitService {
    store: Arc<dyn VisitStore>,
    recorder: ActivityRecorder,
    list_cap: usize,
}

impl VisitService {
    #[must_use]
    pub fn new(store: Arc<dyn VisitStore>, recorder: ActivityRecorder, list_cap: usize) -> Self {
        Self {
            store,
            recorder,
            list_cap,
        }
    }

    /// Creates a visit owned by `actor`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when a visitor references an unassigned doctor,
    /// medication, or medical center, or a medication quantity is zero.
    pub async fn create(
        &self,
        role: &EffectiveRole,
        actor: &str,
        input: NewVisit,
    ) -> Result<Visit, AuthError> {
        let mut visit = Visit::new(input.doctor_id, actor, input.date, input.status);
        visit.medical_center_id = input.medical_center_id;
        visit.medications = input.medications;
        visit.notes = input.notes;
        visit.validate()?;
        Self::check_references(role, &visit)?;

        let visit = self.store.insert(visit).await?;
        self.recorder
            .record(actor, "create_visit", "visit", Some(&visit.id), None)
            .await;
        Ok(visit)
    }

    /// Updates a visit. Visitors may only touch their own visits, and the
    /// updated document is re-validated against their assignment sets.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing id (or another visitor's visit),
    /// `Validation` on a reference outside the caller's scope.
    pub async fn update(
        &self,
        role: &EffectiveRole,
        actor: &str,
        id: &str,
        update: VisitUpdate,
    ) -> Result<Visit, AuthError> {
        let mut visit = self.fetch_owned(role, actor, id).await?;

        if let Some(date) = update.date {
            visit.date = date;
        }
        if let Some(center) = update.medical_center_id {
            visit.medical_center_id = Some(center);
        }
        if let Some(medications) = update.medications {
            visit.medications = medications;
        }
        if let Some(notes) = update.notes {
            visit.notes = Some(notes);
        }
        if let Some(status) = update.status {
            visit.status = status;
        }
        visit.validate()?;
        Self::check_references(role, &visit)?;

        let visit = self.store.update(visit).await?;
        self.recorder
            .record(actor, "update_visit", "visit", Some(id), None)
            .await;
        Ok(visit)
    }

    /// Reads one visit. For visitors, another visitor's visit is
    /// indistinguishable from a missing one.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the visit does not exist or is out of scope.
    pub async fn get(&self, role: &EffectiveRole, actor: &str, id: &str) -> Result<Visit, AuthError> {
        self.fetch_owned(role, actor, id).await
    }

    /// Lists visits newest-first: all of them for admins, the caller's own
    /// for visitors.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn list(
        &self,
        role: &EffectiveRole,
        actor: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Visit>, AuthError> {
        let limit = limit.unwrap_or(self.list_cap).min(self.list_cap);
        let visits = match role {
            EffectiveRole::Admin => self.store.list_all(limit).await?,
            EffectiveRole::Visitor(_) => self.store.list_by_visitor(actor, limit).await?,
        };
        Ok(visits)
    }

    /// Visit totals by status over the whole collection.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn status_counts(&self) -> Result<VisitStatusCounts, AuthError> {
        let visits = self.store.list_all(self.list_cap).await?;
        let mut counts = VisitStatusCounts::default();
        for visit in &visits {
            match visit.status {
                VisitStatus::Completed => counts.completed += 1,
                VisitStatus::Pending => counts.pending += 1,
                VisitStatus::Cancelled => counts.cancelled += 1,
            }
        }
        Ok(counts)
    }

    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn count(&self) -> Result<usize, AuthError> {
        Ok(self.store.count().await?)
    }

    async fn fetch_owned(
        &self,
        role: &EffectiveRole,
        actor: &str,
        id: &str,
    ) -> Result<Visit, AuthError> {
        let visit = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| AuthError::not_found("visit", id))?;
        if !role.is_admin() && visit.visitor_id != actor {
            return Err(AuthError::not_found("visit", id));
        }
        Ok(visit)
    }

    /// Visitors may only reference entities inside their assignment sets.
    fn check_references(role: &EffectiveRole, visit: &Visit) -> Result<(), AuthError> {
        let EffectiveRole::Visitor(sets) = role else {
            return Ok(());
        };

        if !sets.contains(CatalogKind::Doctors, &visit.doctor_id) {
            return Err(AuthError::validation(format!(
                "doctor {} is not in your assignments",
                visit.doctor_id
            )));
        }
        if let Some(center) = &visit.medical_center_id {
            if !sets.contains(CatalogKind::MedicalCenters, center) {
                return Err(AuthError::validation(format!(
                    "medical center {center} is not in your assignments"
                )));
            }
        }
        for med in &visit.medications {
            if !sets.contains(CatalogKind::Medications, &med.medication_id) {
                return Err(AuthError::validation(format!(
                    "medication {} is not in your assignments",
                    med.medication_id
                )));
            }
        }
        Ok(())
    }
}
