//! Assignment-scoped catalog reads.
//!
//! Admins see whole collections; visitors see exactly the records named in
//! their assignment sets, resolved in assignment order. An assignment id
//! pointing at a deleted record is dropped from results silently, so stale
//! assignments degrade instead of erroring.

use std::sync::Arc;

use medvisit_core::{CatalogEntity, Doctor, MedicalCenter, Medication};
use medvisit_storage::CatalogStore;

use crate::error::AuthError;
use crate::role::EffectiveRole;

/// Read-side gatekeeper for the three catalogs.
#[derive(Clone)]
pub struct ScopedQueryFilter {
    doctors: Arc<dyn CatalogStore<Doctor>>,
    medications: Arc<dyn CatalogStore<Medication>>,
    centers: Arc<dyn CatalogStore<MedicalCenter>>,
    list_cap: usize,
}

impl ScopedQueryFilter {
    #[must_use]
    pub fn new(
        doctors: Arc<dyn CatalogStore<Doctor>>,
        medications: Arc<dyn CatalogStore<Medication>>,
        centers: Arc<dyn CatalogStore<MedicalCenter>>,
        list_cap: usize,
    ) -> Self {
        Self {
            doctors,
            medications,
            centers,
            list_cap,
        }
    }

    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn list_doctors(&self, role: &EffectiveRole) -> Result<Vec<Doctor>, AuthError> {
        self.list_scoped(&*self.doctors, role).await
    }

    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn list_medications(
        &self,
        role: &EffectiveRole,
    ) -> Result<Vec<Medication>, AuthError> {
        self.list_scoped(&*self.medications, role).await
    }

    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn list_centers(
        &self,
        role: &EffectiveRole,
    ) -> Result<Vec<MedicalCenter>, AuthError> {
        self.list_scoped(&*self.centers, role).await
    }

    /// Reads one doctor, `None` when it does not exist or the visitor is
    /// not assigned to it.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn get_doctor(
        &self,
        role: &EffectiveRole,
        id: &str,
    ) -> Result<Option<Doctor>, AuthError> {
        Self::get_scoped(&*self.doctors, role, id).await
    }

    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn get_medication(
        &self,
        role: &EffectiveRole,
        id: &str,
    ) -> Result<Option<Medication>, AuthError> {
        Self::get_scoped(&*self.medications, role, id).await
    }

    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn get_center(
        &self,
        role: &EffectiveRole,
        id: &str,
    ) -> Result<Option<MedicalCenter>, AuthError> {
        Self::get_scoped(&*self.centers, role, id).await
    }

    async fn list_scoped<T: CatalogEntity>(
        &self,
        store: &dyn CatalogStore<T>,
        role: &EffectiveRole,
    ) -> Result<Vec<T>, AuthError> {
        match role {
            EffectiveRole::Admin => Ok(store.list(self.list_cap).await?),
            EffectiveRole::Visitor(sets) => {
                let ids = sets.ids_for(T::KIND);
                let mut out = Vec::with_capacity(ids.len());
                for id in ids {
                    // Stale assignments resolve to nothing.
                    if let Some(entity) = store.get(id).await? {
                        out.push(entity);
                    }
                }
                Ok(out)
            }
        }
    }

    async fn get_scoped<T: CatalogEntity>(
        store: &dyn CatalogStore<T>,
        role: &EffectiveRole,
        id: &str,
    ) -> Result<Option<T>, AuthError> {
        match role {
            EffectiveRole::Admin => Ok(store.get(id).await?),
            EffectiveRole::Visitor(sets) => {
                if !sets.contains(T::KIND, id) {
                    // Indistinguishable from a record that does not exist,
                    // so visitors cannot probe the catalog.
                    return Ok(None);
                }
                Ok(store.get(id).await?)
            }
        }
    }
}
