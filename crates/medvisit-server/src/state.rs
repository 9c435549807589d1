//! Shared application state.

use std::sync::Arc;

use medvisit_auth::{
    ActivityRecorder, AssignmentEngine, AuthConfig, RoleReconciler, ScopedQueryFilter, SyncGateway,
};
use medvisit_core::{Doctor, MedicalCenter, Medication};
use medvisit_db_memory::{
    InMemoryActivityLog, InMemoryCatalogStore, InMemoryProfileStore, InMemoryVisitStore,
};
use medvisit_storage::{CatalogStore, ProfileStore};

use crate::visits::VisitService;

/// Everything the handlers need, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub reconciler: RoleReconciler,
    pub engine: AssignmentEngine,
    pub filter: ScopedQueryFilter,
    pub sync: SyncGateway,
    pub visits: VisitService,
    pub recorder: ActivityRecorder,

    // Store handles kept for the admin directory and stats endpoints.
    pub profiles: Arc<dyn ProfileStore>,
    pub doctors: Arc<dyn CatalogStore<Doctor>>,
    pub medications: Arc<dyn CatalogStore<Medication>>,
    pub centers: Arc<dyn CatalogStore<MedicalCenter>>,

    pub auth_config: AuthConfig,
}

impl AppState {
    /// Builds the full component graph over fresh in-memory stores.
    #[must_use]
    pub fn new(auth_config: AuthConfig) -> Self {
        let profiles: Arc<dyn ProfileStore> = Arc::new(InMemoryProfileStore::new());
        let doctors: Arc<dyn CatalogStore<Doctor>> =
            Arc::new(InMemoryCatalogStore::<Doctor>::new());
        let medications: Arc<dyn CatalogStore<Medication>> =
            Arc::new(InMemoryCatalogStore::<Medication>::new());
        let centers: Arc<dyn CatalogStore<MedicalCenter>> =
            Arc::new(InMemoryCatalogStore::<MedicalCenter>::new());
        let visits = Arc::new(InMemoryVisitStore::new());
        let recorder = ActivityRecorder::new(Arc::new(InMemoryActivityLog::new()));

        let reconciler = RoleReconciler::new(
            profiles.clone(),
            recorder.clone(),
            auth_config.bootstrap_admin_email.clone(),
        );
        let engine = AssignmentEngine::new(
            profiles.clone(),
            doctors.clone(),
            medications.clone(),
            centers.clone(),
            recorder.clone(),
        );
        let filter = ScopedQueryFilter::new(
            doctors.clone(),
            medications.clone(),
            centers.clone(),
            auth_config.admin_list_cap,
        );
        let sync = SyncGateway::new(profiles.clone(), recorder.clone());
        let visits = VisitService::new(visits, recorder.clone(), auth_config.admin_list_cap);

        Self {
            reconciler,
            engine,
            filter,
            sync,
            visits,
            recorder,
            profiles,
            doctors,
            medications,
            centers,
            auth_config,
        }
    }
}
