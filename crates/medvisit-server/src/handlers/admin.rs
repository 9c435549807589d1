//! Admin stats and activity-log handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use medvisit_auth::{AuthError, Identity};
use medvisit_core::ActivityLogEntry;
use medvisit_storage::{CatalogStore, ProfileStore};
use serde::Serialize;

use super::LimitQuery;
use crate::state::AppState;
use crate::visits::VisitStatusCounts;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub users: usize,
    pub doctors: usize,
    pub medications: usize,
    pub medical_centers: usize,
    pub visits: usize,
    pub visits_by_status: VisitStatusCounts,
}

/// `GET /admin/stats` - totals per collection, admin-only.
pub async fn stats(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Stats>, AuthError> {
    state.reconciler.require_admin(&identity).await?;

    let stats = Stats {
        users: state.profiles.count().await?,
        doctors: state.doctors.count().await?,
        medications: state.medications.count().await?,
        medical_centers: state.centers.count().await?,
        visits: state.visits.count().await?,
        visits_by_status: state.visits.status_counts().await?,
    };
    Ok(Json(stats))
}

/// `GET /admin/activity` - bounded activity-log listing, admin-only,
/// newest first.
pub async fn activity(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<ActivityLogEntry>>, AuthError> {
    state.reconciler.require_admin(&identity).await?;
    let cap = state.auth_config.activity_list_limit;
    let limit = query.limit.unwrap_or(cap).min(cap);
    let entries = state.recorder.list(limit).await?;
    Ok(Json(entries))
}
