//! Visit handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use medvisit_auth::{AuthError, Identity};
use medvisit_core::Visit;

use super::LimitQuery;
use crate::state::AppState;
use crate::visits::{NewVisit, VisitUpdate};

/// Default page size for `GET /visits/recent`.
const RECENT_LIMIT: usize = 10;

pub async fn create_visit(
    State(state): State<AppState>,
    identity: Identity,
    Json(input): Json<NewVisit>,
) -> Result<(StatusCode, Json<Visit>), AuthError> {
    let role = state.reconciler.effective_role(&identity).await?;
    let visit = state
        .visits
        .create(&role, &identity.external_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(visit)))
}

pub async fn update_visit(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    Json(update): Json<VisitUpdate>,
) -> Result<Json<Visit>, AuthError> {
    let role = state.reconciler.effective_role(&identity).await?;
    let visit = state
        .visits
        .update(&role, &identity.external_id, &id, update)
        .await?;
    Ok(Json(visit))
}

pub async fn get_visit(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<Visit>, AuthError> {
    let role = state.reconciler.effective_role(&identity).await?;
    let visit = state.visits.get(&role, &identity.external_id, &id).await?;
    Ok(Json(visit))
}

pub async fn list_visits(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<Visit>>, AuthError> {
    let role = state.reconciler.effective_role(&identity).await?;
    let visits = state
        .visits
        .list(&role, &identity.external_id, query.limit)
        .await?;
    Ok(Json(visits))
}

pub async fn recent_visits(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<Visit>>, AuthError> {
    let role = state.reconciler.effective_role(&identity).await?;
    let limit = query.limit.unwrap_or(RECENT_LIMIT);
    let visits = state
        .visits
        .list(&role, &identity.external_id, Some(limit))
        .await?;
    Ok(Json(visits))
}
