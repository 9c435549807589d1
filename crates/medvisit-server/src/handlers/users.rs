//! Admin user-directory handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use medvisit_auth::{AuthError, Identity};
use medvisit_core::{AssignmentUpdate, Role, UserProfile};
use medvisit_storage::ProfileStore;
use serde::Deserialize;

use super::LimitQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RoleBody {
    pub role: Role,
}

/// `GET /users` - bounded profile listing, admin-only.
pub async fn list_users(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<UserProfile>>, AuthError> {
    state.reconciler.require_admin(&identity).await?;
    let cap = state.auth_config.profile_list_limit;
    let limit = query.limit.unwrap_or(cap).min(cap);
    let profiles = state.profiles.list_all(limit).await?;
    Ok(Json(profiles))
}

/// `POST /users/{external_id}/role` - admin-gated role update.
pub async fn update_role(
    State(state): State<AppState>,
    identity: Identity,
    Path(external_id): Path<String>,
    Json(body): Json<RoleBody>,
) -> Result<Json<UserProfile>, AuthError> {
    let updated = state
        .reconciler
        .update_role(&identity, &external_id, body.role)
        .await?;
    Ok(Json(updated))
}

/// `PUT /users/{external_id}/assignments` - wholesale assignment
/// replacement, admin-only.
pub async fn set_assignments(
    State(state): State<AppState>,
    identity: Identity,
    Path(external_id): Path<String>,
    Json(update): Json<AssignmentUpdate>,
) -> Result<Json<UserProfile>, AuthError> {
    let role = state.reconciler.effective_role(&identity).await?;
    let updated = state
        .engine
        .set_assignments(&role, &identity.external_id, &external_id, update)
        .await?;
    Ok(Json(updated))
}

/// `DELETE /users/{external_id}` - admin-only profile deletion.
pub async fn delete_user(
    State(state): State<AppState>,
    identity: Identity,
    Path(external_id): Path<String>,
) -> Result<StatusCode, AuthError> {
    let role = state.reconciler.effective_role(&identity).await?;
    state
        .engine
        .delete_profile(&role, &identity.external_id, &external_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
