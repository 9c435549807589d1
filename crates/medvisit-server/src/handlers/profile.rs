use axum::{Json, extract::State};
use medvisit_auth::{AuthError, Identity};
use medvisit_core::UserProfile;

use crate::state::AppState;

/// `GET /profile` - the caller's own profile, created lazily on first
/// access.
pub async fn get_profile(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<UserProfile>, AuthError> {
    let profile = state.reconciler.resolve(&identity).await?;
    Ok(Json(profile))
}

/// `POST /profile/promote-self` - bootstrap self-promotion for the
/// allow-listed email.
pub async fn promote_self(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<UserProfile>, AuthError> {
    let profile = state.reconciler.promote_self(&identity).await?;
    Ok(Json(profile))
}
