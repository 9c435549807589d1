//! Identity-provider lifecycle webhook.
//!
//! Edge-authenticated: the gateway verifies the provider's signature
//! before the event reaches this process, so no identity headers are
//! required here. Storage failures surface as 5xx so the provider
//! redelivers.

use axum::{Json, extract::State};
use medvisit_auth::{AuthError, LifecycleEvent};
use medvisit_core::UserProfile;

use crate::state::AppState;

pub async fn identity_webhook(
    State(state): State<AppState>,
    Json(event): Json<LifecycleEvent>,
) -> Result<Json<UserProfile>, AuthError> {
    let profile = state.sync.handle(event).await?;
    Ok(Json(profile))
}
