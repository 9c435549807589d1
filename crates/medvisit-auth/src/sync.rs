//! Identity-provider lifecycle sync.
//!
//! The identity provider delivers `user.created` / `user.updated` events
//! over a webhook (signature verification happens at the edge, alongside
//! identity header injection). The gateway reconciles each event into the
//! profile store: create if absent, merge changed fields if present.
//! Events are idempotent, so provider redelivery is harmless.

use std::sync::Arc;

use medvisit_core::{ProfilePatch, Role, UserProfile};
use medvisit_storage::ProfileStore;
use serde::Deserialize;

use crate::audit::ActivityRecorder;
use crate::error::AuthError;

/// Actor recorded for provider-initiated changes.
const SYSTEM_ACTOR: &str = "identity-provider";

/// The payload of a lifecycle event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecyclePayload {
    pub external_id: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    /// Provider role claim. Typed, so an unknown role fails
    /// deserialization instead of silently seeding something.
    #[serde(default)]
    pub role: Option<Role>,
}

/// A lifecycle event as delivered on the webhook.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum LifecycleEvent {
    #[serde(rename = "user.created")]
    UserCreated(LifecyclePayload),

    #[serde(rename = "user.updated")]
    UserUpdated(LifecyclePayload),
}

impl LifecycleEvent {
    #[must_use]
    pub fn payload(&self) -> &LifecyclePayload {
        match self {
            Self::UserCreated(p) | Self::UserUpdated(p) => p,
        }
    }

    fn action(&self) -> &'static str {
        match self {
            Self::UserCreated(_) => "sync_user_created",
            Self::UserUpdated(_) => "sync_user_updated",
        }
    }
}

/// Reconciles provider lifecycle events into the profile store.
#[derive(Clone)]
pub struct SyncGateway {
    profiles: Arc<dyn ProfileStore>,
    recorder: ActivityRecorder,
}

impl SyncGateway {
    #[must_use]
    pub fn new(profiles: Arc<dyn ProfileStore>, recorder: ActivityRecorder) -> Self {
        Self { profiles, recorder }
    }

    /// Applies one lifecycle event and returns the resulting profile.
    ///
    /// Both event kinds reconcile the same way; the distinction only
    /// affects the recorded action name. An event carrying no role leaves
    /// the stored role untouched.
    ///
    /// # Errors
    ///
    /// Returns `Storage` on backend failure.
    pub async fn handle(&self, event: LifecycleEvent) -> Result<UserProfile, AuthError> {
        let payload = event.payload();

        let mut seed = UserProfile::new(
            &payload.external_id,
            payload.role.unwrap_or(Role::Visitor),
        );
        if let Some(name) = &payload.name {
            seed = seed.with_name(name);
        }

        let existing = self.profiles.get(&payload.external_id).await?;
        let profile = self.profiles.upsert_if_absent(seed).await?;
        let created = existing.is_none();

        let patch = Self::merge(&profile, payload);
        let profile = if patch.is_empty() {
            profile
        } else {
            self.profiles.patch(&payload.external_id, patch).await?
        };

        // Audit only when the event actually did something, so redelivery
        // does not flood the log.
        if created || existing.as_ref() != Some(&profile) {
            self.recorder
                .record(
                    SYSTEM_ACTOR,
                    event.action(),
                    "user",
                    Some(&payload.external_id),
                    None,
                )
                .await;
        }
        Ok(profile)
    }

    /// Computes the patch that brings `existing` in line with the payload.
    ///
    /// Only the display name and role are provider-owned; assignment sets
    /// never come from lifecycle events. The stored role wins whenever the
    /// payload omits one.
    fn merge(existing: &UserProfile, payload: &LifecyclePayload) -> ProfilePatch {
        let mut patch = ProfilePatch::default();
        if let Some(role) = payload.role {
            if role != existing.role {
                patch.role = Some(role);
            }
        }
        if let Some(name) = &payload.name {
            if existing.name.as_deref() != Some(name) {
                patch.name = Some(name.clone());
            }
        }
        patch
    }
}
