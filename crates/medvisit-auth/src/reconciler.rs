//! Role reconciliation.
//!
//! The profile store is the canonical source for a user's role. Provider
//! claims are consulted exactly once, when a profile is first created; on
//! every later request the stored role wins, so a stale or tampered claim
//! can never widen access.

use std::str::FromStr;
use std::sync::Arc;

use medvisit_core::{ProfilePatch, Role, UserProfile};
use medvisit_storage::{ProfileStore, StorageError};

use crate::audit::ActivityRecorder;
use crate::error::AuthError;
use crate::identity::Identity;
use crate::role::EffectiveRole;

/// Reconciles identities against stored profiles and answers role queries.
#[derive(Clone)]
pub struct RoleReconciler {
    profiles: Arc<dyn ProfileStore>,
    recorder: ActivityRecorder,
    bootstrap_admin_email: Option<String>,
}

impl RoleReconciler {
    #[must_use]
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        recorder: ActivityRecorder,
        bootstrap_admin_email: Option<String>,
    ) -> Self {
        Self {
            profiles,
            recorder,
            bootstrap_admin_email,
        }
    }

    /// The role a brand-new profile is seeded with. Unknown or malformed
    /// claims fall back to visitor (default deny).
    fn seed_role(claimed: Option<&str>) -> Role {
        claimed
            .and_then(|raw| Role::from_str(raw).ok())
            .unwrap_or(Role::Visitor)
    }

    /// Resolves the caller's profile, creating it on first access.
    ///
    /// # Errors
    ///
    /// Returns `Storage` on backend failure.
    pub async fn resolve(&self, identity: &Identity) -> Result<UserProfile, AuthError> {
        let seed = UserProfile::new(
            &identity.external_id,
            Self::seed_role(identity.claimed_role.as_deref()),
        );
        Ok(self.profiles.upsert_if_absent(seed).await?)
    }

    /// Resolves the caller's effective role, creating the profile on first
    /// access.
    ///
    /// # Errors
    ///
    /// Returns `Storage` on backend failure.
    pub async fn effective_role(&self, identity: &Identity) -> Result<EffectiveRole, AuthError> {
        let profile = self.resolve(identity).await?;
        Ok(EffectiveRole::from(&profile))
    }

    /// Resolves the caller and requires the admin role.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admins, `Storage` on backend failure.
    pub async fn require_admin(&self, identity: &Identity) -> Result<UserProfile, AuthError> {
        let profile = self.resolve(identity).await?;
        if !profile.role.is_admin() {
            return Err(AuthError::unauthorized("admin role required"));
        }
        Ok(profile)
    }

    /// Bootstrap self-promotion: promotes the caller to admin when their
    /// verified email matches the configured bootstrap email.
    ///
    /// Idempotent; promoting an existing admin is a no-op that still
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when no bootstrap email is configured, the
    /// identity carries no email, or the emails do not match.
    pub async fn promote_self(&self, identity: &Identity) -> Result<UserProfile, AuthError> {
        let allowed = self
            .bootstrap_admin_email
            .as_deref()
            .ok_or_else(|| AuthError::unauthorized("self-promotion is not enabled"))?;
        let email = identity
            .email
            .as_deref()
            .ok_or_else(|| AuthError::unauthorized("no verified email on identity"))?;
        if !email.eq_ignore_ascii_case(allowed) {
            return Err(AuthError::unauthorized("email is not allowed to self-promote"));
        }

        // Seed as admin for a first-touch caller; patch an existing
        // non-admin profile up.
        let seed = UserProfile::new(&identity.external_id, Role::Admin);
        let mut profile = self.profiles.upsert_if_absent(seed).await?;
        if !profile.role.is_admin() {
            profile = self
                .profiles
                .patch(&identity.external_id, ProfilePatch::role(Role::Admin))
                .await?;
        }

        self.recorder
            .record(
                &identity.external_id,
                "promote_self",
                "user",
                Some(&identity.external_id),
                Some(format!("bootstrap promotion for {email}")),
            )
            .await;
        Ok(profile)
    }

    /// Admin-gated role change for another user.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` unless the caller is admin, `NotFound` if no
    /// profile exists for `target_external_id`.
    pub async fn update_role(
        &self,
        caller: &Identity,
        target_external_id: &str,
        new_role: Role,
    ) -> Result<UserProfile, AuthError> {
        let admin = self.require_admin(caller).await?;

        let updated = self
            .profiles
            .patch(target_external_id, ProfilePatch::role(new_role))
            .await
            .map_err(|err| match err {
                StorageError::NotFound { .. } => AuthError::not_found("user", target_external_id),
                other => other.into(),
            })?;

        self.recorder
            .record(
                &admin.external_id,
                "update_role",
                "user",
                Some(target_external_id),
                Some(format!("role set to {new_role}")),
            )
            .await;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medvisit_db_memory::{InMemoryActivityLog, InMemoryProfileStore};

    fn reconciler(bootstrap: Option<&str>) -> (RoleReconciler, Arc<InMemoryProfileStore>) {
        let profiles = Arc::new(InMemoryProfileStore::new());
        let recorder = ActivityRecorder::new(Arc::new(InMemoryActivityLog::new()));
        let reconciler = RoleReconciler::new(
            profiles.clone(),
            recorder,
            bootstrap.map(ToString::to_string),
        );
        (reconciler, profiles)
    }

    #[tokio::test]
    async fn test_first_access_seeds_from_claim() {
        let (reconciler, _) = reconciler(None);
        let identity = Identity::new("user-1").with_claimed_role("admin");
        let profile = reconciler.resolve(&identity).await.unwrap();
        assert_eq!(profile.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_unknown_claim_defaults_to_visitor() {
        let (reconciler, _) = reconciler(None);
        let identity = Identity::new("user-1").with_claimed_role("superuser");
        let profile = reconciler.resolve(&identity).await.unwrap();
        assert_eq!(profile.role, Role::Visitor);
    }

    #[tokio::test]
    async fn test_stored_role_wins_over_later_claims() {
        let (reconciler, _) = reconciler(None);
        let profile = reconciler
            .resolve(&Identity::new("user-1").with_claimed_role("visitor"))
            .await
            .unwrap();
        assert_eq!(profile.role, Role::Visitor);

        // A later request arriving with an admin claim must not escalate.
        let profile = reconciler
            .resolve(&Identity::new("user-1").with_claimed_role("admin"))
            .await
            .unwrap();
        assert_eq!(profile.role, Role::Visitor);
    }

    #[tokio::test]
    async fn test_require_admin() {
        let (reconciler, _) = reconciler(None);
        let admin = Identity::new("a1").with_claimed_role("admin");
        let visitor = Identity::new("v1");

        assert!(reconciler.require_admin(&admin).await.is_ok());
        let err = reconciler.require_admin(&visitor).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_promote_self_matching_email() {
        let (reconciler, _) = reconciler(Some("boss@example.com"));
        let identity = Identity::new("user-1").with_email("Boss@Example.com");
        let profile = reconciler.promote_self(&identity).await.unwrap();
        assert_eq!(profile.role, Role::Admin);

        // Idempotent.
        let profile = reconciler.promote_self(&identity).await.unwrap();
        assert_eq!(profile.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_promote_self_promotes_existing_visitor() {
        let (reconciler, _) = reconciler(Some("boss@example.com"));
        let identity = Identity::new("user-1").with_email("boss@example.com");
        reconciler.resolve(&identity).await.unwrap();

        let profile = reconciler.promote_self(&identity).await.unwrap();
        assert_eq!(profile.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_promote_self_rejections() {
        let (disabled, _) = reconciler(None);
        let err = disabled
            .promote_self(&Identity::new("u1").with_email("boss@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized { .. }));

        let (reconciler, _) = reconciler(Some("boss@example.com"));
        let err = reconciler
            .promote_self(&Identity::new("u1").with_email("other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized { .. }));

        let err = reconciler
            .promote_self(&Identity::new("u1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_update_role_admin_gated() {
        let (reconciler, _) = reconciler(None);
        let admin = Identity::new("a1").with_claimed_role("admin");
        let visitor = Identity::new("v1");
        reconciler.resolve(&visitor).await.unwrap();

        let err = reconciler
            .update_role(&visitor, "a1", Role::Visitor)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized { .. }));

        let updated = reconciler
            .update_role(&admin, "v1", Role::Admin)
            .await
            .unwrap();
        assert_eq!(updated.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_update_role_missing_target() {
        let (reconciler, _) = reconciler(None);
        let admin = Identity::new("a1").with_claimed_role("admin");
        let err = reconciler
            .update_role(&admin, "ghost", Role::Admin)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotFound { .. }));
    }
}
