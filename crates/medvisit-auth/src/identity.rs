//! Identity extraction (the IdentityBridge).
//!
//! The server sits behind a verifying edge (reverse proxy / API gateway)
//! that authenticates the caller and forwards the verified identity as
//! request headers. This module only *reads* that outcome; it never
//! verifies credentials itself and never decides the final role - the
//! provider-asserted role claim is untrusted beyond profile seeding (see
//! [`crate::reconciler`]).

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};

use crate::error::AuthError;

/// Header carrying the verified external user id.
pub const USER_HEADER: &str = "x-auth-user";
/// Header carrying the verified email address.
pub const EMAIL_HEADER: &str = "x-auth-email";
/// Header carrying the provider-asserted role claim, if any.
pub const ROLE_HEADER: &str = "x-auth-role";

/// A verified identity for one request. Ephemeral; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Opaque id issued by the external identity provider.
    pub external_id: String,

    /// Verified email address, when the edge forwards one.
    pub email: Option<String>,

    /// Provider-asserted role claim. Untrusted for authorization beyond
    /// seeding a profile that does not yet exist.
    pub claimed_role: Option<String>,
}

impl Identity {
    #[must_use]
    pub fn new(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            email: None,
            claimed_role: None,
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn with_claimed_role(mut self, role: impl Into<String>) -> Self {
        self.claimed_role = Some(role.into());
        self
    }

    /// Extracts an identity from request headers.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` when the user header is missing or empty.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AuthError> {
        let header_str = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(ToString::to_string)
        };

        let external_id = header_str(USER_HEADER)
            .ok_or_else(|| AuthError::not_authenticated("missing identity header"))?;

        Ok(Self {
            external_id,
            email: header_str(EMAIL_HEADER),
            claimed_role: header_str(ROLE_HEADER),
        })
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Identity::from_headers(&parts.headers)
    }
}
