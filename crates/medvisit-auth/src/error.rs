//! Access-engine error types and their HTTP mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use medvisit_core::CoreError;
use medvisit_storage::StorageError;

/// Errors surfaced by the access engine.
///
/// Every operation terminates with one of these; the engine performs no
/// local retries (all operations are idempotent or safely re-invocable by
/// the caller).
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The request carries no verifiable identity.
    #[error("Not authenticated: {message}")]
    NotAuthenticated { message: String },

    /// Authenticated, but the effective role is insufficient.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// The request payload violates a validation rule or invariant.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The target profile or entity does not exist.
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    /// The storage backend failed.
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AuthError {
    /// Creates a new `NotAuthenticated` error.
    #[must_use]
    pub fn not_authenticated(message: impl Into<String>) -> Self {
        Self::NotAuthenticated {
            message: message.into(),
        }
    }

    /// Creates a new `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a new `Validation` error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Machine-readable error code used in HTTP responses.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAuthenticated { .. } => "not_authenticated",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Validation { .. } => "validation_error",
            Self::NotFound { .. } => "not_found",
            Self::Storage { .. } => "storage_error",
            Self::Internal { .. } => "internal_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::NotAuthenticated { .. } => StatusCode::UNAUTHORIZED,
            Self::Unauthorized { .. } => StatusCode::FORBIDDEN,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Storage { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            StorageError::AlreadyExists { .. } => Self::Validation {
                message: err.to_string(),
            },
            StorageError::Internal { message } => Self::Storage { message },
        }
    }
}

impl From<CoreError> for AuthError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            other if other.is_client_error() => Self::Validation {
                message: other.to_string(),
            },
            other => Self::Internal {
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = json!({
            "error": self.code(),
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AuthError::not_authenticated("x").code(), "not_authenticated");
        assert_eq!(AuthError::unauthorized("x").code(), "unauthorized");
        assert_eq!(AuthError::validation("x").code(), "validation_error");
        assert_eq!(AuthError::not_found("profile", "u1").code(), "not_found");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AuthError::not_authenticated("x").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::unauthorized("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AuthError::not_found("profile", "u1").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AuthError::storage("down").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_storage_error() {
        let err: AuthError = StorageError::not_found("profile", "u1").into();
        assert!(matches!(err, AuthError::NotFound { .. }));

        let err: AuthError = StorageError::internal("backend down").into();
        assert!(matches!(err, AuthError::Storage { .. }));
    }

    #[test]
    fn test_from_core_error() {
        let err: AuthError = CoreError::validation("too many centers").into();
        assert!(matches!(err, AuthError::Validation { .. }));

        let err: AuthError = CoreError::not_found("doctor", "d1").into();
        assert!(matches!(err, AuthError::NotFound { .. }));
    }
}
