//! Access-engine configuration.

use serde::Deserialize;

/// Configuration for the access engine.
///
/// Deserialized from the server's `[auth]` config section; every field has
/// a default so an empty section is valid.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Email allowed to self-promote to admin during bootstrap. Disabled
    /// when unset.
    pub bootstrap_admin_email: Option<String>,

    /// Upper bound on admin-facing full-collection listings.
    pub admin_list_cap: usize,

    /// Upper bound on the admin user-directory listing.
    pub profile_list_limit: usize,

    /// Upper bound on activity-log listings.
    pub activity_list_limit: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            bootstrap_admin_email: None,
            admin_list_cap: 10_000,
            profile_list_limit: 100,
            activity_list_limit: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert!(config.bootstrap_admin_email.is_none());
        assert_eq!(config.admin_list_cap, 10_000);
        assert_eq!(config.profile_list_limit, 100);
        assert_eq!(config.activity_list_limit, 100);
    }

    #[test]
    fn test_empty_section_deserializes() {
        let config: AuthConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(config.bootstrap_admin_email.is_none());
        assert_eq!(config.admin_list_cap, 10_000);
    }

    #[test]
    fn test_partial_section() {
        let config: AuthConfig = serde_json::from_value(serde_json::json!({
            "bootstrap_admin_email": "boss@example.com",
            "admin_list_cap": 50,
        }))
        .unwrap();
        assert_eq!(
            config.bootstrap_admin_email.as_deref(),
            Some("boss@example.com")
        );
        assert_eq!(config.admin_list_cap, 50);
        assert_eq!(config.profile_list_limit, 100);
    }
}
