// Identity types owned by the hosted auth service
// The gateway only reads a handful of fields and passes the rest through

pub mod provider;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use provider::IdentityProvider;

/// User record as issued by the auth provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub email_confirmed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_metadata: Map<String, Value>,
    /// Provider fields the gateway does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AuthUser {
    pub fn is_email_confirmed(&self) -> bool {
        self.email_confirmed_at.is_some()
    }

    /// Display name kept in the provider's user metadata, if any
    pub fn metadata_name(&self) -> Option<&str> {
        self.user_metadata.get("name").and_then(Value::as_str)
    }
}

/// Session issued after a password sign-in or an auto-confirmed signup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of signup or sign-in
///
/// `session` is `None` while email confirmation is pending.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AuthResponse {
    pub user: Option<AuthUser>,
    pub session: Option<AuthSession>,
}

/// Metadata written alongside the auth user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserMetadata {
    pub name: Option<String>,
    pub display_name: Option<String>,
}

impl UserMetadata {
    pub fn with_name(name: Option<String>) -> Self {
        Self {
            display_name: name.clone(),
            name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn auth_user_keeps_unknown_fields() {
        let user: AuthUser = serde_json::from_value(json!({
            "id": "11111111-2222-3333-4444-555555555555",
            "aud": "authenticated",
            "email": "ann@example.com",
            "created_at": "2024-05-01T10:00:00.123456Z",
            "email_confirmed_at": null,
            "user_metadata": {"name": "Ann"}
        }))
        .unwrap();

        assert_eq!(user.metadata_name(), Some("Ann"));
        assert!(!user.is_email_confirmed());
        assert_eq!(user.extra["aud"], "authenticated");

        let round = serde_json::to_value(&user).unwrap();
        assert_eq!(round["aud"], "authenticated");
        assert_eq!(round["id"], "11111111-2222-3333-4444-555555555555");
    }

    #[test]
    fn metadata_name_ignores_non_strings() {
        let user: AuthUser = serde_json::from_value(json!({
            "id": "u1",
            "created_at": "2024-05-01T10:00:00+00:00",
            "user_metadata": {"name": 42}
        }))
        .unwrap();
        assert_eq!(user.metadata_name(), None);
    }

    #[test]
    fn metadata_duplicates_name() {
        let meta = UserMetadata::with_name(Some("Ann".into()));
        assert_eq!(meta.display_name.as_deref(), Some("Ann"));
        assert_eq!(meta.name.as_deref(), Some("Ann"));
    }
}
