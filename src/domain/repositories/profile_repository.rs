use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::domain::errors::ProviderResult;
use crate::domain::identity::AuthUser;
use crate::domain::user::value_objects::Email;

/// Row written to the `users` profile table right after signup
///
/// `id` is the auth provider's user id and is the only link between the
/// two systems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub email_confirmed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Builds the row written right after signup
    pub fn for_new_user(user: &AuthUser, email: &Email, name: Option<String>) -> Self {
        Self {
            id: user.id.clone(),
            name,
            email: email.as_str().to_string(),
            created_at: user.created_at,
            email_confirmed: user.is_email_confirmed(),
            updated_at: None,
        }
    }
}

/// Profile row as read back from the table
///
/// The table schema is owned by the hosted project, so only `id` is
/// required. Every other column, typed or not, round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_confirmed: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<UserProfile> for ProfileRow {
    fn from(profile: UserProfile) -> Self {
        let mut extra = Map::new();
        extra.insert("created_at".to_string(), json!(profile.created_at));
        if let Some(updated_at) = profile.updated_at {
            extra.insert("updated_at".to_string(), json!(updated_at));
        }
        Self {
            id: profile.id,
            name: profile.name,
            email: Some(profile.email),
            email_confirmed: Some(profile.email_confirmed),
            extra,
        }
    }
}

/// Repository trait for the profile table
///
/// `access_token`, when given, makes the call as that signed-in user so
/// row-level security policies keyed on the user id apply. Without it the
/// call uses the project's anon key.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Insert a new profile row
    async fn insert(&self, profile: &UserProfile, access_token: Option<&str>) -> ProviderResult<()>;

    /// Find a profile by auth user id
    async fn find_by_id(
        &self,
        id: &str,
        access_token: Option<&str>,
    ) -> ProviderResult<Option<ProfileRow>>;

    /// Dump every profile row
    async fn find_all(&self) -> ProviderResult<Vec<ProfileRow>>;

    /// Set `email_confirmed` on rows matching `email`
    ///
    /// Development override; the provider's confirmation flow is not involved.
    async fn mark_email_confirmed(&self, email: &Email) -> ProviderResult<()>;

    /// Read one row from the configured check table
    async fn ping(&self) -> ProviderResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_tolerates_naive_timestamps_and_nulls() {
        let rows: Vec<ProfileRow> = serde_json::from_value(json!([
            {
                "id": "u1",
                "name": "Ann",
                "email": "a@b.com",
                "created_at": "2024-05-01T10:00:00.123456",
                "email_confirmed": null,
                "avatar_url": "https://cdn.example.com/ann.png",
                "age": 31
            },
            { "id": "u2" }
        ]))
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name.as_deref(), Some("Ann"));
        assert_eq!(rows[0].email_confirmed, None);
        assert_eq!(rows[1].email, None);

        let dumped = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(dumped["created_at"], "2024-05-01T10:00:00.123456");
        assert_eq!(dumped["avatar_url"], "https://cdn.example.com/ann.png");
        assert_eq!(dumped["age"], 31);
        assert!(dumped["email_confirmed"].is_null());
    }

    #[test]
    fn inserted_profile_reads_back_with_all_columns() {
        let created_at = "2024-05-01T10:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let row = ProfileRow::from(UserProfile {
            id: "u1".into(),
            name: None,
            email: "a@b.com".into(),
            created_at,
            email_confirmed: false,
            updated_at: None,
        });

        assert_eq!(row.email.as_deref(), Some("a@b.com"));
        assert_eq!(row.email_confirmed, Some(false));
        assert_eq!(row.extra["created_at"], json!(created_at));
        assert!(!row.extra.contains_key("updated_at"));
    }
}
