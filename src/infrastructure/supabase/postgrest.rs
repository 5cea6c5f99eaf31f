use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Method, RequestBuilder};
use serde_json::json;

use super::client::SupabaseClient;
use super::error::check;
use crate::domain::errors::ProviderResult;
use crate::domain::repositories::{ProfileRepository, ProfileRow, UserProfile};
use crate::domain::user::value_objects::Email;

const PROFILE_TABLE: &str = "/rest/v1/users";

/// Profile table adapter over the hosted REST table API (`/rest/v1`)
pub struct SupabaseProfileRepository {
    client: SupabaseClient,
    probe_path: String,
}

impl SupabaseProfileRepository {
    /// `probe_table` is read by [`ping`](ProfileRepository::ping)
    pub fn new(client: SupabaseClient, probe_table: &str) -> Self {
        Self {
            client,
            probe_path: format!("/rest/v1/{}", probe_table),
        }
    }

    /// Profile table request, as the signed-in user when a token is known
    fn table_request(&self, method: Method, access_token: Option<&str>) -> RequestBuilder {
        match access_token {
            Some(token) => self.client.user_request(method, PROFILE_TABLE, token),
            None => self.client.request(method, PROFILE_TABLE),
        }
    }
}

#[async_trait]
impl ProfileRepository for SupabaseProfileRepository {
    async fn insert(&self, profile: &UserProfile, access_token: Option<&str>) -> ProviderResult<()> {
        let response = self
            .table_request(Method::POST, access_token)
            .header("Prefer", "return=minimal")
            .json(profile)
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &str,
        access_token: Option<&str>,
    ) -> ProviderResult<Option<ProfileRow>> {
        let response = self
            .table_request(Method::GET, access_token)
            .query(&[("select", "*".to_string()), ("id", format!("eq.{}", id))])
            .send()
            .await?;

        let rows: Vec<ProfileRow> = check(response).await?.json().await?;
        Ok(rows.into_iter().next())
    }

    async fn find_all(&self) -> ProviderResult<Vec<ProfileRow>> {
        let response = self
            .client
            .request(Method::GET, PROFILE_TABLE)
            .query(&[("select", "*")])
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    async fn mark_email_confirmed(&self, email: &Email) -> ProviderResult<()> {
        let response = self
            .client
            .request(Method::PATCH, PROFILE_TABLE)
            .query(&[("email", format!("eq.{}", email.as_str()))])
            .header("Prefer", "return=minimal")
            .json(&json!({
                "email_confirmed": true,
                "updated_at": Utc::now(),
            }))
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    async fn ping(&self) -> ProviderResult<()> {
        let response = self
            .client
            .request(Method::GET, &self.probe_path)
            .query(&[("select", "*"), ("limit", "1")])
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }
}
