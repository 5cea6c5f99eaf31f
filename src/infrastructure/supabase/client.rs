use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

/// Connection settings for a hosted project
#[derive(Debug, Clone)]
pub struct SupabaseSettings {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Public anon key, sent as `apikey` on every request
    pub anon_key: SecretString,
    pub timeout: Duration,
}

/// Shared HTTP plumbing for the auth and table adapters
#[derive(Clone)]
pub struct SupabaseClient {
    base_url: String,
    anon_key: SecretString,
    http: reqwest::Client,
}

impl SupabaseClient {
    /// Creates a client with its own connection pool
    pub fn new(settings: &SupabaseSettings) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            base_url: settings.url.trim_end_matches('/').to_string(),
            anon_key: settings.anon_key.clone(),
            http,
        })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request authorized with the anon key
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let key = self.anon_key.expose_secret();
        self.http
            .request(method, self.url(path))
            .header("apikey", key)
            .bearer_auth(key)
    }

    /// Request acting as the user owning `access_token`
    pub(crate) fn user_request(&self, method: Method, path: &str, access_token: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header("apikey", self.anon_key.expose_secret())
            .bearer_auth(access_token)
    }
}
