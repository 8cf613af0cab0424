//! HTTP client for the hosted backend: PostgREST tables under `/rest/v1`
//! and the GoTrue auth service under `/auth/v1`.

pub mod auth;
pub mod rest;

use serde_json::Value;

use crate::config::Config;
use crate::domain::KanbanError;

pub use auth::AuthClient;
pub use rest::{RestClient, TableQuery};

#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(http: reqwest::Client, base_url: &str, anon_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    pub fn from_config(http: reqwest::Client, config: &Config) -> Self {
        Self::new(http, &config.supabase_url, &config.supabase_anon_key)
    }

    /// Table client acting as the user who owns `access_token`.
    pub fn rest(&self, access_token: &str) -> RestClient {
        RestClient::new(self.clone(), access_token)
    }

    pub fn auth(&self) -> AuthClient {
        AuthClient::new(self.clone())
    }

    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Turns a non-success response into a `KanbanError::Remote`, pulling the
/// human-readable message out of PostgREST or GoTrue error bodies.
pub(crate) async fn remote_error(response: reqwest::Response) -> KanbanError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    KanbanError::Remote {
        status,
        message: error_message(&body),
    }
}

fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };

    ["message", "msg", "error_description", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string())
}
