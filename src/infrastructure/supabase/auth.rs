use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;

use super::{remote_error, SupabaseClient};
use crate::domain::{AuthUser, KanbanError, Session};
use crate::session::AuthProvider;

#[derive(Debug, Clone)]
pub struct AuthClient {
    client: SupabaseClient,
}

impl AuthClient {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthProvider for AuthClient {
    async fn get_user(&self, access_token: &str) -> Result<AuthUser, KanbanError> {
        let response = self
            .client
            .http()
            .get(self.client.auth_url("user"))
            .header("apikey", self.client.anon_key())
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let body = response.bytes().await?;
                Ok(serde_json::from_slice(&body)?)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(KanbanError::Unauthorized("Session is not valid".into()))
            }
            _ => Err(remote_error(response).await),
        }
    }

    fn authorize_url(
        &self,
        provider: &str,
        redirect_to: &str,
        code_challenge: &str,
    ) -> Result<String, KanbanError> {
        let url = reqwest::Url::parse_with_params(
            &self.client.auth_url("authorize"),
            &[
                ("provider", provider),
                ("redirect_to", redirect_to),
                ("code_challenge", code_challenge),
                ("code_challenge_method", "s256"),
            ],
        )
        .map_err(|e| KanbanError::Internal(format!("Invalid auth URL: {}", e)))?;

        Ok(url.into())
    }

    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<Session, KanbanError> {
        let response = self
            .client
            .http()
            .post(self.client.auth_url("token"))
            .header("apikey", self.client.anon_key())
            .query(&[("grant_type", "pkce")])
            .json(&json!({
                "auth_code": code,
                "code_verifier": code_verifier,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(remote_error(response).await);
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), KanbanError> {
        let response = self
            .client
            .http()
            .post(self.client.auth_url("logout"))
            .header("apikey", self.client.anon_key())
            .bearer_auth(access_token)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(remote_error(response).await)
        }
    }
}
