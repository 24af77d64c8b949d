use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;

use super::credentials::{AuthorizedUser, Credentials, JWT_BEARER_GRANT, ServiceAccountKey};
use crate::application::ports::ProviderError;

const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_none_or(|expires_at| expires_at - Duration::seconds(EXPIRY_MARGIN_SECS) > now)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

/// Hands out bearer tokens for the configured credentials file, caching each
/// one until shortly before it expires.
pub struct TokenSource {
    client: Client,
    credentials_path: PathBuf,
    scope: String,
    token_url: String,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenSource {
    pub fn new(
        client: Client,
        credentials_path: PathBuf,
        scope: String,
        token_url: String,
    ) -> Self {
        Self {
            client,
            credentials_path,
            scope,
            token_url,
            cached: Mutex::new(None),
        }
    }

    pub async fn bearer(&self) -> Result<String, ProviderError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Utc::now())) {
            return Ok(token.value.clone());
        }

        let credentials = Credentials::from_file(&self.credentials_path)
            .await
            .map_err(|e| ProviderError::Authentication(e.to_string()))?;

        let token = self.obtain(credentials).await?;
        let value = token.value.clone();
        *cached = Some(token);

        Ok(value)
    }

    async fn obtain(&self, credentials: Credentials) -> Result<AccessToken, ProviderError> {
        let token_url = credentials
            .token_uri()
            .unwrap_or(&self.token_url)
            .to_string();

        match credentials {
            Credentials::AuthorizedUser(user) => self.user_token(user, &token_url).await,
            Credentials::ServiceAccount(key) => self.service_account_token(key, &token_url).await,
        }
    }

    async fn user_token(
        &self,
        user: AuthorizedUser,
        token_url: &str,
    ) -> Result<AccessToken, ProviderError> {
        if let Some(value) = user.token {
            let token = AccessToken {
                value,
                expires_at: user.expiry,
            };
            if token.is_fresh(Utc::now()) {
                return Ok(token);
            }
            tracing::debug!("Stored access token expired, refreshing");
        }

        let (Some(refresh_token), Some(client_id), Some(client_secret)) =
            (user.refresh_token, user.client_id, user.client_secret)
        else {
            return Err(ProviderError::Authentication(
                "credentials hold no valid token and cannot be refreshed".to_string(),
            ));
        };

        self.exchange(
            token_url,
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.as_str()),
            ],
        )
        .await
    }

    async fn service_account_token(
        &self,
        key: ServiceAccountKey,
        token_url: &str,
    ) -> Result<AccessToken, ProviderError> {
        let assertion = key
            .assertion(&self.scope, token_url, Utc::now())
            .map_err(|e| ProviderError::Authentication(e.to_string()))?;

        self.exchange(
            token_url,
            &[
                ("grant_type", JWT_BEARER_GRANT),
                ("assertion", assertion.as_str()),
            ],
        )
        .await
    }

    async fn exchange(
        &self,
        token_url: &str,
        form: &[(&str, &str)],
    ) -> Result<AccessToken, ProviderError> {
        let requested_at = Utc::now();

        let response = self
            .client
            .post(token_url)
            .form(form)
            .send()
            .await
            .map_err(|e| ProviderError::Authentication(format!("token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Authentication(format!(
                "token endpoint returned {status}: {text}"
            )));
        }

        let body: TokenResponse = response.json().await.map_err(|e| {
            ProviderError::Authentication(format!("token response parse failed: {e}"))
        })?;

        tracing::info!(expires_in = ?body.expires_in, "Obtained provider access token");

        Ok(AccessToken {
            value: body.access_token,
            expires_at: body
                .expires_in
                .map(|secs| requested_at + Duration::seconds(secs)),
        })
    }
}
