use std::path::Path;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error("failed to read credentials file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse credentials file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to sign service account assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Contents of the credentials file. Service account keys are recognised by
/// their `client_email` and `private_key`; anything else is read as an OAuth
/// user token file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Credentials {
    ServiceAccount(ServiceAccountKey),
    AuthorizedUser(AuthorizedUser),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub private_key_id: Option<String>,
    pub token_uri: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorizedUser {
    #[serde(alias = "access_token")]
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub token_uri: Option<String>,
    pub expiry: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

impl Credentials {
    pub async fn from_file(path: &Path) -> Result<Self, CredentialsError> {
        let raw = tokio::fs::read(path)
            .await
            .map_err(|source| CredentialsError::Read {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_slice(&raw)
    }

    pub fn from_slice(raw: &[u8]) -> Result<Self, CredentialsError> {
        Ok(serde_json::from_slice(raw)?)
    }

    pub fn token_uri(&self) -> Option<&str> {
        match self {
            Self::ServiceAccount(key) => key.token_uri.as_deref(),
            Self::AuthorizedUser(user) => user.token_uri.as_deref(),
        }
    }
}

impl ServiceAccountKey {
    /// Signed RS256 assertion for the JWT bearer grant.
    pub fn assertion(
        &self,
        scope: &str,
        audience: &str,
        now: DateTime<Utc>,
    ) -> Result<String, CredentialsError> {
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope,
            aud: audience,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.private_key_id.clone();

        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())?;
        Ok(jsonwebtoken::encode(&header, &claims, &key)?)
    }
}
