//! Google service-account credentials.
//!
//! A [`ServiceAccountKey`] is the JSON key file a GCP service account hands
//! out. It is turned into a short-lived OAuth2 access token with the
//! JWT-bearer grant: an RS256 assertion signed with the account's private key
//! is posted to the key's `token_uri`.

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertions are valid for one hour, the maximum Google accepts.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("invalid service account key: {0}")]
    InvalidKey(String),
    #[error("failed to sign service account assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("token request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("token endpoint error: HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: String,
    pub project_id: String,
    pub private_key_id: String,
    pub private_key: String,
    pub client_email: String,
    pub client_id: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub auth_provider_x509_cert_url: String,
    pub client_x509_cert_url: String,
}

impl ServiceAccountKey {
    pub fn validate(&self) -> Result<(), CredentialsError> {
        if self.key_type != "service_account" {
            return Err(CredentialsError::InvalidKey(format!(
                "expected type \"service_account\", got {:?}",
                self.key_type
            )));
        }
        for (field, value) in [
            ("private_key", &self.private_key),
            ("client_email", &self.client_email),
            ("token_uri", &self.token_uri),
        ] {
            if value.trim().is_empty() {
                return Err(CredentialsError::InvalidKey(format!(
                    "field '{field}' must not be empty"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Builds the signed JWT assertion for `key`, issued at `issued_at` (unix seconds).
pub fn sign_assertion(key: &ServiceAccountKey, issued_at: i64) -> Result<String, CredentialsError> {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(key.private_key_id.clone());

    let claims = AssertionClaims {
        iss: key.client_email.clone(),
        scope: CLOUD_PLATFORM_SCOPE.to_string(),
        aud: key.token_uri.clone(),
        iat: issued_at,
        exp: issued_at + ASSERTION_LIFETIME_SECS,
    };

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    Ok(jsonwebtoken::encode(&header, &claims, &encoding_key)?)
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Exchanges the service account key for an access token scoped to cloud-platform.
pub async fn fetch_access_token(
    client: &Client,
    key: &ServiceAccountKey,
) -> Result<AccessToken, CredentialsError> {
    key.validate()?;
    let assertion = sign_assertion(key, Utc::now().timestamp())?;

    let response = client
        .post(&key.token_uri)
        .form(&[
            ("grant_type", JWT_BEARER_GRANT_TYPE),
            ("assertion", assertion.as_str()),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CredentialsError::Status { status, body });
    }

    let token: AccessToken = response.json().await?;
    log::info!(
        "obtained access token for {} (expires in {:?}s)",
        key.client_email,
        token.expires_in
    );
    Ok(token)
}
