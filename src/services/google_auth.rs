//! Google service account authentication
//!
//! Exchanges a signed JWT assertion for an OAuth2 access token and caches the
//! token until shortly before it expires.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};
use crate::config::SheetsConfig;
use crate::utils::errors::{LedgerBuddyError, Result, SheetsError, SheetsResult};

/// OAuth scopes needed to append rows and to look spreadsheets up by name
pub const SCOPES: &str = "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN_SECS: i64 = 60;

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// The fields of a service account key file that token exchange needs
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// Parse a service account key JSON document
    pub fn from_json(json: &str) -> SheetsResult<Self> {
        serde_json::from_str(json).map_err(|e| SheetsError::InvalidCredentials(e.to_string()))
    }

    /// Load the key from inline JSON, falling back to the configured file
    pub async fn from_config(config: &SheetsConfig) -> Result<Self> {
        if let Some(json) = config.credentials_json.as_deref().filter(|s| !s.trim().is_empty()) {
            return Ok(Self::from_json(json)?);
        }

        let path = config.credentials_path.as_deref().filter(|s| !s.trim().is_empty())
            .ok_or_else(|| LedgerBuddyError::Config("No Google credentials configured".to_string()))?;
        let json = tokio::fs::read_to_string(path).await?;
        Ok(Self::from_json(&json)?)
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// Access token provider for a service account
pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    http_client: reqwest::Client,
    token: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    /// Create a provider; fails if the private key is not a valid RSA PEM
    pub fn new(key: ServiceAccountKey, http_client: reqwest::Client) -> SheetsResult<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| SheetsError::InvalidCredentials(format!("private_key: {}", e)))?;

        Ok(Self {
            key,
            encoding_key,
            http_client,
            token: Mutex::new(None),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Current access token, fetching a new one when the cached one is stale
    pub async fn access_token(&self) -> SheetsResult<String> {
        let mut token = self.token.lock().await;
        let now = Utc::now();

        if let Some(cached) = token.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(cached.value.clone());
        }

        let fresh = self.fetch_token(now).await?;
        let value = fresh.value.clone();
        *token = Some(fresh);
        Ok(value)
    }

    /// Forget the cached token, e.g. after the API answered 401
    pub async fn invalidate(&self) {
        self.token.lock().await.take();
    }

    async fn fetch_token(&self, now: DateTime<Utc>) -> SheetsResult<CachedToken> {
        debug!(client_email = %self.key.client_email, token_uri = %self.key.token_uri, "Requesting access token");

        let assertion = self.assertion(now)?;
        let response = self.http_client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::AuthenticationFailed(format!("token endpoint returned {}: {}", status.as_u16(), body)));
        }

        let token: TokenResponse = response.json().await
            .map_err(|e| SheetsError::InvalidResponse(format!("token response: {}", e)))?;
        let lifetime = token.expires_in.unwrap_or(TOKEN_LIFETIME_SECS);

        info!(client_email = %self.key.client_email, expires_in = lifetime, "Obtained Google access token");
        Ok(CachedToken {
            value: token.access_token,
            expires_at: now + Duration::seconds(lifetime),
        })
    }

    fn assertion(&self, now: DateTime<Utc>) -> SheetsResult<String> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        let claims = Claims {
            iss: &self.key.client_email,
            scope: SCOPES,
            aud: &self.key.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + TOKEN_LIFETIME_SECS,
        };

        Ok(jsonwebtoken::encode(&header, &claims, &self.encoding_key)?)
    }
}

impl std::fmt::Debug for ServiceAccountAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountAuth")
            .field("client_email", &self.key.client_email)
            .field("token_uri", &self.key.token_uri)
            .finish_non_exhaustive()
    }
}
