use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// OAuth 2.0 token as persisted in the credential cache.
///
/// `expiry` is an absolute RFC 3339 timestamp computed from the token
/// endpoint's relative `expires_in` at exchange time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Access token for API requests
    pub access_token: String,
    /// Refresh token, when the provider granted one
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token type (usually "Bearer")
    pub token_type: String,
    /// Absolute expiry time of the access token
    pub expiry: DateTime<Utc>,
    /// Scope(s) the provider actually granted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl Token {
    /// Build a token from a token-endpoint response body.
    ///
    /// `access_token` and `expires_in` are required; everything else is
    /// optional, with `token_type` defaulting to "Bearer".
    pub fn from_response(response: &serde_json::Value) -> Result<Self, AuthError> {
        let access_token = response
            .get("access_token")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                AuthError::TokenResponse("missing access_token in token response".to_string())
            })?
            .to_string();

        let refresh_token = response
            .get("refresh_token")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let expires_in = response
            .get("expires_in")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| {
                AuthError::TokenResponse("missing expires_in in token response".to_string())
            })?;

        let scope = response
            .get("scope")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        Ok(Token {
            access_token,
            refresh_token,
            token_type: response
                .get("token_type")
                .and_then(|v| v.as_str())
                .unwrap_or("Bearer")
                .to_string(),
            expiry: Utc::now() + Duration::seconds(expires_in as i64),
            scope,
        })
    }
}
