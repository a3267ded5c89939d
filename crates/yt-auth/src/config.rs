use std::path::Path;

use serde::Deserialize;

use crate::error::AuthError;

/// Client secrets in the Google Cloud Console download format.
///
/// The console wraps the fields in an `"installed"` or `"web"` object
/// depending on the credential type; a bare object is accepted as well.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Authorization endpoint URL
    pub auth_uri: String,
    /// Token endpoint URL
    pub token_uri: String,
    /// Registered redirect URIs (at least one)
    pub redirect_uris: Vec<String>,
}

impl ClientSecrets {
    /// Load client secrets from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, AuthError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AuthError::Config(format!(
                "failed to read client secrets file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content).map_err(|e| {
            AuthError::Config(format!(
                "failed to parse client secrets file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Parse client secrets from a JSON document, unwrapping the
    /// `"installed"`/`"web"` layer when present.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        let inner = value
            .get("installed")
            .or_else(|| value.get("web"))
            .unwrap_or(&value);
        let secrets: ClientSecrets = serde_json::from_value(inner.clone())?;
        Ok(secrets)
    }

    /// Assemble client secrets from `YOUTUBE_CLIENT_ID` and
    /// `YOUTUBE_CLIENT_SECRET` environment variables, filling in the standard
    /// Google endpoints.
    pub fn from_env() -> Result<Self, AuthError> {
        let client_id = std::env::var("YOUTUBE_CLIENT_ID")
            .map_err(|_| AuthError::Config("YOUTUBE_CLIENT_ID is not set".to_string()))?;
        let client_secret = std::env::var("YOUTUBE_CLIENT_SECRET")
            .map_err(|_| AuthError::Config("YOUTUBE_CLIENT_SECRET is not set".to_string()))?;
        Ok(Self {
            client_id,
            client_secret,
            auth_uri: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_uri: "https://oauth2.googleapis.com/token".to_string(),
            redirect_uris: vec!["http://localhost".to_string()],
        })
    }

    /// Bind the secrets to a requested scope, producing the immutable
    /// configuration the authorization flow runs against.
    pub fn into_config(self, scope: impl Into<String>) -> AuthConfig {
        AuthConfig {
            client_id: self.client_id,
            client_secret: self.client_secret,
            auth_uri: self.auth_uri,
            token_uri: self.token_uri,
            scope: scope.into(),
        }
    }
}

/// OAuth configuration for one authorization flow.
///
/// Immutable once constructed. The redirect target is not part of this
/// struct: it depends on the configured acquisition strategy and travels
/// with the acquirer instead.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Authorization endpoint URL
    pub auth_uri: String,
    /// Token endpoint URL
    pub token_uri: String,
    /// Requested OAuth scope(s), space-separated
    pub scope: String,
}
