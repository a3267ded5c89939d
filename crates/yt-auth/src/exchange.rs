use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::token::Token;

/// Trade an authorization code for a token.
///
/// One synchronous round trip against the configured token endpoint, no
/// retry: authorization codes are single-use, so on failure the caller
/// restarts the whole authorization flow instead of re-posting the code.
pub async fn exchange_code(
    http: &reqwest::Client,
    config: &AuthConfig,
    redirect_uri: &str,
    code: &str,
    pkce_verifier: &str,
) -> Result<Token, AuthError> {
    tracing::debug!("exchanging authorization code for tokens");

    let params = [
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("code", code),
        ("code_verifier", pkce_verifier),
        ("grant_type", "authorization_code"),
        ("redirect_uri", redirect_uri),
    ];

    let response = http.post(&config.token_uri).form(&params).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AuthError::Exchange { status, body });
    }

    let body: serde_json::Value = response.json().await?;
    Token::from_response(&body)
}
