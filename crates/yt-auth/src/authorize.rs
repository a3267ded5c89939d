use crate::acquire::CodeAcquirer;
use crate::client::AuthedClient;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::exchange::exchange_code;
use crate::pkce::PkceChallenge;
use crate::store::CredentialStore;

/// Build the provider authorization URL for one attempt.
pub fn build_authorization_url(
    config: &AuthConfig,
    redirect_uri: &str,
    pkce_challenge: &str,
) -> String {
    format!(
        "{}?\
        client_id={}&\
        redirect_uri={}&\
        response_type=code&\
        scope={}&\
        code_challenge={}&\
        code_challenge_method=S256&\
        access_type=offline&\
        prompt=consent",
        config.auth_uri,
        urlencoding::encode(&config.client_id),
        urlencoding::encode(redirect_uri),
        urlencoding::encode(&config.scope),
        urlencoding::encode(pkce_challenge),
    )
}

/// Ties the credential store, code acquisition, and token exchange together
/// into the full authorization flow.
pub struct Authenticator {
    config: AuthConfig,
    store: CredentialStore,
    http: reqwest::Client,
}

impl Authenticator {
    pub fn new(config: AuthConfig, store: CredentialStore) -> Self {
        Self {
            config,
            store,
            http: reqwest::Client::new(),
        }
    }

    /// Run the authorization flow and return a client ready to call the API.
    ///
    /// A cached token is used as-is, with no local expiry check: an expired
    /// credential is only discovered when the first API call fails, at which
    /// point deleting the cache file and re-running restores access. On a
    /// cache miss the configured acquirer runs exactly once, the code is
    /// exchanged exactly once, and the result is persisted best-effort: a
    /// failed save degrades to a warning and the in-memory token still backs
    /// the returned client for this run.
    pub async fn authorize(&self, acquirer: &dyn CodeAcquirer) -> Result<AuthedClient, AuthError> {
        if let Some(token) = self.store.load() {
            tracing::debug!(path = %self.store.path().display(), "using cached credentials");
            return Ok(AuthedClient::new(self.http.clone(), token));
        }

        let pkce = PkceChallenge::generate();
        let redirect_uri = acquirer.redirect_uri();
        let auth_url = build_authorization_url(&self.config, &redirect_uri, &pkce.challenge);

        let code = acquirer.acquire(&auth_url).await?;
        let token = exchange_code(
            &self.http,
            &self.config,
            &redirect_uri,
            &code,
            &pkce.verifier,
        )
        .await?;

        if let Err(err) = self.store.save(&token) {
            tracing::warn!(
                %err,
                "could not cache credentials; re-authorization will be required on the next run"
            );
        }

        Ok(AuthedClient::new(self.http.clone(), token))
    }
}
