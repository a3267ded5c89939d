use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use yt_auth::{AuthConfig, AuthError, Authenticator, CodeAcquirer, CredentialStore, Token};

/// Acquirer double that hands out a fixed code and counts invocations.
struct FixedCodeAcquirer {
    code: String,
    calls: AtomicUsize,
}

impl FixedCodeAcquirer {
    fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CodeAcquirer for FixedCodeAcquirer {
    fn redirect_uri(&self) -> String {
        "urn:ietf:wg:oauth:2.0:oob".to_string()
    }

    async fn acquire(&self, _auth_url: &str) -> Result<String, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.code.clone())
    }
}

fn config_for(server_uri: &str) -> AuthConfig {
    AuthConfig {
        client_id: "test-client".to_string(),
        client_secret: "test-secret".to_string(),
        auth_uri: format!("{server_uri}/auth"),
        token_uri: format!("{server_uri}/token"),
        scope: "https://www.googleapis.com/auth/youtube.upload".to_string(),
    }
}

fn cached_token() -> Token {
    Token {
        access_token: "cached-access".to_string(),
        refresh_token: Some("cached-refresh".to_string()),
        token_type: "Bearer".to_string(),
        expiry: "2030-01-01T00:00:00Z".parse().expect("valid timestamp"),
        scope: None,
    }
}

fn token_endpoint_success() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "access_token": "fresh-access",
        "refresh_token": "fresh-refresh",
        "token_type": "Bearer",
        "expires_in": 3599
    }))
}

#[tokio::test]
async fn cache_hit_skips_acquisition_and_exchange() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(token_endpoint_success())
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("tempdir");
    let store = CredentialStore::at(dir.path().join("app.json"));
    store.save(&cached_token()).expect("seed cache");

    let authenticator = Authenticator::new(config_for(&server.uri()), store);
    let acquirer = FixedCodeAcquirer::new("never-used");
    let client = authenticator
        .authorize(&acquirer)
        .await
        .expect("cache hit authorizes without network");

    assert_eq!(client.token().access_token, "cached-access");
    assert_eq!(acquirer.calls(), 0);
}

#[tokio::test]
async fn cache_miss_acquires_exchanges_and_saves_exactly_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("code=abc123"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("client_id=test-client"))
        .respond_with(token_endpoint_success())
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("tempdir");
    let cache_path = dir.path().join("app.json");
    let store = CredentialStore::at(&cache_path);

    let authenticator = Authenticator::new(config_for(&server.uri()), store);
    let acquirer = FixedCodeAcquirer::new("abc123");
    let client = authenticator
        .authorize(&acquirer)
        .await
        .expect("cache miss authorizes via exchange");

    assert_eq!(acquirer.calls(), 1);
    assert_eq!(client.token().access_token, "fresh-access");

    // Exactly one save: the cache now holds the freshly exchanged token.
    let cached: Token = serde_json::from_str(
        &std::fs::read_to_string(&cache_path).expect("cache file written"),
    )
    .expect("cache file is a well-formed token");
    assert_eq!(cached, *client.token());
}

#[tokio::test]
async fn corrupt_cache_behaves_like_a_miss() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("code=abc123"))
        .respond_with(token_endpoint_success())
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("tempdir");
    let cache_path = dir.path().join("app.json");
    std::fs::write(&cache_path, "{ not a token").expect("seed corrupt cache");

    let authenticator = Authenticator::new(config_for(&server.uri()), CredentialStore::at(&cache_path));
    let acquirer = FixedCodeAcquirer::new("abc123");
    let client = authenticator
        .authorize(&acquirer)
        .await
        .expect("corrupt cache re-authorizes");

    assert_eq!(acquirer.calls(), 1);
    assert_eq!(client.token().access_token, "fresh-access");

    // The corrupt content was fully replaced.
    let cached: Token = serde_json::from_str(
        &std::fs::read_to_string(&cache_path).expect("cache file rewritten"),
    )
    .expect("cache file is well-formed again");
    assert_eq!(cached.access_token, "fresh-access");
}

#[tokio::test]
async fn rejected_exchange_is_fatal_and_nothing_is_cached() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("tempdir");
    let cache_path = dir.path().join("app.json");

    let authenticator = Authenticator::new(config_for(&server.uri()), CredentialStore::at(&cache_path));
    let acquirer = FixedCodeAcquirer::new("expired-code");
    let err = authenticator
        .authorize(&acquirer)
        .await
        .expect_err("rejected code must fail the run");

    match err {
        AuthError::Exchange { status, body } => {
            assert_eq!(status.as_u16(), 400);
            assert!(body.contains("invalid_grant"));
        }
        other => panic!("expected an exchange error, got: {other}"),
    }
    assert!(!cache_path.exists());
}

#[cfg(unix)]
#[tokio::test]
async fn failed_save_still_returns_a_usable_client() {
    use std::os::unix::fs::PermissionsExt;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(token_endpoint_success())
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("tempdir");
    std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o500))
        .expect("make cache dir read-only");

    let cache_path = dir.path().join("app.json");
    let authenticator = Authenticator::new(config_for(&server.uri()), CredentialStore::at(&cache_path));
    let acquirer = FixedCodeAcquirer::new("abc123");
    let client = authenticator
        .authorize(&acquirer)
        .await
        .expect("save failure must not abort authorization");

    // The in-memory token backs the client even though nothing was persisted.
    assert_eq!(client.token().access_token, "fresh-access");
    assert!(!cache_path.exists());

    // Restore permissions so the tempdir can be cleaned up.
    std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o700))
        .expect("restore permissions");
}
