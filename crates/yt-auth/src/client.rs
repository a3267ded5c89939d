use reqwest::Method;

use crate::token::Token;

/// HTTP client bound to an access token.
///
/// The sole artifact the authorization flow hands to API callers: every
/// request it starts carries the bearer token. It knows nothing about any
/// particular endpoint.
#[derive(Debug, Clone)]
pub struct AuthedClient {
    http: reqwest::Client,
    token: Token,
}

impl AuthedClient {
    pub fn new(http: reqwest::Client, token: Token) -> Self {
        Self { http, token }
    }

    /// The token backing this client.
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Start a request with the bearer token attached.
    pub fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(&self.token.access_token)
    }
}
