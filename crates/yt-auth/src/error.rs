use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while obtaining or persisting credentials.
///
/// A missing or corrupt credential cache is deliberately not represented
/// here: both are a cache miss and trigger re-authorization instead of
/// failing the run.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Client secrets could not be loaded or the environment is unusable.
    /// Fatal at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// The callback listener could not bind its pre-registered port. Fatal;
    /// there is no automatic fallback to the prompt flow.
    #[error("failed to bind OAuth callback listener on {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Stdin could not be read while waiting for a pasted authorization code.
    #[error("failed to read authorization code from stdin")]
    Prompt(#[source] std::io::Error),

    /// The callback listener was torn down before a code arrived.
    #[error("callback listener closed before an authorization code arrived")]
    CallbackClosed,

    /// The token endpoint could not be reached.
    #[error("token endpoint request failed")]
    Transport(#[from] reqwest::Error),

    /// The token endpoint answered with a non-success status. Authorization
    /// codes are single-use, so the whole flow must be re-run.
    #[error("token endpoint rejected the authorization code (status {status}): {body}")]
    Exchange {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The token endpoint answered with a success status but an unusable body.
    #[error("token endpoint returned an unusable response: {0}")]
    TokenResponse(String),

    /// Persisting a freshly obtained token failed. The orchestrator degrades
    /// this to a warning and keeps the in-memory token for the current run.
    #[error("failed to persist credentials to {}", path.display())]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
