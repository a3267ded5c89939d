//! OAuth 2.0 authorization for the YouTube Data API.
//!
//! The flow: try the credential cache under `~/.credentials/`; on a miss,
//! obtain a one-time authorization code from the user (pasted at a console
//! prompt, or captured by a single-use loopback callback listener), exchange
//! it at the token endpoint, persist the result, and hand back an
//! [`AuthedClient`] that attaches the bearer token to every request.

pub mod acquire;
pub mod authorize;
pub mod callback;
pub mod client;
pub mod config;
pub mod error;
pub mod exchange;
pub mod pkce;
pub mod store;
pub mod token;

pub use acquire::{CallbackAcquirer, CodeAcquirer, PromptAcquirer};
pub use authorize::{Authenticator, build_authorization_url};
pub use callback::CallbackServer;
pub use client::AuthedClient;
pub use config::{AuthConfig, ClientSecrets};
pub use error::AuthError;
pub use exchange::exchange_code;
pub use pkce::PkceChallenge;
pub use store::CredentialStore;
pub use token::Token;
