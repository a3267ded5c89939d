use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::callback::CallbackServer;
use crate::error::AuthError;

/// Strategy for obtaining a one-time authorization code from the user.
///
/// The strategy is picked once by configuration, not negotiated at runtime.
/// The redirect URI it announces is embedded in the authorization URL and
/// repeated verbatim in the code exchange.
#[async_trait]
pub trait CodeAcquirer {
    /// Redirect target for this strategy.
    fn redirect_uri(&self) -> String;

    /// Obtain an authorization code. Blocks until the user completes (or
    /// abandons) the consent flow.
    async fn acquire(&self, auth_url: &str) -> Result<String, AuthError>;
}

/// Console flow: print the authorization URL, then read the code the user
/// pastes back after finishing consent in a browser.
pub struct PromptAcquirer;

#[async_trait]
impl CodeAcquirer for PromptAcquirer {
    fn redirect_uri(&self) -> String {
        // Out-of-band flow: the provider displays the code for the user to
        // copy instead of redirecting anywhere.
        "urn:ietf:wg:oauth:2.0:oob".to_string()
    }

    async fn acquire(&self, auth_url: &str) -> Result<String, AuthError> {
        eprintln!(
            "\nGo to the following link in your browser. After completing the \
            authorization flow, enter the authorization code on the command line:\n"
        );
        eprintln!("{auth_url}\n");

        let mut line = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .map_err(AuthError::Prompt)?;

        // Whatever was pasted goes to the exchange as-is; a malformed or
        // empty code surfaces as the exchange error.
        Ok(line.trim().to_string())
    }
}

/// Browser flow: serve the redirect on a loopback listener and capture the
/// code from the provider's callback request.
pub struct CallbackAcquirer {
    port: u16,
}

impl CallbackAcquirer {
    /// Acquirer listening on the given pre-registered loopback port.
    pub fn new(port: u16) -> Self {
        Self { port }
    }
}

#[async_trait]
impl CodeAcquirer for CallbackAcquirer {
    fn redirect_uri(&self) -> String {
        format!("http://localhost:{}", self.port)
    }

    async fn acquire(&self, auth_url: &str) -> Result<String, AuthError> {
        let server = CallbackServer::bind(self.port).await?;

        eprintln!("\n=================================================");
        eprintln!("OAuth 2.0 Authorization Required");
        eprintln!("=================================================");
        eprintln!("\nPlease authorize the application in your browser:\n");
        eprintln!("{auth_url}\n");
        eprintln!("Waiting for authorization...");
        eprintln!("=================================================\n");

        // Best effort: the URL above covers the case where no browser opens.
        match open::that(auth_url) {
            Ok(()) => eprintln!("Your browser has been opened to the authorization URL."),
            Err(err) => {
                tracing::warn!(%err, "could not launch a browser; open the URL above manually");
            }
        }

        server.wait_for_code().await
    }
}
