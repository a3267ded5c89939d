use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, extract::Query, routing::get};
use serde::Deserialize;
use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;

use crate::error::AuthError;

/// Query parameters the provider appends to the redirect.
#[derive(Deserialize)]
struct AuthCallback {
    code: Option<String>,
    error: Option<String>,
}

/// Single-use loopback listener for the OAuth redirect.
///
/// Serves `GET /?code=...` on a loopback port and hands the first code it
/// receives to the waiting caller over a oneshot channel, then shuts the
/// listener down. Two states only: listening, then delivered. Later requests
/// find the channel already consumed and cannot overwrite the code.
#[derive(Debug)]
pub struct CallbackServer {
    addr: SocketAddr,
    code_rx: oneshot::Receiver<String>,
    shutdown: Arc<Mutex<Option<oneshot::Sender<()>>>>,
    task: JoinHandle<()>,
}

impl CallbackServer {
    /// Bind the listener on `127.0.0.1:<port>`.
    ///
    /// A bind failure (typically the port already being in use) is fatal for
    /// the callback flow; there is no fallback to the prompt flow. Port 0
    /// binds an ephemeral port, which tests use for deterministic teardown.
    pub async fn bind(port: u16) -> Result<Self, AuthError> {
        let requested = format!("127.0.0.1:{port}");
        let listener = tokio::net::TcpListener::bind(&requested)
            .await
            .map_err(|source| AuthError::Bind {
                addr: requested.clone(),
                source,
            })?;
        let addr = listener
            .local_addr()
            .map_err(|source| AuthError::Bind {
                addr: requested,
                source,
            })?;

        let (code_tx, code_rx) = oneshot::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let shutdown_slot = Arc::new(Mutex::new(Some(shutdown_tx)));

        let handler_code = Arc::new(Mutex::new(Some(code_tx)));
        let handler_shutdown = shutdown_slot.clone();
        let handler = move |Query(params): Query<AuthCallback>| async move {
            if let Some(error) = params.error {
                return format!(
                    "Authorization failed: {error}\r\n\
                    You can close this window and retry in the application."
                );
            }

            let Some(code) = params.code else {
                return "No authorization code received. \
                    Complete the consent flow in your browser."
                    .to_string();
            };

            // First code wins; the sender is gone for every later request.
            match handler_code.lock().await.take() {
                Some(tx) => {
                    // send() never blocks, so an abandoned receiver cannot
                    // wedge this handler.
                    let _ = tx.send(code.clone());
                    if let Some(stop) = handler_shutdown.lock().await.take() {
                        let _ = stop.send(());
                    }
                    format!(
                        "Received code: {code}\r\n\
                        You can now safely close this browser window."
                    )
                }
                None => "Authorization already completed. \
                    You can close this window."
                    .to_string(),
            }
        };

        let app = Router::new().route("/", get(handler));
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            shutdown_rx.await.ok();
        });
        let task = tokio::spawn(async move {
            if let Err(err) = server.await {
                tracing::warn!(%err, "OAuth callback server exited with an error");
            }
        });

        Ok(Self {
            addr,
            code_rx,
            shutdown: shutdown_slot,
            task,
        })
    }

    /// Address the listener actually bound.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Redirect URI pointing at this listener.
    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}", self.addr.port())
    }

    /// Block until the first authorization code arrives, then tear the
    /// listener down. No timeout: the flow waits as long as the user takes.
    pub async fn wait_for_code(self) -> Result<String, AuthError> {
        let code = self.code_rx.await.map_err(|_| AuthError::CallbackClosed)?;
        // The handler already triggered shutdown; wait for the listener to
        // finish closing so no further connection can be accepted.
        let _ = self.task.await;
        Ok(code)
    }

    /// Stop listening without delivering a code.
    pub async fn shutdown(self) {
        if let Some(stop) = self.shutdown.lock().await.take() {
            let _ = stop.send(());
        }
        let _ = self.task.await;
    }
}
