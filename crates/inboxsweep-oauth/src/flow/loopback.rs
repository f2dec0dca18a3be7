//! Loopback redirect receiver for installed-app consent.
//!
//! The authorization server redirects the browser to
//! `http://127.0.0.1:<port>/?code=...&state=...`; a listener bound on an
//! ephemeral port picks it up and answers with a small HTML page.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, Result};

/// Upper bound on the request head we are willing to buffer.
const MAX_REQUEST_HEAD: usize = 16 * 1024;

/// How long one connection may take to send its request head. Browser
/// preconnect sockets that stay silent are dropped after this.
const REQUEST_READ_TIMEOUT: Duration = Duration::from_secs(3);

const SUCCESS_PAGE: &str = "<html><body><h2>Authentication complete.</h2>\
    <p>You may close this window and return to InboxSweep.</p></body></html>";

const FAILURE_PAGE: &str = "<html><body><h2>Authentication failed.</h2>\
    <p>Return to InboxSweep for details.</p></body></html>";

/// Query parameters carried by the authorization redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Redirect {
    /// Authorization code.
    pub code: Option<String>,
    /// Echoed `state`.
    pub state: Option<String>,
    /// Error code (e.g. `access_denied`).
    pub error: Option<String>,
}

impl Redirect {
    /// Parses the request target of the redirect (e.g. `/?code=x&state=y`).
    ///
    /// # Errors
    ///
    /// Returns an error if the target is not a valid path and query.
    pub fn from_request_target(target: &str) -> Result<Self> {
        if !target.starts_with('/') {
            return Err(Error::InvalidRedirect(format!("unexpected target {target}")));
        }
        let url = Url::parse(&format!("http://127.0.0.1{target}"))?;

        let mut redirect = Self::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" => redirect.code = Some(value.into_owned()),
                "state" => redirect.state = Some(value.into_owned()),
                "error" => redirect.error = Some(value.into_owned()),
                _ => {}
            }
        }
        Ok(redirect)
    }

    /// True if this request is the authorization response rather than a
    /// stray browser request such as `/favicon.ico`.
    #[must_use]
    pub const fn is_authorization_response(&self) -> bool {
        self.code.is_some() || self.error.is_some()
    }

    /// Validates `state` and extracts the code.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` if the user declined, `StateMismatch` if the
    /// redirect was not produced by our request, and `InvalidRedirect` if
    /// the code is missing.
    pub fn into_code(self, expected_state: &str) -> Result<String> {
        match self.error.as_deref() {
            Some("access_denied") => return Err(Error::AccessDenied),
            Some(other) => return Err(Error::oauth_error(other, "authorization redirect")),
            None => {}
        }
        if self.state.as_deref() != Some(expected_state) {
            return Err(Error::StateMismatch);
        }
        self.code
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::InvalidRedirect("missing code".into()))
    }
}

/// Listener waiting for the authorization redirect.
#[derive(Debug)]
pub struct LoopbackReceiver {
    listener: TcpListener,
    port: u16,
    read_timeout: Duration,
}

impl LoopbackReceiver {
    /// Binds an ephemeral port on the IPv4 loopback interface.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket cannot be bound.
    pub async fn bind() -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let port = listener.local_addr()?.port();
        debug!(port, "loopback receiver bound");
        Ok(Self {
            listener,
            port,
            read_timeout: REQUEST_READ_TIMEOUT,
        })
    }

    /// Overrides how long a single connection may stay silent.
    #[must_use]
    pub const fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Redirect URI to register with the authorization request.
    #[must_use]
    pub fn redirect_uri(&self) -> String {
        format!("http://127.0.0.1:{}/", self.port)
    }

    /// Waits for the authorization redirect, ignoring unrelated requests.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if nothing arrives in time, or an I/O error.
    pub async fn wait(self, timeout: Duration) -> Result<Redirect> {
        tokio::time::timeout(timeout, self.accept_redirect())
            .await
            .map_err(|_| Error::Timeout(timeout.as_secs()))?
    }

    async fn accept_redirect(self) -> Result<Redirect> {
        loop {
            let (mut stream, peer) = self.listener.accept().await?;
            let head = tokio::time::timeout(self.read_timeout, read_request_target(&mut stream));
            let target = match head.await {
                Ok(Ok(target)) => target,
                Ok(Err(e)) => {
                    warn!(%peer, "discarding malformed loopback request: {e}");
                    continue;
                }
                Err(_) => {
                    debug!(%peer, "dropping idle loopback connection");
                    continue;
                }
            };

            let redirect = match Redirect::from_request_target(&target) {
                Ok(r) if r.is_authorization_response() => r,
                _ => {
                    respond(&mut stream, "404 Not Found", "").await;
                    continue;
                }
            };

            let page = if redirect.code.is_some() {
                SUCCESS_PAGE
            } else {
                FAILURE_PAGE
            };
            respond(&mut stream, "200 OK", page).await;
            return Ok(redirect);
        }
    }
}

/// Reads the request head and returns the request target of a `GET`.
async fn read_request_target(stream: &mut TcpStream) -> Result<String> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];

    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.len() > MAX_REQUEST_HEAD {
            return Err(Error::InvalidRedirect("request head too large".into()));
        }
    }

    let head = String::from_utf8_lossy(&buf);
    parse_request_line(head.lines().next().unwrap_or_default())
}

fn parse_request_line(line: &str) -> Result<String> {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("GET"), Some(target)) => Ok(target.to_string()),
        _ => Err(Error::InvalidRedirect(format!("unexpected request line {line:?}"))),
    }
}

async fn respond(stream: &mut TcpStream, status: &str, body: &str) {
    let reply = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    if let Err(e) = stream.write_all(reply.as_bytes()).await {
        debug!("failed to answer browser: {e}");
    }
    if let Err(e) = stream.shutdown().await {
        debug!("failed to close browser connection: {e}");
    }
}
