//! Session provider: turns the client secrets and the credential cache into
//! an authenticated mailbox.
//!
//! Order of preference on every [`SessionProvider::authenticate`] call:
//! 1. a cached token that is still valid,
//! 2. a refreshed token if the cached one has a refresh token,
//! 3. a fresh browser consent round trip.
//!
//! Whatever token results is written back to the cache.

use std::path::PathBuf;
use std::time::Duration;

use inboxsweep_oauth::{AuthorizationCodeFlow, ClientSecrets, OAuthClient, Token};
use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::AppConfig;
use crate::credentials::{RevokeOutcome, TokenStore};
use crate::error::{Error, Result};
use crate::mailbox::GmailClient;

/// How long to wait for the user to finish the browser consent.
pub const CONSENT_TIMEOUT: Duration = Duration::from_secs(300);

/// An authenticated Gmail session.
#[derive(Debug, Clone)]
pub struct Session {
    token: Token,
    mailbox: GmailClient,
}

impl Session {
    /// Wraps a token in a Gmail client.
    ///
    /// # Errors
    ///
    /// Returns an error if the Gmail client cannot be built.
    pub fn new(http: Client, token: Token) -> Result<Self> {
        let mailbox = GmailClient::new(http, &token)?;
        Ok(Self { token, mailbox })
    }

    /// The mailbox capabilities of this session.
    #[must_use]
    pub const fn mailbox(&self) -> &GmailClient {
        &self.mailbox
    }

    /// The access token in use.
    #[must_use]
    pub const fn token(&self) -> &Token {
        &self.token
    }

    /// Consumes the session, keeping only the mailbox.
    #[must_use]
    pub fn into_mailbox(self) -> GmailClient {
        self.mailbox
    }
}

/// Produces [`Session`]s from the client secrets and the token cache.
#[derive(Debug, Clone)]
pub struct SessionProvider {
    credentials_file: PathBuf,
    store: TokenStore,
    http: Client,
    consent_timeout: Duration,
}

impl SessionProvider {
    /// Creates a provider for the configured secrets and cache.
    #[must_use]
    pub fn new(config: &AppConfig, http: Client) -> Self {
        Self {
            credentials_file: config.credentials_file.clone(),
            store: config.token_store.clone(),
            http,
            consent_timeout: CONSENT_TIMEOUT,
        }
    }

    /// Overrides the consent timeout.
    #[must_use]
    pub const fn with_consent_timeout(mut self, timeout: Duration) -> Self {
        self.consent_timeout = timeout;
        self
    }

    /// The credential cache in use.
    #[must_use]
    pub const fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Returns an authenticated session, refreshing or asking for consent as
    /// needed. `open_browser` receives the consent URL when consent is needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the client secrets are missing or invalid, the
    /// refresh fails for a reason other than a revoked grant, or the consent
    /// flow fails.
    pub async fn authenticate<F>(&self, open_browser: F) -> Result<Session>
    where
        F: FnOnce(&Url) + Send,
    {
        let cached = self.store.load().unwrap_or_else(|e| {
            warn!("Ignoring unreadable token cache: {e}");
            None
        });

        let token = match cached {
            Some(token) if token.is_valid() => {
                debug!("Using cached OAuth2 token");
                token
            }
            Some(token) if token.can_refresh() => {
                let client = self.oauth_client().await?;
                match client.refresh_token(&token).await {
                    Ok(refreshed) => {
                        info!("Refreshed OAuth2 token");
                        self.persist(&refreshed);
                        refreshed
                    }
                    Err(e) if e.requires_consent() => {
                        info!("Stored grant no longer valid ({e}), asking for consent");
                        self.consent(client, open_browser).await?
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            _ => {
                let client = self.oauth_client().await?;
                self.consent(client, open_browser).await?
            }
        };

        Session::new(self.http.clone(), token)
    }

    /// Deletes the cached token.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache exists but cannot be removed.
    pub fn revoke(&self) -> Result<RevokeOutcome> {
        let outcome = self.store.delete()?;
        info!(?outcome, "Revoked stored session");
        Ok(outcome)
    }

    async fn oauth_client(&self) -> Result<OAuthClient> {
        if !self.credentials_file.is_file() {
            return Err(Error::Config(format!(
                "OAuth client file not found: {}",
                self.credentials_file.display()
            )));
        }
        let secrets = ClientSecrets::from_file(&self.credentials_file).await?;
        Ok(secrets.oauth_client()?.with_http_client(self.http.clone()))
    }

    async fn consent<F>(&self, client: OAuthClient, open_browser: F) -> Result<Token>
    where
        F: FnOnce(&Url) + Send,
    {
        let token =
            AuthorizationCodeFlow::run_local_server(client, open_browser, self.consent_timeout)
                .await?;
        info!("Obtained OAuth2 token through browser consent");
        self.persist(&token);
        Ok(token)
    }

    fn persist(&self, token: &Token) {
        if let Err(e) = self.store.save(token) {
            warn!("Could not cache OAuth2 token: {e}");
        }
    }
}
