//! Authorization Code Flow implementation.

use std::time::Duration;

use super::pkce::random_urlsafe;
use super::{LoopbackReceiver, OAuthClient, PkceChallenge};
use crate::error::{Error, Result};
use crate::token::Token;
use tracing::info;
use url::Url;

/// Authorization Code Flow for `OAuth2`.
///
/// Suitable for desktop applications that can open a browser and receive
/// the authorization code on a loopback redirect.
#[derive(Debug)]
pub struct AuthorizationCodeFlow {
    client: OAuthClient,
    pkce: Option<PkceChallenge>,
    state: String,
}

impl AuthorizationCodeFlow {
    /// Creates a new authorization code flow with a random `state`.
    #[must_use]
    pub fn new(client: OAuthClient) -> Self {
        Self {
            client,
            pkce: None,
            state: random_urlsafe(16),
        }
    }

    /// Enables PKCE for enhanced security (recommended for public clients).
    #[must_use]
    pub fn with_pkce(mut self) -> Self {
        self.pkce = Some(PkceChallenge::generate());
        self
    }

    /// Anti-forgery value the redirect must echo back.
    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Builds the authorization URL for user consent.
    ///
    /// Uses the provider's default scopes when `scopes` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if no scope is available.
    pub fn authorization_url(&self, scopes: Option<&[String]>) -> Result<Url> {
        let scope_str = scopes.map_or_else(
            || self.client.provider.default_scopes.join(" "),
            |s| s.join(" "),
        );
        if scope_str.is_empty() {
            return Err(Error::InvalidConfig("no scopes to request".into()));
        }

        let mut url = self.client.provider.auth_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("client_id", &self.client.client_id)
                .append_pair("response_type", "code")
                .append_pair("scope", &scope_str)
                .append_pair("state", &self.state);

            if let Some(redirect_uri) = &self.client.redirect_uri {
                pairs.append_pair("redirect_uri", redirect_uri);
            }

            if let Some(pkce) = &self.pkce {
                pairs
                    .append_pair("code_challenge", pkce.challenge())
                    .append_pair("code_challenge_method", pkce.method());
            }

            if self.client.provider.is_google() {
                pairs
                    .append_pair("access_type", "offline")
                    .append_pair("prompt", "consent");
            }
        }

        Ok(url)
    }

    /// Exchanges the authorization code for an access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token exchange fails.
    pub async fn exchange_code(&self, code: &str) -> Result<Token> {
        let code_verifier = self.pkce.as_ref().map(PkceChallenge::verifier);
        self.client.exchange_code(code, None, code_verifier).await
    }

    /// Runs the whole browser round trip.
    ///
    /// Binds a loopback receiver, points the redirect URI at it, hands the
    /// consent URL to `open_browser`, waits up to `timeout` for the redirect
    /// and exchanges the code.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound, the user denies
    /// consent, the redirect is forged or late, or the exchange fails.
    pub async fn run_local_server<F>(
        client: OAuthClient,
        open_browser: F,
        timeout: Duration,
    ) -> Result<Token>
    where
        F: FnOnce(&Url),
    {
        let receiver = LoopbackReceiver::bind().await?;
        let client = client.with_redirect_uri(receiver.redirect_uri());
        let flow = Self::new(client).with_pkce();

        let url = flow.authorization_url(None)?;
        info!(redirect = %receiver.redirect_uri(), "waiting for OAuth consent in browser");
        open_browser(&url);

        let redirect = receiver.wait(timeout).await?;
        let code = redirect.into_code(flow.state())?;
        flow.exchange_code(&code).await
    }

    /// Returns the PKCE verifier if PKCE is enabled.
    #[must_use]
    pub fn pkce_verifier(&self) -> Option<&str> {
        self.pkce.as_ref().map(PkceChallenge::verifier)
    }
}
