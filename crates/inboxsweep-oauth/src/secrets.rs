//! Google client-secrets file (`credentials.json`) parsing.
//!
//! The file downloaded from the Cloud console wraps the client under an
//! `installed` key for desktop apps or `web` for web apps.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::flow::OAuthClient;
use crate::provider::{GMAIL_MODIFY_SCOPE, GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL, Provider};

/// OAuth client registration read from a client-secrets file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSecrets {
    /// Client ID.
    pub client_id: String,
    /// Client secret (not confidential for installed apps).
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Authorization endpoint.
    #[serde(default)]
    pub auth_uri: Option<String>,
    /// Token endpoint.
    #[serde(default)]
    pub token_uri: Option<String>,
}

#[derive(Deserialize)]
struct SecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    /// Parses the JSON contents of a client-secrets file.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or has neither an
    /// `installed` nor a `web` section.
    pub fn from_json(contents: &str) -> Result<Self> {
        let file: SecretsFile = serde_json::from_str(contents)?;
        let secrets = file.installed.or(file.web).ok_or_else(|| {
            Error::InvalidConfig("client secrets have no \"installed\" or \"web\" section".into())
        })?;
        if secrets.client_id.trim().is_empty() {
            return Err(Error::InvalidConfig("client_id is empty".into()));
        }
        Ok(secrets)
    }

    /// Reads and parses a client-secrets file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_json(&contents)
    }

    /// Provider built from the endpoints in the file, defaulting to Google's.
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint is not a valid URL.
    pub fn provider(&self) -> Result<Provider> {
        let auth = self.auth_uri.as_deref().unwrap_or(GOOGLE_AUTH_URL);
        let token = self.token_uri.as_deref().unwrap_or(GOOGLE_TOKEN_URL);
        let provider = Provider::new("Google", auth, token)?
            .with_default_scopes(vec![GMAIL_MODIFY_SCOPE.to_string()]);
        provider.validate()?;
        Ok(provider)
    }

    /// OAuth client for these secrets.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider endpoints are invalid.
    pub fn oauth_client(&self) -> Result<OAuthClient> {
        let mut client = OAuthClient::new(&self.client_id, self.provider()?);
        if let Some(secret) = self.client_secret.as_deref().filter(|s| !s.is_empty()) {
            client = client.with_client_secret(secret);
        }
        Ok(client)
    }
}
