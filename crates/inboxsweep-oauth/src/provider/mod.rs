//! `OAuth2` provider configurations.

use crate::error::{Error, Result};
use url::Url;

/// Google authorization endpoint.
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";

/// Google token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Scope that allows reading messages and moving them to the trash.
pub const GMAIL_MODIFY_SCOPE: &str = "https://www.googleapis.com/auth/gmail.modify";

/// `OAuth2` provider configuration.
#[derive(Debug, Clone)]
pub struct Provider {
    /// Provider name (e.g., "Google").
    pub name: String,
    /// Authorization endpoint URL.
    pub auth_url: Url,
    /// Token endpoint URL.
    pub token_url: Url,
    /// Default scopes.
    pub default_scopes: Vec<String>,
}

impl Provider {
    /// Creates a new provider configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if URLs are invalid.
    pub fn new(
        name: impl Into<String>,
        auth_url: impl AsRef<str>,
        token_url: impl AsRef<str>,
    ) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            auth_url: Url::parse(auth_url.as_ref())?,
            token_url: Url::parse(token_url.as_ref())?,
            default_scopes: Vec::new(),
        })
    }

    /// Sets the default scopes.
    #[must_use]
    pub fn with_default_scopes(mut self, scopes: Vec<String>) -> Self {
        self.default_scopes = scopes;
        self
    }

    /// Google provider scoped for Gmail message modification.
    ///
    /// # Errors
    ///
    /// Returns an error if URL parsing fails.
    pub fn google() -> Result<Self> {
        Ok(Self::new("Google", GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL)?
            .with_default_scopes(vec![GMAIL_MODIFY_SCOPE.to_string()]))
    }

    /// Returns true if this is a Google endpoint set.
    ///
    /// Google needs `access_type=offline` to hand out refresh tokens.
    #[must_use]
    pub fn is_google(&self) -> bool {
        self.name == "Google"
            || self
                .auth_url
                .host_str()
                .is_some_and(|h| h.ends_with("google.com"))
    }

    /// Validates that the endpoints are usable.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid.
    pub fn validate(&self) -> Result<()> {
        for (label, url) in [("auth_url", &self.auth_url), ("token_url", &self.token_url)] {
            if !matches!(url.scheme(), "https" | "http") {
                return Err(Error::InvalidConfig(format!(
                    "{label} must be an http(s) URL, got {url}"
                )));
            }
        }
        if self.default_scopes.is_empty() {
            return Err(Error::InvalidConfig("no scopes configured".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_google_provider() {
        let provider = Provider::google().unwrap();
        assert_eq!(provider.name, "Google");
        assert!(provider.is_google());
        assert_eq!(provider.default_scopes, vec![GMAIL_MODIFY_SCOPE.to_string()]);
        provider.validate().unwrap();
    }

    #[test]
    fn test_custom_provider_requires_scopes() {
        let provider = Provider::new(
            "Custom",
            "https://auth.example.com/authorize",
            "https://auth.example.com/token",
        )
        .unwrap();

        assert!(!provider.is_google());
        assert!(matches!(provider.validate(), Err(Error::InvalidConfig(_))));

        let provider = provider.with_default_scopes(vec!["mail".to_string()]);
        provider.validate().unwrap();
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        let provider = Provider::new("Odd", "ftp://auth.example.com/", "https://x.example.com/")
            .unwrap()
            .with_default_scopes(vec!["s".to_string()]);
        assert!(matches!(provider.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            Provider::new("Bad", "not a url", GOOGLE_TOKEN_URL),
            Err(Error::UrlError(_))
        ));
    }
}
