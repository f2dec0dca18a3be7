//! Mailbox capabilities consumed by the scan loop.
//!
//! The scan loop only ever lists, reads an excerpt and trashes. Anything that
//! can do those three things is a [`Mailbox`]; [`GmailClient`] is the
//! production implementation.

mod gmail;

pub use gmail::{GMAIL_API_BASE, GmailClient};

use std::fmt;
use std::future::Future;

use serde::Deserialize;

/// Errors returned by a mailbox provider.
#[derive(Debug, thiserror::Error)]
pub enum MailboxError {
    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected our credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The provider answered with an error status.
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider-supplied message.
        message: String,
    },

    /// The configured API base cannot carry a path.
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

impl MailboxError {
    /// Returns true if re-authenticating could fix this error.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

/// Reference to a message as returned by a listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    /// Provider message ID.
    pub id: String,
    /// Thread the message belongs to.
    #[serde(default)]
    pub thread_id: Option<String>,
}

impl MessageRef {
    /// Reference with only an ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            thread_id: None,
        }
    }
}

/// Optional label restriction for a listing.
///
/// Blank input means "no restriction": the provider's default view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelFilter(Option<String>);

impl LabelFilter {
    /// Builds a filter from user input, trimming whitespace.
    #[must_use]
    pub fn new(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            Self(None)
        } else {
            Self(Some(trimmed.to_string()))
        }
    }

    /// The provider's default view.
    #[must_use]
    pub const fn default_view() -> Self {
        Self(None)
    }

    /// Label ID to send, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl From<&str> for LabelFilter {
    fn from(input: &str) -> Self {
        Self::new(input)
    }
}

impl From<Option<&str>> for LabelFilter {
    fn from(input: Option<&str>) -> Self {
        input.map_or_else(Self::default_view, Self::new)
    }
}

impl fmt::Display for LabelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().unwrap_or("default view"))
    }
}

/// Provider capabilities needed by the scan loop.
pub trait Mailbox {
    /// Lists up to `limit` message references, in provider order.
    fn list(
        &self,
        label: &LabelFilter,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<MessageRef>, MailboxError>> + Send;

    /// Fetches the short text excerpt of a message.
    fn fetch_excerpt(&self, id: &str)
    -> impl Future<Output = Result<String, MailboxError>> + Send;

    /// Moves a message to the trash.
    fn trash(&self, id: &str) -> impl Future<Output = Result<(), MailboxError>> + Send;
}
