//! Error types for the core library.

use thiserror::Error;

use crate::credentials::CredentialError;
use crate::mailbox::MailboxError;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Authorization with the mail provider failed.
    #[error("Authentication error: {0}")]
    OAuth(#[from] inboxsweep_oauth::Error),

    /// Mailbox operation failed.
    #[error("Mailbox error: {0}")]
    Mailbox(#[from] MailboxError),

    /// Credential cache error.
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
