//! Credential cache for the OAuth token.
//!
//! The token is kept either in a JSON file or in the platform's native
//! credential storage:
//! - Linux: Secret Service (GNOME Keyring, `KWallet`)
//! - macOS: Keychain
//! - Windows: Credential Manager
//!
//! Both variants expose the same explicit `load` / `save` / `delete`
//! operations; nothing is cached in process-global state.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use inboxsweep_oauth::Token;
use keyring::Entry;
use tracing::{debug, warn};

/// Service name used for keyring entries.
const SERVICE_NAME: &str = "inboxsweep";

/// Keyring entry holding the serialized `OAuth2` token.
const OAUTH_TOKEN_ENTRY: &str = "oauth_token";

/// Error type for credential operations.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Failed to access keyring.
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    /// Failed to read or write the token file.
    #[error("Token file error: {0}")]
    Io(#[from] io::Error),

    /// The stored token could not be decoded.
    #[error("Stored token is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Result type for credential operations.
pub type CredentialResult<T> = std::result::Result<T, CredentialError>;

/// What a revoke request found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevokeOutcome {
    /// A stored token was removed.
    Deleted,
    /// There was no stored token.
    NothingToDelete,
}

impl RevokeOutcome {
    /// User-facing description.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Deleted => "Deleted token. Re-authentication will be required on the next scan.",
            Self::NothingToDelete => "No stored token found. Nothing to delete.",
        }
    }
}

/// Where the OAuth token is cached between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStore {
    /// JSON file at the given path.
    File(PathBuf),
    /// System keyring entry.
    Keyring,
}

impl TokenStore {
    /// Loads the cached token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read or the entry is corrupt.
    pub fn load(&self) -> CredentialResult<Option<Token>> {
        let json = match self {
            Self::File(path) => match fs::read_to_string(path) {
                Ok(json) => json,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!("No token file at {}", path.display());
                    return Ok(None);
                }
                Err(e) => return Err(e.into()),
            },
            Self::Keyring => match keyring_entry()?.get_password() {
                Ok(json) => json,
                Err(keyring::Error::NoEntry) => {
                    debug!("No OAuth2 token in keyring");
                    return Ok(None);
                }
                Err(e) => return Err(e.into()),
            },
        };
        Ok(Some(serde_json::from_str(&json)?))
    }

    /// Persists the token, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    pub fn save(&self, token: &Token) -> CredentialResult<()> {
        let json = serde_json::to_string(token)?;
        match self {
            Self::File(path) => {
                write_private(path, json.as_bytes())?;
                debug!("Stored OAuth2 token in {}", path.display());
            }
            Self::Keyring => {
                keyring_entry()?.set_password(&json)?;
                debug!("Stored OAuth2 token in keyring");
            }
        }
        Ok(())
    }

    /// Removes the cached token.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage fails for any reason other than the
    /// entry being absent.
    pub fn delete(&self) -> CredentialResult<RevokeOutcome> {
        match self {
            Self::File(path) => match fs::remove_file(path) {
                Ok(()) => {
                    debug!("Deleted token file {}", path.display());
                    Ok(RevokeOutcome::Deleted)
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(RevokeOutcome::NothingToDelete),
                Err(e) => {
                    warn!("Failed to delete token file: {e}");
                    Err(e.into())
                }
            },
            Self::Keyring => match keyring_entry()?.delete_credential() {
                Ok(()) => {
                    debug!("Deleted OAuth2 token from keyring");
                    Ok(RevokeOutcome::Deleted)
                }
                Err(keyring::Error::NoEntry) => Ok(RevokeOutcome::NothingToDelete),
                Err(e) => {
                    warn!("Failed to delete OAuth2 token: {e}");
                    Err(e.into())
                }
            },
        }
    }

    /// Short description for the preflight panel.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Keyring => format!("system keyring ({SERVICE_NAME}/{OAUTH_TOKEN_ENTRY})"),
        }
    }
}

fn keyring_entry() -> CredentialResult<Entry> {
    Ok(Entry::new(SERVICE_NAME, OAUTH_TOKEN_ENTRY)?)
}

/// Writes `contents` to `path`, creating parent directories; owner-only on Unix.
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}
