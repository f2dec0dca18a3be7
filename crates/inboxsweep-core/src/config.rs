//! Environment-driven configuration and the startup preflight check.

use std::path::{Path, PathBuf};

use crate::credentials::TokenStore;
use crate::error::{Error, Result};
use crate::scoring::{RemoteScoringConfig, Scorer};

/// Client-secrets file location.
pub const CREDENTIALS_FILE_VAR: &str = "GMAIL_CREDENTIALS_FILE";
/// `file` or `keyring`.
pub const TOKEN_STORE_VAR: &str = "INBOXSWEEP_TOKEN_STORE";
/// Token cache path for the file store.
pub const TOKEN_FILE_VAR: &str = "INBOXSWEEP_TOKEN_FILE";
/// Enables remote scoring.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Chat model override.
pub const MODEL_VAR: &str = "OPENAI_MODEL";
/// Endpoint base override.
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";

/// Default client-secrets file, relative to the working directory.
pub const DEFAULT_CREDENTIALS_FILE: &str = "credentials.json";

/// Per-user configuration directory (`<config_dir>/inboxsweep`).
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("inboxsweep"))
}

/// First existing client-secrets file among the default locations: the
/// working directory, then the directory holding the executable.
fn locate_credentials_file(exe_dir: Option<&Path>) -> Option<PathBuf> {
    std::iter::once(PathBuf::from(DEFAULT_CREDENTIALS_FILE))
        .chain(exe_dir.map(|dir| dir.join(DEFAULT_CREDENTIALS_FILE)))
        .find(|path| path.is_file())
}

fn default_credentials_file() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    locate_credentials_file(exe_dir.as_deref())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_FILE))
}

fn default_token_file() -> PathBuf {
    config_dir().map_or_else(
        || PathBuf::from(".inboxsweep-token.json"),
        |dir| dir.join("token.json"),
    )
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Google OAuth client-secrets JSON.
    pub credentials_file: PathBuf,
    /// Where the OAuth token is cached.
    pub token_store: TokenStore,
    /// Remote scoring settings, if an API key is set.
    pub remote_scoring: Option<RemoteScoringConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            credentials_file: PathBuf::from(DEFAULT_CREDENTIALS_FILE),
            token_store: TokenStore::File(default_token_file()),
            remote_scoring: None,
        }
    }
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an unknown token store kind.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an unknown token store kind.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let credentials_file = get(CREDENTIALS_FILE_VAR)
            .map_or_else(default_credentials_file, PathBuf::from);

        let token_store = match get(TOKEN_STORE_VAR).as_deref() {
            None | Some("file") => TokenStore::File(
                get(TOKEN_FILE_VAR).map_or_else(default_token_file, PathBuf::from),
            ),
            Some("keyring") => TokenStore::Keyring,
            Some(other) => {
                return Err(Error::Config(format!(
                    "{TOKEN_STORE_VAR} must be \"file\" or \"keyring\", got {other:?}"
                )));
            }
        };

        let remote_scoring = get(API_KEY_VAR).map(|key| {
            let mut remote = RemoteScoringConfig::new(key);
            if let Some(model) = get(MODEL_VAR) {
                remote = remote.with_model(model);
            }
            if let Some(base) = get(BASE_URL_VAR) {
                remote = remote.with_base_url(base);
            }
            remote
        });

        Ok(Self {
            credentials_file,
            token_store,
            remote_scoring,
        })
    }

    /// Builds the scorer this configuration asks for.
    #[must_use]
    pub fn scorer(&self, http: reqwest::Client) -> Scorer {
        Scorer::from_config(http, self.remote_scoring.clone())
    }
}

/// Environment facts shown before the first scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preflight {
    /// Current working directory, if it could be determined.
    pub working_dir: Option<PathBuf>,
    /// Absolute path of the client-secrets file.
    pub credentials_path: PathBuf,
    /// Whether that file exists.
    pub credentials_found: bool,
    /// Active scoring strategy.
    pub scorer_mode: String,
    /// Token cache location.
    pub token_store: String,
}

impl Preflight {
    /// Inspects the environment for `config`.
    #[must_use]
    pub fn check(config: &AppConfig, scorer: &Scorer) -> Self {
        let credentials_path = absolute(&config.credentials_file);
        Self {
            working_dir: std::env::current_dir().ok(),
            credentials_found: credentials_path.is_file(),
            credentials_path,
            scorer_mode: scorer.describe(),
            token_store: config.token_store.describe(),
        }
    }

    /// A scan can only start once the client secrets are present.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.credentials_found
    }

    /// How to fix a failed check.
    #[must_use]
    pub fn instructions(&self) -> Option<String> {
        if self.is_ready() {
            return None;
        }
        Some(format!(
            "Missing OAuth client file at {}. Download the desktop-app client JSON from the \
             Google Cloud console, save it as {DEFAULT_CREDENTIALS_FILE} in the working \
             directory or next to the inboxsweep executable, or set \
             {CREDENTIALS_FILE_VAR} to its path, then restart.",
            self.credentials_path.display()
        ))
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
