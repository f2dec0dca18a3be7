//! # inboxsweep-core
//!
//! Core logic for the `InboxSweep` Gmail clutter cleaner.
//!
//! This crate provides:
//! - Configuration from the environment and a startup preflight check
//! - Credential cache for the OAuth token (file or system keyring)
//! - Session provider (cached, refreshed or freshly consented token)
//! - The [`Mailbox`] capability trait and its Gmail REST implementation
//! - Clutter scoring: remote chat model with a keyword fallback
//! - The scan, score and act loop

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod credentials;
mod error;
pub mod mailbox;
pub mod scan;
pub mod scoring;
pub mod session;

#[cfg(test)]
mod test_support;

pub use config::{AppConfig, Preflight};
pub use credentials::{CredentialError, CredentialResult, RevokeOutcome, TokenStore};
pub use error::{Error, Result};
pub use mailbox::{GmailClient, LabelFilter, Mailbox, MailboxError, MessageRef};
pub use scan::{MessageReport, Outcome, ScanConfig, ScanProgress, ScanReport, ScanSummary, Scanner};
pub use scoring::{RemoteScorer, RemoteScoringConfig, Score, ScoreSource, Scored, Scorer, ScoringError};
pub use session::{Session, SessionProvider};

pub use inboxsweep_oauth::Token;
