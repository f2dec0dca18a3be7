//! Message types for application events.
//!
//! Async results cross back into `update` as `Result<_, String>` so they stay
//! `Clone` and render directly.

use inboxsweep_core::{GmailClient, MessageRef, MessageReport, RevokeOutcome};

use crate::model::AppSettings;

/// Application messages (events).
#[derive(Debug, Clone)]
pub enum Message {
    // Controls
    /// Preview toggle flipped.
    PreviewToggled(bool),
    /// Scan-limit slider moved.
    LimitChanged(u32),
    /// Label filter edited.
    LabelChanged(String),
    /// Threshold slider moved.
    ThresholdChanged(f64),

    // Scan
    /// Start a scan with the current controls.
    StartScan,
    /// Session ready (or not).
    Authenticated(Result<GmailClient, String>),
    /// Listing returned.
    Listed(Result<Vec<MessageRef>, String>),
    /// One message went through the loop.
    Processed(MessageReport),
    /// Drop the results of the last run.
    ClearResults,

    // Session
    /// Delete the cached token.
    RevokeSession,
    /// Revoke finished.
    Revoked(Result<RevokeOutcome, String>),

    // Appearance
    /// Switch between light and dark.
    ToggleTheme,
    /// Settings read from disk.
    SettingsLoaded(Result<AppSettings, String>),
    /// Settings written to disk.
    SettingsSaved(Result<(), String>),

    /// Desktop notification delivered (or not).
    Notified(Result<(), String>),

    // Keyboard
    /// A shortcut was pressed.
    KeyPressed(KeyboardAction),
    /// Keyboard event with no binding.
    Ignored,
}

/// Keyboard shortcut actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardAction {
    /// F5 or Ctrl+Enter.
    Scan,
    /// Escape.
    Clear,
}
