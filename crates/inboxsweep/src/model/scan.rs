//! Progress of the scan shown in the results pane.
//!
//! The GUI drives the core scanner one message per task so the progress bar
//! can redraw between messages. This model holds the cursor for that loop.

use std::collections::VecDeque;

use inboxsweep_core::{GmailClient, MessageRef, MessageReport, ScanConfig, ScanProgress, ScanReport};

/// Where the current run stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanPhase {
    /// No run yet, or results were cleared.
    #[default]
    Idle,
    /// Waiting for a token (possibly on browser consent).
    Authenticating,
    /// Waiting for the message listing.
    Listing,
    /// Working through the listed messages.
    Processing,
    /// The run finished; the report is available.
    Finished,
    /// The run aborted before processing anything.
    Failed(String),
}

/// State of the current or last run.
#[derive(Debug, Default)]
pub struct ScanState {
    /// Current phase.
    pub phase: ScanPhase,
    config: Option<ScanConfig>,
    mailbox: Option<GmailClient>,
    pending: VecDeque<(usize, MessageRef)>,
    reports: Vec<MessageReport>,
    progress: ScanProgress,
    report: Option<ScanReport>,
}

/// Everything a task needs to process one message.
#[derive(Debug, Clone)]
pub struct NextMessage {
    /// Authenticated mailbox for the run.
    pub mailbox: GmailClient,
    /// Configuration of the run.
    pub config: ScanConfig,
    /// 1-based position in the listing.
    pub index: usize,
    /// The message to process.
    pub message: MessageRef,
}

impl ScanState {
    /// True while a run is in flight.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(
            self.phase,
            ScanPhase::Authenticating | ScanPhase::Listing | ScanPhase::Processing
        )
    }

    /// Starts a run with `config`, discarding previous results.
    pub fn begin(&mut self, config: ScanConfig) {
        *self = Self {
            phase: ScanPhase::Authenticating,
            config: Some(config),
            ..Self::default()
        };
    }

    /// Configuration of the current run.
    #[must_use]
    pub const fn config(&self) -> Option<&ScanConfig> {
        self.config.as_ref()
    }

    /// Records the authenticated mailbox and moves on to listing.
    pub fn authenticated(&mut self, mailbox: GmailClient) {
        self.mailbox = Some(mailbox);
        self.phase = ScanPhase::Listing;
    }

    /// Mailbox and configuration for the listing call.
    #[must_use]
    pub fn listing_inputs(&self) -> Option<(GmailClient, ScanConfig)> {
        Some((self.mailbox.clone()?, self.config.clone()?))
    }

    /// Queues the listed messages and returns the first one to process.
    ///
    /// An empty listing finishes the run immediately.
    pub fn listed(&mut self, messages: Vec<MessageRef>) -> Option<NextMessage> {
        self.progress = ScanProgress {
            processed: 0,
            total: messages.len(),
        };
        self.pending = messages
            .into_iter()
            .enumerate()
            .map(|(i, m)| (i + 1, m))
            .collect();

        if self.pending.is_empty() {
            self.finish();
            return None;
        }
        self.phase = ScanPhase::Processing;
        self.next()
    }

    /// Stores a processed message and returns the next one, if any.
    pub fn record(&mut self, report: MessageReport) -> Option<NextMessage> {
        self.reports.push(report);
        self.progress.processed = self.reports.len();
        if self.pending.is_empty() {
            self.finish();
            None
        } else {
            self.next()
        }
    }

    /// Aborts the run.
    pub fn fail(&mut self, error: String) {
        self.mailbox = None;
        self.pending.clear();
        self.phase = ScanPhase::Failed(error);
    }

    /// Forgets results; ignored while a run is in flight.
    pub fn clear(&mut self) {
        if !self.is_running() {
            *self = Self::default();
        }
    }

    /// Progress through the listed messages.
    #[must_use]
    pub const fn progress(&self) -> ScanProgress {
        self.progress
    }

    /// Messages processed so far, in order.
    #[must_use]
    pub fn reports(&self) -> &[MessageReport] {
        &self.reports
    }

    /// Final report once the run has finished.
    #[must_use]
    pub const fn report(&self) -> Option<&ScanReport> {
        self.report.as_ref()
    }

    fn next(&mut self) -> Option<NextMessage> {
        let (index, message) = self.pending.pop_front()?;
        Some(NextMessage {
            mailbox: self.mailbox.clone()?,
            config: self.config.clone()?,
            index,
            message,
        })
    }

    fn finish(&mut self) {
        self.mailbox = None;
        self.report = Some(ScanReport::from_reports(self.reports.clone()));
        self.phase = ScanPhase::Finished;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use inboxsweep_core::{Outcome, Token};

    use super::*;

    fn mailbox() -> GmailClient {
        GmailClient::new(reqwest::Client::new(), &Token::new("t", "Bearer")).unwrap()
    }

    fn kept(index: usize, id: &str) -> MessageReport {
        MessageReport {
            index,
            id: id.to_string(),
            excerpt: Some(String::new()),
            scored: None,
            outcome: Outcome::Kept,
        }
    }

    #[test]
    fn test_walks_messages_in_order() {
        let mut state = ScanState::default();
        state.begin(ScanConfig::default());
        assert!(state.is_running());
        state.authenticated(mailbox());
        assert_eq!(state.phase, ScanPhase::Listing);

        let first = state
            .listed(vec![MessageRef::new("a"), MessageRef::new("b")])
            .unwrap();
        assert_eq!((first.index, first.message.id.as_str()), (1, "a"));
        assert_eq!(state.progress().total, 2);

        let second = state.record(kept(1, "a")).unwrap();
        assert_eq!((second.index, second.message.id.as_str()), (2, "b"));
        assert_eq!(state.progress().processed, 1);

        assert!(state.record(kept(2, "b")).is_none());
        assert_eq!(state.phase, ScanPhase::Finished);
        assert!(!state.is_running());
        assert_eq!(state.report().unwrap().reports().len(), 2);
    }

    #[test]
    fn test_empty_listing_finishes() {
        let mut state = ScanState::default();
        state.begin(ScanConfig::default());
        state.authenticated(mailbox());
        assert!(state.listed(Vec::new()).is_none());
        assert_eq!(state.report(), Some(&ScanReport::Empty));
    }

    #[test]
    fn test_clear_is_ignored_while_running() {
        let mut state = ScanState::default();
        state.begin(ScanConfig::default());
        state.clear();
        assert_eq!(state.phase, ScanPhase::Authenticating);

        state.fail("denied".to_string());
        state.clear();
        assert_eq!(state.phase, ScanPhase::Idle);
    }
}
