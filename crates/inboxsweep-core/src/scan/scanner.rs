use tracing::{info, warn};

use super::model::{MessageReport, Outcome, ScanConfig, ScanProgress, ScanReport};
use crate::mailbox::{Mailbox, MailboxError, MessageRef};
use crate::scoring::Scorer;

/// Runs the loop against one mailbox with one scorer and configuration.
#[derive(Debug)]
pub struct Scanner<'a, M> {
    mailbox: &'a M,
    scorer: &'a Scorer,
    config: &'a ScanConfig,
}

impl<'a, M: Mailbox + Sync> Scanner<'a, M> {
    /// Creates a scanner.
    #[must_use]
    pub const fn new(mailbox: &'a M, scorer: &'a Scorer, config: &'a ScanConfig) -> Self {
        Self {
            mailbox,
            scorer,
            config,
        }
    }

    /// Lists the messages a run would process, in provider order.
    ///
    /// # Errors
    ///
    /// Returns the mailbox error if the listing fails.
    pub async fn list(&self) -> Result<Vec<MessageRef>, MailboxError> {
        self.mailbox
            .list(self.config.label(), self.config.limit())
            .await
    }

    /// Processes one listed message. `index` is its 1-based position.
    ///
    /// Never fails: fetch and trash errors become outcomes.
    pub async fn process(&self, index: usize, message: &MessageRef) -> MessageReport {
        let id = message.id.clone();

        let excerpt = match self.mailbox.fetch_excerpt(&id).await {
            Ok(excerpt) => excerpt,
            Err(e) => {
                warn!(index, %id, "Could not load snippet: {e}");
                return MessageReport {
                    index,
                    id,
                    excerpt: None,
                    scored: None,
                    outcome: Outcome::FetchFailed {
                        error: e.to_string(),
                    },
                };
            }
        };

        let scored = self.scorer.score(&excerpt).await;
        let outcome = if !scored.score.is_clutter(self.config.threshold()) {
            Outcome::Kept
        } else if self.config.preview() {
            Outcome::Previewed
        } else {
            match self.mailbox.trash(&id).await {
                Ok(()) => Outcome::Deleted,
                Err(e) => {
                    warn!(index, %id, "Failed to delete: {e}");
                    Outcome::DeleteFailed {
                        error: e.to_string(),
                    }
                }
            }
        };

        info!(
            index,
            %id,
            score = %scored.score,
            source = scored.source.label(),
            ?outcome,
            "processed message"
        );

        MessageReport {
            index,
            id,
            excerpt: Some(excerpt),
            scored: Some(scored),
            outcome,
        }
    }

    /// Runs the whole loop, reporting progress after each message.
    ///
    /// # Errors
    ///
    /// Returns the mailbox error if the listing fails; no messages are
    /// processed in that case.
    pub async fn run<F>(&self, mut on_progress: F) -> Result<ScanReport, MailboxError>
    where
        F: FnMut(ScanProgress),
    {
        let messages = self.list().await?;
        if messages.is_empty() {
            info!(label = %self.config.label(), "No messages found");
            return Ok(ScanReport::Empty);
        }

        let total = messages.len();
        let mut reports = Vec::with_capacity(total);
        for (position, message) in messages.iter().enumerate() {
            reports.push(self.process(position + 1, message).await);
            on_progress(ScanProgress {
                processed: position + 1,
                total,
            });
        }

        Ok(ScanReport::from_reports(reports))
    }
}
