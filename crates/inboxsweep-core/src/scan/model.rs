//! Scan configuration and report types.

use std::fmt;

use crate::error::{Error, Result};
use crate::mailbox::LabelFilter;
use crate::scoring::Scored;

/// Settings for one scan run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    preview: bool,
    limit: u32,
    label: LabelFilter,
    threshold: f64,
}

impl ScanConfig {
    /// Smallest accepted message limit.
    pub const MIN_LIMIT: u32 = 1;
    /// Largest accepted message limit.
    pub const MAX_LIMIT: u32 = 100;
    /// Default message limit.
    pub const DEFAULT_LIMIT: u32 = 25;
    /// Default clutter threshold.
    pub const DEFAULT_THRESHOLD: f64 = 0.80;
    /// Label shown in the UI before the user edits it.
    pub const DEFAULT_LABEL: &'static str = "INBOX";

    /// Validates and builds a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `limit` is outside `1..=100` or
    /// `threshold` is outside `[0, 1]`.
    pub fn new(
        preview: bool,
        limit: u32,
        label: impl Into<LabelFilter>,
        threshold: f64,
    ) -> Result<Self> {
        if !(Self::MIN_LIMIT..=Self::MAX_LIMIT).contains(&limit) {
            return Err(Error::Config(format!(
                "scan limit must be between {} and {}, got {limit}",
                Self::MIN_LIMIT,
                Self::MAX_LIMIT
            )));
        }
        if !(0.0..=1.0).contains(&threshold) {
            return Err(Error::Config(format!(
                "threshold must be between 0 and 1, got {threshold}"
            )));
        }
        Ok(Self {
            preview,
            limit,
            label: label.into(),
            threshold,
        })
    }

    /// Whether clutter is only reported, never trashed.
    #[must_use]
    pub const fn preview(&self) -> bool {
        self.preview
    }

    /// Maximum number of messages to list.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Label restriction.
    #[must_use]
    pub const fn label(&self) -> &LabelFilter {
        &self.label
    }

    /// Clutter threshold.
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            preview: true,
            limit: Self::DEFAULT_LIMIT,
            label: LabelFilter::new(Self::DEFAULT_LABEL),
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }
}

/// Terminal state of one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The excerpt could not be fetched; the message was skipped.
    FetchFailed {
        /// Fetch error text.
        error: String,
    },
    /// Below threshold.
    Kept,
    /// Clutter, but preview mode is on.
    Previewed,
    /// Clutter, moved to trash.
    Deleted,
    /// Clutter, but the trash call failed.
    DeleteFailed {
        /// Trash error text.
        error: String,
    },
}

impl Outcome {
    /// True for the two failure states.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::FetchFailed { .. } | Self::DeleteFailed { .. })
    }

    /// True if the message was classified as clutter.
    #[must_use]
    pub const fn is_clutter(&self) -> bool {
        matches!(
            self,
            Self::Previewed | Self::Deleted | Self::DeleteFailed { .. }
        )
    }
}

/// Everything known about one processed message.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageReport {
    /// 1-based position in the listing.
    pub index: usize,
    /// Provider message ID.
    pub id: String,
    /// Excerpt, if it could be fetched.
    pub excerpt: Option<String>,
    /// Score, if one was computed.
    pub scored: Option<Scored>,
    /// What happened.
    pub outcome: Outcome,
}

impl MessageReport {
    /// One-line description of the outcome.
    #[must_use]
    pub fn headline(&self) -> String {
        match &self.outcome {
            Outcome::FetchFailed { error } => {
                format!("Could not load snippet for {}: {error}", self.id)
            }
            Outcome::Kept => "Keeping this email.".to_string(),
            Outcome::Previewed => "[PREVIEW] Would delete this email.".to_string(),
            Outcome::Deleted => "Deleted (moved to Trash).".to_string(),
            Outcome::DeleteFailed { error } => format!("Failed to delete: {error}"),
        }
    }
}

/// Result of a whole run.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanReport {
    /// The listing returned nothing.
    Empty,
    /// Every listed message, in provider order.
    Completed(Vec<MessageReport>),
}

impl ScanReport {
    /// Text shown for an empty listing.
    pub const EMPTY_MESSAGE: &'static str = "No messages found.";

    /// Builds a report from processed messages.
    #[must_use]
    pub fn from_reports(reports: Vec<MessageReport>) -> Self {
        if reports.is_empty() {
            Self::Empty
        } else {
            Self::Completed(reports)
        }
    }

    /// Per-message reports; empty for [`ScanReport::Empty`].
    #[must_use]
    pub fn reports(&self) -> &[MessageReport] {
        match self {
            Self::Empty => &[],
            Self::Completed(reports) => reports,
        }
    }

    /// Outcome counts.
    #[must_use]
    pub fn summary(&self) -> ScanSummary {
        ScanSummary::tally(self.reports())
    }
}

/// Outcome counts for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Messages processed.
    pub total: usize,
    /// Below threshold.
    pub kept: usize,
    /// Clutter, left alone in preview mode.
    pub previewed: usize,
    /// Moved to trash.
    pub deleted: usize,
    /// Skipped because the excerpt fetch failed.
    pub fetch_failed: usize,
    /// Trash call failed.
    pub delete_failed: usize,
}

impl ScanSummary {
    /// Counts the outcomes in `reports`.
    #[must_use]
    pub fn tally(reports: &[MessageReport]) -> Self {
        reports.iter().fold(
            Self {
                total: reports.len(),
                ..Self::default()
            },
            |mut acc, report| {
                match report.outcome {
                    Outcome::FetchFailed { .. } => acc.fetch_failed += 1,
                    Outcome::Kept => acc.kept += 1,
                    Outcome::Previewed => acc.previewed += 1,
                    Outcome::Deleted => acc.deleted += 1,
                    Outcome::DeleteFailed { .. } => acc.delete_failed += 1,
                }
                acc
            },
        )
    }

    /// Failures of either kind.
    #[must_use]
    pub const fn failed(&self) -> usize {
        self.fetch_failed + self.delete_failed
    }
}

impl fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} scanned: {} trashed, {} previewed, {} kept, {} failed",
            self.total,
            self.deleted,
            self.previewed,
            self.kept,
            self.failed()
        )
    }
}

/// Progress through a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanProgress {
    /// Messages finished so far.
    pub processed: usize,
    /// Messages listed.
    pub total: usize,
}

impl ScanProgress {
    /// Completed fraction in `[0, 1]`; zero when nothing was listed.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            (self.processed.min(self.total) as f32) / (self.total as f32)
        }
    }

    /// True once every listed message is processed.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.processed >= self.total
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn report(index: usize, outcome: Outcome) -> MessageReport {
        MessageReport {
            index,
            id: format!("m{index}"),
            excerpt: None,
            scored: None,
            outcome,
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = ScanConfig::default();
        assert!(config.preview());
        assert_eq!(config.limit(), 25);
        assert_eq!(config.label().label(), Some("INBOX"));
        assert_eq!(config.threshold(), 0.80);
    }

    #[test]
    fn test_config_validation() {
        assert!(ScanConfig::new(true, 1, "", 0.0).is_ok());
        assert!(ScanConfig::new(true, 100, "", 1.0).is_ok());
        assert!(matches!(
            ScanConfig::new(true, 0, "", 0.5),
            Err(Error::Config(_))
        ));
        assert!(ScanConfig::new(true, 101, "", 0.5).is_err());
        assert!(ScanConfig::new(true, 10, "", 1.5).is_err());
        assert!(ScanConfig::new(true, 10, "", -0.1).is_err());
        assert!(ScanConfig::new(true, 10, "", f64::NAN).is_err());
    }

    #[test]
    fn test_blank_label_means_default_view() {
        let config = ScanConfig::new(false, 5, "  ", 0.5).unwrap();
        assert_eq!(config.label(), &LabelFilter::default_view());
    }

    #[test]
    fn test_headlines() {
        assert_eq!(report(1, Outcome::Kept).headline(), "Keeping this email.");
        assert_eq!(
            report(1, Outcome::Previewed).headline(),
            "[PREVIEW] Would delete this email."
        );
        assert_eq!(
            report(1, Outcome::Deleted).headline(),
            "Deleted (moved to Trash)."
        );
        assert_eq!(
            report(
                2,
                Outcome::FetchFailed {
                    error: "timeout".into()
                }
            )
            .headline(),
            "Could not load snippet for m2: timeout"
        );
        assert_eq!(
            report(
                3,
                Outcome::DeleteFailed {
                    error: "403".into()
                }
            )
            .headline(),
            "Failed to delete: 403"
        );
    }

    #[test]
    fn test_summary() {
        let report = ScanReport::from_reports(vec![
            report(1, Outcome::Kept),
            report(2, Outcome::Deleted),
            report(3, Outcome::Deleted),
            report(4, Outcome::FetchFailed { error: "x".into() }),
            report(5, Outcome::DeleteFailed { error: "y".into() }),
        ]);
        let summary = report.summary();
        assert_eq!(summary.total, 5);
        assert_eq!(summary.deleted, 2);
        assert_eq!(summary.failed(), 2);
        assert_eq!(
            summary.to_string(),
            "5 scanned: 2 trashed, 0 previewed, 1 kept, 2 failed"
        );
    }

    #[test]
    fn test_empty_report() {
        let report = ScanReport::from_reports(Vec::new());
        assert_eq!(report, ScanReport::Empty);
        assert!(report.reports().is_empty());
        assert_eq!(report.summary(), ScanSummary::default());
    }

    #[test]
    fn test_progress_fraction() {
        assert_eq!(ScanProgress::default().fraction(), 0.0);
        let half = ScanProgress {
            processed: 2,
            total: 4,
        };
        assert_eq!(half.fraction(), 0.5);
        assert!(!half.is_done());
        assert!(
            ScanProgress {
                processed: 4,
                total: 4
            }
            .is_done()
        );
    }
}
