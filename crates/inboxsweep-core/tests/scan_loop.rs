//! Scan loop tests against an in-memory mailbox that records every call.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use inboxsweep_core::{
    LabelFilter, Mailbox, MailboxError, MessageRef, Outcome, ScanConfig, ScanProgress,
    ScanReport, ScoreSource, Scanner, Scorer,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    List { label: Option<String>, limit: u32 },
    Fetch(String),
    Trash(String),
}

#[derive(Default)]
struct RecordingMailbox {
    order: Vec<String>,
    excerpts: HashMap<String, String>,
    broken_fetch: HashSet<String>,
    broken_trash: HashSet<String>,
    broken_list: bool,
    calls: Mutex<Vec<Call>>,
}

impl RecordingMailbox {
    fn with_excerpts(excerpts: &[&str]) -> Self {
        let mut mailbox = Self::default();
        for (i, excerpt) in excerpts.iter().enumerate() {
            let id = format!("m{}", i + 1);
            mailbox.order.push(id.clone());
            mailbox.excerpts.insert(id, (*excerpt).to_string());
        }
        mailbox
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn trash_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Trash(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    fn fetch_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Fetch(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn api_error(status: u16) -> MailboxError {
    MailboxError::Api {
        status,
        message: "boom".to_string(),
    }
}

impl Mailbox for RecordingMailbox {
    async fn list(&self, label: &LabelFilter, limit: u32) -> Result<Vec<MessageRef>, MailboxError> {
        self.record(Call::List {
            label: label.label().map(str::to_string),
            limit,
        });
        if self.broken_list {
            return Err(MailboxError::Unauthorized("token revoked".to_string()));
        }
        let limit = usize::try_from(limit).unwrap();
        Ok(self
            .order
            .iter()
            .take(limit)
            .map(MessageRef::new)
            .collect())
    }

    async fn fetch_excerpt(&self, id: &str) -> Result<String, MailboxError> {
        self.record(Call::Fetch(id.to_string()));
        if self.broken_fetch.contains(id) {
            return Err(api_error(500));
        }
        Ok(self.excerpts.get(id).cloned().unwrap_or_default())
    }

    async fn trash(&self, id: &str) -> Result<(), MailboxError> {
        self.record(Call::Trash(id.to_string()));
        if self.broken_trash.contains(id) {
            return Err(api_error(403));
        }
        Ok(())
    }
}

const SCENARIO: [&str; 3] = [
    "Unsubscribe now for a special promo deal",
    "Hi, dinner Friday?",
    "Congratulations winner act now",
];

async fn scan(mailbox: &RecordingMailbox, config: &ScanConfig) -> ScanReport {
    Scanner::new(mailbox, &Scorer::Heuristic, config)
        .run(|_| {})
        .await
        .unwrap()
}

fn outcomes(report: &ScanReport) -> Vec<Outcome> {
    report.reports().iter().map(|r| r.outcome.clone()).collect()
}

fn scores(report: &ScanReport) -> Vec<f64> {
    report
        .reports()
        .iter()
        .map(|r| r.scored.unwrap().score.value())
        .collect()
}

#[tokio::test]
async fn scenario_a_everything_below_threshold_is_kept() {
    let mailbox = RecordingMailbox::with_excerpts(&SCENARIO);
    let config = ScanConfig::new(true, 3, "", 0.5).unwrap();

    let report = scan(&mailbox, &config).await;

    let scores = scores(&report);
    assert!((scores[0] - 0.45).abs() < 1e-9);
    assert_eq!(scores[1], 0.0);
    assert!((scores[2] - 0.45).abs() < 1e-9);
    assert_eq!(outcomes(&report), vec![Outcome::Kept; 3]);
    assert!(
        report
            .reports()
            .iter()
            .all(|r| r.scored.unwrap().source == ScoreSource::Keywords)
    );
    assert_eq!(
        mailbox.calls()[0],
        Call::List {
            label: None,
            limit: 3
        }
    );
    assert!(mailbox.trash_calls().is_empty());
}

#[tokio::test]
async fn scenario_b_preview_reports_without_trashing() {
    let mailbox = RecordingMailbox::with_excerpts(&SCENARIO);
    let config = ScanConfig::new(true, 3, "", 0.4).unwrap();

    let report = scan(&mailbox, &config).await;

    assert_eq!(
        outcomes(&report),
        vec![Outcome::Previewed, Outcome::Kept, Outcome::Previewed]
    );
    assert!(mailbox.trash_calls().is_empty());
    let summary = report.summary();
    assert_eq!((summary.previewed, summary.kept), (2, 1));
}

#[tokio::test]
async fn scenario_c_empty_listing() {
    let mailbox = RecordingMailbox::default();
    let config = ScanConfig::default();

    let mut progress_calls = 0;
    let report = Scanner::new(&mailbox, &Scorer::Heuristic, &config)
        .run(|_| progress_calls += 1)
        .await
        .unwrap();

    assert_eq!(report, ScanReport::Empty);
    assert_eq!(mailbox.fetch_calls(), 0);
    assert_eq!(progress_calls, 0);
    assert_eq!(
        mailbox.calls(),
        vec![Call::List {
            label: Some("INBOX".to_string()),
            limit: 25
        }]
    );
}

#[tokio::test]
async fn score_equal_to_threshold_is_clutter() {
    let mailbox = RecordingMailbox::with_excerpts(&["Monthly newsletter"]);
    let config = ScanConfig::new(true, 10, "INBOX", 0.15).unwrap();

    let report = scan(&mailbox, &config).await;

    assert_eq!(report.reports()[0].scored.unwrap().score.value(), 0.15);
    assert_eq!(outcomes(&report), vec![Outcome::Previewed]);
}

#[tokio::test]
async fn live_mode_trashes_each_clutter_message_once() {
    let mailbox = RecordingMailbox::with_excerpts(&SCENARIO);
    let config = ScanConfig::new(false, 3, "INBOX", 0.4).unwrap();

    let report = scan(&mailbox, &config).await;

    assert_eq!(
        outcomes(&report),
        vec![Outcome::Deleted, Outcome::Kept, Outcome::Deleted]
    );
    assert_eq!(mailbox.trash_calls(), vec!["m1", "m3"]);
    assert_eq!(
        mailbox.calls(),
        vec![
            Call::List {
                label: Some("INBOX".to_string()),
                limit: 3
            },
            Call::Fetch("m1".to_string()),
            Call::Trash("m1".to_string()),
            Call::Fetch("m2".to_string()),
            Call::Fetch("m3".to_string()),
            Call::Trash("m3".to_string()),
        ]
    );
}

#[tokio::test]
async fn fetch_failure_does_not_stop_the_run() {
    let mut mailbox = RecordingMailbox::with_excerpts(&SCENARIO);
    mailbox.broken_fetch.insert("m1".to_string());
    let config = ScanConfig::new(false, 3, "", 0.4).unwrap();

    let report = scan(&mailbox, &config).await;

    let first = &report.reports()[0];
    assert!(matches!(first.outcome, Outcome::FetchFailed { .. }));
    assert_eq!(first.excerpt, None);
    assert_eq!(first.scored, None);
    assert!(first.headline().starts_with("Could not load snippet for m1:"));
    assert_eq!(report.reports().len(), 3);
    assert_eq!(report.reports()[2].outcome, Outcome::Deleted);
    assert_eq!(mailbox.trash_calls(), vec!["m3"]);
}

#[tokio::test]
async fn delete_failure_is_reported_and_the_run_continues() {
    let mut mailbox = RecordingMailbox::with_excerpts(&SCENARIO);
    mailbox.broken_trash.insert("m1".to_string());
    let config = ScanConfig::new(false, 3, "", 0.4).unwrap();

    let report = scan(&mailbox, &config).await;

    assert!(matches!(
        &report.reports()[0].outcome,
        Outcome::DeleteFailed { error } if error.contains("403")
    ));
    assert_eq!(report.reports()[2].outcome, Outcome::Deleted);
    assert_eq!(mailbox.trash_calls(), vec!["m1", "m3"]);
    let summary = report.summary();
    assert_eq!((summary.deleted, summary.delete_failed), (1, 1));
}

#[tokio::test]
async fn listing_failure_aborts_without_processing() {
    let mut mailbox = RecordingMailbox::with_excerpts(&SCENARIO);
    mailbox.broken_list = true;
    let config = ScanConfig::default();

    let err = Scanner::new(&mailbox, &Scorer::Heuristic, &config)
        .run(|_| panic!("no progress expected"))
        .await
        .unwrap_err();

    assert!(err.is_auth());
    assert_eq!(mailbox.fetch_calls(), 0);
}

#[tokio::test]
async fn reports_keep_provider_order_and_progress() {
    let mailbox = RecordingMailbox::with_excerpts(&["z sale", "a", "m promo", "b"]);
    let config = ScanConfig::new(true, 100, "", 0.9).unwrap();

    let mut seen = Vec::new();
    let report = Scanner::new(&mailbox, &Scorer::Heuristic, &config)
        .run(|p| seen.push(p))
        .await
        .unwrap();

    let ids: Vec<_> = report.reports().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["m1", "m2", "m3", "m4"]);
    let indices: Vec<_> = report.reports().iter().map(|r| r.index).collect();
    assert_eq!(indices, [1, 2, 3, 4]);
    assert_eq!(
        seen,
        (1..=4)
            .map(|processed| ScanProgress {
                processed,
                total: 4
            })
            .collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn limit_caps_the_listing() {
    let mailbox = RecordingMailbox::with_excerpts(&SCENARIO);
    let config = ScanConfig::new(true, 2, "", 0.5).unwrap();

    let report = scan(&mailbox, &config).await;

    assert_eq!(report.reports().len(), 2);
}

#[tokio::test]
async fn stepwise_processing_matches_run() {
    let mailbox = RecordingMailbox::with_excerpts(&SCENARIO);
    let config = ScanConfig::new(true, 3, "", 0.4).unwrap();
    let scanner = Scanner::new(&mailbox, &Scorer::Heuristic, &config);

    let listed = scanner.list().await.unwrap();
    let mut stepwise = Vec::new();
    for (i, message) in listed.iter().enumerate() {
        stepwise.push(scanner.process(i + 1, message).await);
    }

    let whole = scanner.run(|_| {}).await.unwrap();
    assert_eq!(ScanReport::from_reports(stepwise), whole);
}
