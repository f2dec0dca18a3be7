//! Clutter scoring.
//!
//! A [`Scorer`] maps a message excerpt to a [`Score`] in `[0, 1]`. The
//! strategy is picked once at startup: with remote scoring configured the
//! excerpt is sent to a chat-completions model, and any failure on that path
//! falls back to the keyword heuristic. Without it, only the heuristic runs.

mod heuristic;
mod remote;

pub use heuristic::{CLUTTER_KEYWORDS, KEYWORD_WEIGHT, heuristic_score, keyword_hits};
pub use remote::{
    CompletionClient, DEFAULT_BASE_URL, DEFAULT_MODEL, RemoteScorer, RemoteScoringConfig,
    ScoringError, build_prompt, parse_reply,
};

use std::fmt;

use tracing::debug;

/// Clutter likelihood in the closed interval `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Score(f64);

impl Score {
    /// Certainly not clutter.
    pub const ZERO: Self = Self(0.0);
    /// Certainly clutter.
    pub const ONE: Self = Self(1.0);

    /// Returns a score if `value` lies in `[0, 1]`.
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        (0.0..=1.0).contains(&value).then_some(Self(value))
    }

    /// Clamps a finite value into `[0, 1]`; NaN maps to zero.
    #[must_use]
    pub fn saturating(value: f64) -> Self {
        if value.is_nan() {
            Self::ZERO
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// Raw value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// A score at or above the threshold counts as clutter.
    #[must_use]
    pub fn is_clutter(self, threshold: f64) -> bool {
        self.0 >= threshold
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Which path produced a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreSource {
    /// Remote model reply.
    Model,
    /// Keyword heuristic.
    Keywords,
}

impl ScoreSource {
    /// Short label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Keywords => "keywords",
        }
    }
}

/// A score together with the path that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored {
    /// The score.
    pub score: Score,
    /// Where it came from.
    pub source: ScoreSource,
}

impl Scored {
    fn keywords(excerpt: &str) -> Self {
        Self {
            score: heuristic_score(excerpt),
            source: ScoreSource::Keywords,
        }
    }
}

/// Scoring strategy, chosen once at startup.
#[derive(Debug, Clone)]
pub enum Scorer {
    /// Keyword heuristic only.
    Heuristic,
    /// Remote model with heuristic fallback.
    Remote(RemoteScorer),
}

impl Scorer {
    /// Picks the remote strategy when a configuration is present.
    #[must_use]
    pub fn from_config(http: reqwest::Client, remote: Option<RemoteScoringConfig>) -> Self {
        remote.map_or(Self::Heuristic, |config| {
            Self::Remote(RemoteScorer::new(http, config))
        })
    }

    /// Human-readable description of the active strategy.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Heuristic => "keyword heuristic".to_string(),
            Self::Remote(remote) => format!("{} (keyword fallback)", remote.model()),
        }
    }

    /// Scores an excerpt. Never fails: remote errors fall back to keywords.
    pub async fn score(&self, excerpt: &str) -> Scored {
        match self {
            Self::Heuristic => Scored::keywords(excerpt),
            Self::Remote(remote) => match remote.try_score(excerpt).await {
                Ok(score) => Scored {
                    score,
                    source: ScoreSource::Model,
                },
                Err(e) => {
                    debug!("Remote scoring failed, using keywords: {e}");
                    Scored::keywords(excerpt)
                }
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bounds() {
        assert!(Score::new(0.0).is_some());
        assert!(Score::new(1.0).is_some());
        assert!(Score::new(1.01).is_none());
        assert!(Score::new(-0.01).is_none());
        assert!(Score::new(f64::NAN).is_none());
        assert_eq!(Score::saturating(4.2), Score::ONE);
        assert_eq!(Score::saturating(-3.0), Score::ZERO);
        assert_eq!(Score::saturating(f64::NAN), Score::ZERO);
    }

    #[test]
    fn test_threshold_boundary_is_clutter() {
        let score = Score::new(0.8).unwrap();
        assert!(score.is_clutter(0.8));
        assert!(!score.is_clutter(0.81));
        assert!(Score::ZERO.is_clutter(0.0));
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Score::new(0.449_999).unwrap().to_string(), "0.45");
        assert_eq!(Score::ONE.to_string(), "1.00");
    }

    #[tokio::test]
    async fn test_heuristic_scorer() {
        let scored = Scorer::Heuristic.score("Weekly newsletter").await;
        assert_eq!(scored.source, ScoreSource::Keywords);
        assert_eq!(scored.score.value(), KEYWORD_WEIGHT);
    }

    #[test]
    fn test_from_config() {
        let http = reqwest::Client::new();
        assert!(matches!(
            Scorer::from_config(http.clone(), None),
            Scorer::Heuristic
        ));
        let scorer = Scorer::from_config(http, Some(RemoteScoringConfig::new("sk-test")));
        assert!(matches!(scorer, Scorer::Remote(_)));
        assert_eq!(scorer.describe(), "gpt-4o-mini (keyword fallback)");
    }
}
