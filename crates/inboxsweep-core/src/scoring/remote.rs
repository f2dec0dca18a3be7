//! Remote scoring through an OpenAI-compatible chat-completions endpoint.

use std::fmt;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Score;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Endpoint base used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Errors on the remote scoring path. All of them trigger the keyword fallback.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    /// Transport or decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with an error status.
    #[error("Completion API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider-supplied message.
        message: String,
    },

    /// The reply carried no text.
    #[error("Empty completion reply")]
    EmptyReply,

    /// The reply text is not a number.
    #[error("Reply is not a number: {0:?}")]
    Unparsable(String),

    /// The reply parsed to NaN or infinity.
    #[error("Reply is not a finite number: {0:?}")]
    NonFinite(String),
}

/// Connection settings for the completion endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteScoringConfig {
    /// Bearer key.
    pub api_key: String,
    /// Chat model name.
    pub model: String,
    /// Endpoint base, without the `/chat/completions` suffix.
    pub base_url: String,
}

impl RemoteScoringConfig {
    /// Settings with the default model and endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Overrides the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Overrides the endpoint base.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl fmt::Debug for RemoteScoringConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteScoringConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

/// Minimal chat-completions client: one user message in, reply text out.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http: Client,
    config: RemoteScoringConfig,
}

impl CompletionClient {
    /// Creates a client.
    #[must_use]
    pub const fn new(http: Client, config: RemoteScoringConfig) -> Self {
        Self { http, config }
    }

    /// Configured model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Sends `prompt` as a single user message at temperature 0.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a
    /// reply without text.
    pub async fn complete(&self, prompt: &str) -> Result<String, ScoringError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.0,
        };

        let response = self
            .http
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(ScoringError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: ChatResponse = response.json().await?;
        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ScoringError::EmptyReply)
    }
}

/// Embeds an excerpt in the scoring instruction.
#[must_use]
pub fn build_prompt(excerpt: &str) -> String {
    format!(
        "You are an email cleaning assistant. Given the email snippet, reply with a single \
         float between 0 and 1 indicating the probability this email is clutter \
         (promotions/ads/spam) that can be deleted.\n\
         Reply with ONLY the number.\n\n\
         SNIPPET:\n{excerpt}\n"
    )
}

/// Parses a model reply into a score.
///
/// Surrounding whitespace is ignored and finite values outside `[0, 1]` are
/// clamped.
///
/// # Errors
///
/// Returns an error if the reply is empty, not a number, or not finite.
pub fn parse_reply(reply: &str) -> Result<Score, ScoringError> {
    let trimmed = reply.trim();
    if trimmed.is_empty() {
        return Err(ScoringError::EmptyReply);
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| ScoringError::Unparsable(trimmed.to_string()))?;
    if !value.is_finite() {
        return Err(ScoringError::NonFinite(trimmed.to_string()));
    }
    Ok(Score::saturating(value))
}

/// Scores excerpts by asking a chat model.
#[derive(Debug, Clone)]
pub struct RemoteScorer {
    client: CompletionClient,
}

impl RemoteScorer {
    /// Creates a scorer for the given endpoint.
    #[must_use]
    pub const fn new(http: Client, config: RemoteScoringConfig) -> Self {
        Self {
            client: CompletionClient::new(http, config),
        }
    }

    /// Configured model name.
    #[must_use]
    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Asks the model for a score, without any fallback.
    ///
    /// # Errors
    ///
    /// Returns the first failure on the remote path.
    pub async fn try_score(&self, excerpt: &str) -> Result<Score, ScoringError> {
        let reply = self.client.complete(&build_prompt(excerpt)).await?;
        let score = parse_reply(&reply)?;
        debug!(model = self.model(), %score, "model scored excerpt");
        Ok(score)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::scoring::{ScoreSource, Scorer};
    use crate::test_support::CannedServer;

    fn reply(content: &str) -> (u16, String) {
        let body = serde_json::json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
        });
        (200, body.to_string())
    }

    fn scorer(server: &CannedServer) -> Scorer {
        let config = RemoteScoringConfig::new("sk-test")
            .with_model("test-model")
            .with_base_url(format!("{}/v1/", server.base_url));
        Scorer::from_config(Client::new(), Some(config))
    }

    #[test]
    fn test_prompt_embeds_excerpt() {
        let prompt = build_prompt("Huge sale!");
        assert!(prompt.starts_with("You are an email cleaning assistant."));
        assert!(prompt.contains("Reply with ONLY the number.\n\nSNIPPET:\nHuge sale!\n"));
    }

    #[test]
    fn test_parse_reply() {
        assert_eq!(parse_reply(" 0.73\n").unwrap().value(), 0.73);
        assert_eq!(parse_reply("1").unwrap(), Score::ONE);
        assert_eq!(parse_reply("1.7").unwrap(), Score::ONE);
        assert_eq!(parse_reply("-0.2").unwrap(), Score::ZERO);
        assert!(matches!(parse_reply("   "), Err(ScoringError::EmptyReply)));
        assert!(matches!(
            parse_reply("probably spam"),
            Err(ScoringError::Unparsable(_))
        ));
        assert!(matches!(parse_reply("NaN"), Err(ScoringError::NonFinite(_))));
        assert!(matches!(parse_reply("inf"), Err(ScoringError::NonFinite(_))));
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", RemoteScoringConfig::new("sk-secret"));
        assert!(!rendered.contains("sk-secret"));
    }

    #[tokio::test]
    async fn test_model_reply_is_used() {
        let server = CannedServer::start(vec![reply("0.91")]).await;

        let scored = scorer(&server).score("Hi, dinner Friday?").await;
        assert_eq!(scored.source, ScoreSource::Model);
        assert_eq!(scored.score.value(), 0.91);

        let req = &server.requests()[0];
        assert_eq!(req.method, "POST");
        assert_eq!(req.target, "/v1/chat/completions");
        assert!(req.headers.to_lowercase().contains("authorization: bearer sk-test"));
        let body: serde_json::Value = serde_json::from_str(&req.body).unwrap();
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["messages"][0]["role"], "user");
        assert!(
            body["messages"][0]["content"]
                .as_str()
                .unwrap()
                .ends_with("SNIPPET:\nHi, dinner Friday?\n")
        );
    }

    #[tokio::test]
    async fn test_out_of_range_reply_is_clamped() {
        let server = CannedServer::start(vec![reply("3")]).await;
        let scored = scorer(&server).score("anything").await;
        assert_eq!(scored.source, ScoreSource::Model);
        assert_eq!(scored.score, Score::ONE);
    }

    #[tokio::test]
    async fn test_error_status_falls_back() {
        let server = CannedServer::start(vec![(
            500,
            r#"{"error":{"message":"overloaded"}}"#.to_string(),
        )])
        .await;
        let scored = scorer(&server).score("Weekly newsletter, unsubscribe here").await;
        assert_eq!(scored.source, ScoreSource::Keywords);
        assert!((scored.score.value() - 0.30).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_garbage_reply_falls_back() {
        let server = CannedServer::start(vec![reply("I think it is spam")]).await;
        let scored = scorer(&server).score("Hi, dinner Friday?").await;
        assert_eq!(scored.source, ScoreSource::Keywords);
        assert_eq!(scored.score, Score::ZERO);
    }

    #[tokio::test]
    async fn test_complete_reports_api_error() {
        let server = CannedServer::start(vec![(
            401,
            r#"{"error":{"message":"Incorrect API key provided"}}"#.to_string(),
        )])
        .await;
        let client = CompletionClient::new(
            Client::new(),
            RemoteScoringConfig::new("bad").with_base_url(server.base_url.clone()),
        );
        let err = client.complete("prompt").await.unwrap_err();
        assert!(matches!(
            err,
            ScoringError::Api { status: 401, ref message } if message == "Incorrect API key provided"
        ));
    }

    #[tokio::test]
    async fn test_empty_choices() {
        let server = CannedServer::start(vec![(200, r#"{"choices":[]}"#.to_string())]).await;
        let client = CompletionClient::new(
            Client::new(),
            RemoteScoringConfig::new("k").with_base_url(server.base_url.clone()),
        );
        assert!(matches!(
            client.complete("prompt").await,
            Err(ScoringError::EmptyReply)
        ));
    }
}
