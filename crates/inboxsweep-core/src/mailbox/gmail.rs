//! Gmail REST API client.
//!
//! Only the three calls the scan loop needs: `messages.list`,
//! `messages.get` (minimal format, for the snippet) and `messages.trash`.

use std::fmt;

use inboxsweep_oauth::Token;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{LabelFilter, Mailbox, MailboxError, MessageRef};

/// Base URL of the Gmail API for the authenticated user.
pub const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1/users/me";

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
struct MinimalMessage {
    #[serde(default)]
    snippet: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

/// Gmail client bound to one access token.
#[derive(Clone)]
pub struct GmailClient {
    http: Client,
    base: Url,
    authorization: String,
}

impl GmailClient {
    /// Creates a client for the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns an error only if the built-in base URL were invalid.
    pub fn new(http: Client, token: &Token) -> Result<Self, MailboxError> {
        Self::with_base_url(http, token, GMAIL_API_BASE)
    }

    /// Creates a client against a different API base (proxies, tests).
    ///
    /// # Errors
    ///
    /// Returns an error if `base` is not an absolute http(s) URL.
    pub fn with_base_url(http: Client, token: &Token, base: &str) -> Result<Self, MailboxError> {
        let base = Url::parse(base).map_err(|e| MailboxError::InvalidBaseUrl(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(MailboxError::InvalidBaseUrl(base.to_string()));
        }
        Ok(Self {
            http,
            base,
            authorization: token.authorization_header(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, MailboxError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| MailboxError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl fmt::Debug for GmailClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GmailClient")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

impl Mailbox for GmailClient {
    async fn list(&self, label: &LabelFilter, limit: u32) -> Result<Vec<MessageRef>, MailboxError> {
        let mut url = self.endpoint(&["messages"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("maxResults", &limit.to_string());
            if let Some(label) = label.label() {
                query.append_pair("labelIds", label);
            }
        }

        let response = self
            .http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, &self.authorization)
            .send()
            .await?;
        let list: ListResponse = check(response).await?.json().await?;
        debug!(count = list.messages.len(), %label, "listed messages");
        Ok(list.messages)
    }

    async fn fetch_excerpt(&self, id: &str) -> Result<String, MailboxError> {
        let mut url = self.endpoint(&["messages", id])?;
        url.query_pairs_mut().append_pair("format", "minimal");

        let response = self
            .http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, &self.authorization)
            .send()
            .await?;
        let message: MinimalMessage = check(response).await?.json().await?;
        Ok(message.snippet)
    }

    async fn trash(&self, id: &str) -> Result<(), MailboxError> {
        let url = self.endpoint(&["messages", id, "trash"])?;

        let response = self
            .http
            .post(url)
            .header(reqwest::header::AUTHORIZATION, &self.authorization)
            .header(reqwest::header::CONTENT_LENGTH, "0")
            .send()
            .await?;
        check(response).await?;
        debug!(id, "moved message to trash");
        Ok(())
    }
}

/// Maps non-success statuses to [`MailboxError`], using Google's error message when present.
async fn check(response: Response) -> Result<Response, MailboxError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|b| b.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

    if status == StatusCode::UNAUTHORIZED {
        Err(MailboxError::Unauthorized(message))
    } else {
        Err(MailboxError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
