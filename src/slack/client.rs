// Slack Web API client over reqwest.
//
// Three calls: auth.test (token validation), search.messages (one page of
// up to 100 matches) and chat.delete (keyed by the channel/ts decoded from
// a permalink). Transport and platform failures are normalized into
// `MessagingError`; token validation swallows everything into `false`.

use std::error::Error as _;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use super::error::{MessagingError, GENERIC_ERROR};
use super::permalink;
use super::traits::MessagingApi;
use crate::config::{AuthMode, SlackConfig};
use crate::models::SearchCriteria;

/// Slack's documented maximum page size for search.messages.
pub const SEARCH_PAGE_SIZE: u32 = 100;

/// Query used when the prompt is empty.
const WILDCARD_QUERY: &str = "*";

/// Header carrying the token in proxy mode.
const PROXY_TOKEN_HEADER: &str = "X-Slack-Token";

/// Authenticated client for the Slack Web API.
pub struct SlackClient {
    client: reqwest::Client,
    config: SlackConfig,
}

impl SlackClient {
    /// Create a client from a plain configuration value.
    pub fn new(config: SlackConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("slacksift/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, config })
    }

    /// Full URL for a Web API method, honouring proxy mode.
    pub fn endpoint(&self, method: &str) -> String {
        let direct = format!("{}/{}", self.config.api_url.trim_end_matches('/'), method);
        match &self.config.auth_mode {
            AuthMode::Bearer => direct,
            AuthMode::Proxy { prefix } => format!("{prefix}{direct}"),
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.auth_mode {
            AuthMode::Bearer => request.bearer_auth(&self.config.token),
            AuthMode::Proxy { .. } => request.header(PROXY_TOKEN_HEADER, &self.config.token),
        }
    }

    /// Check the token with auth.test.
    ///
    /// True only when the call succeeds, the status is 2xx and the body says
    /// `ok: true`. Never errors.
    pub async fn validate_token(&self) -> bool {
        let url = self.endpoint("auth.test");

        let response = match self.authorize(self.client.post(&url)).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Token validation request failed");
                return false;
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "Token validation failed");
            return false;
        }

        match response.json::<OkResponse>().await {
            Ok(body) => {
                if !body.ok {
                    debug!(error = ?body.error, "auth.test rejected token");
                }
                body.ok
            }
            Err(e) => {
                warn!(error = %e, "Malformed auth.test response");
                false
            }
        }
    }
}

/// Build the search.messages query string.
///
/// Channel and user filters are only added when present. Date bounds become
/// Slack `after:` / `before:` query modifiers.
pub fn search_params(criteria: &SearchCriteria) -> Vec<(&'static str, String)> {
    let prompt = criteria.prompt.trim();
    let mut query = if prompt.is_empty() {
        WILDCARD_QUERY.to_string()
    } else {
        prompt.to_string()
    };
    if let Some(from) = non_empty(&criteria.date_from) {
        query.push_str(&format!(" after:{from}"));
    }
    if let Some(to) = non_empty(&criteria.date_to) {
        query.push_str(&format!(" before:{to}"));
    }

    let mut params = vec![("query", query), ("count", SEARCH_PAGE_SIZE.to_string())];
    if let Some(channel) = non_empty(&criteria.channel) {
        params.push(("in", channel.to_string()));
    }
    if let Some(user) = non_empty(&criteria.user) {
        params.push(("from", user.to_string()));
    }
    params
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Describe a reqwest failure without its URL, which in proxy mode carries
/// the relay prefix and must not feed the CORS check.
fn describe_transport(e: reqwest::Error) -> String {
    let e = e.without_url();
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Turn a reqwest failure into a `MessagingError`, logging it first.
fn transport_error(method: &str, e: reqwest::Error) -> MessagingError {
    let message = describe_transport(e);
    error!(method = method, error = %message, "Slack request failed");
    MessagingError::from_transport(message)
}

/// chat.delete failures of any kind surface as `DeleteFailure`.
fn delete_transport_error(e: reqwest::Error) -> MessagingError {
    let message = describe_transport(e);
    error!(method = "chat.delete", error = %message, "Slack request failed");
    MessagingError::DeleteFailure(message)
}

#[async_trait]
impl MessagingApi for SlackClient {
    async fn search_messages(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<SearchResponse, MessagingError> {
        let url = self.endpoint("search.messages");
        let params = search_params(criteria);

        debug!(
            channel = ?criteria.channel,
            user = ?criteria.user,
            "search.messages request"
        );

        let response = self
            .authorize(self.client.get(&url))
            .query(&params)
            .send()
            .await
            .map_err(|e| transport_error("search.messages", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error("search.messages", e))?;
        let parsed = serde_json::from_str::<SearchResponse>(&body);

        if !status.is_success() {
            let reason = parsed
                .ok()
                .and_then(|r| r.error)
                .unwrap_or_else(|| GENERIC_ERROR.to_string());
            warn!(status = %status, error = %reason, "search.messages returned an error status");
            return Err(MessagingError::SearchFailure(reason));
        }

        let parsed = parsed.map_err(|e| MessagingError::Decode(e.to_string()))?;
        if !parsed.ok {
            let reason = parsed.error.unwrap_or_else(|| GENERIC_ERROR.to_string());
            warn!(error = %reason, "search.messages reported failure");
            return Err(MessagingError::SearchFailure(reason));
        }

        if let Some(messages) = &parsed.messages {
            let returned = messages.matches.len() as u64;
            match messages.total {
                Some(total) if total > returned => {
                    warn!(
                        total = total,
                        returned = returned,
                        "More matches than one search page holds; only the first page is ranked"
                    );
                }
                _ => debug!(returned = returned, "search.messages complete"),
            }
        }

        Ok(parsed)
    }

    async fn delete_message(&self, permalink: &str) -> Result<DeleteResponse, MessagingError> {
        let decoded = permalink::decode(permalink)
            .ok_or_else(|| MessagingError::InvalidPermalink(permalink.to_string()))?;

        let url = self.endpoint("chat.delete");
        let request = DeleteRequest {
            channel: &decoded.channel_id,
            ts: &decoded.ts,
        };

        debug!(channel = %decoded.channel_id, ts = %decoded.ts, "chat.delete request");

        let response = self
            .authorize(self.client.post(&url))
            .json(&request)
            .send()
            .await
            .map_err(delete_transport_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(delete_transport_error)?;
        let parsed = serde_json::from_str::<DeleteResponse>(&body).ok();

        match parsed {
            Some(resp) if status.is_success() && resp.ok => Ok(resp),
            other => {
                let reason = other
                    .and_then(|r| r.error)
                    .unwrap_or_else(|| GENERIC_ERROR.to_string());
                warn!(status = %status, error = %reason, "chat.delete failed");
                Err(MessagingError::DeleteFailure(reason))
            }
        }
    }
}

// -- Serde types for the Slack Web API --

#[derive(Deserialize)]
struct OkResponse {
    #[serde(default)]
    ok: bool,
    error: Option<String>,
}

/// Response from `search.messages`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub ok: bool,
    pub messages: Option<SearchMessages>,
    pub error: Option<String>,
}

impl SearchResponse {
    /// The matches in the order Slack returned them.
    pub fn into_matches(self) -> Vec<RawSearchMatch> {
        self.messages.map(|m| m.matches).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchMessages {
    /// Total hits across all pages (Slack reports this even when only one
    /// page is returned).
    pub total: Option<u64>,
    #[serde(default)]
    pub matches: Vec<RawSearchMatch>,
}

/// One search hit as Slack returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSearchMatch {
    #[serde(rename = "iid")]
    pub internal_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "username", default)]
    pub author_name: String,
    /// Unix seconds as a decimal string, e.g. "1690000000.123456"
    pub ts: String,
    #[serde(default)]
    pub permalink: String,
    pub channel: Option<MatchChannel>,
}

impl RawSearchMatch {
    pub fn channel_name(&self) -> Option<&str> {
        self.channel
            .as_ref()
            .and_then(|c| c.name.as_deref())
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchChannel {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    channel: &'a str,
    ts: &'a str,
}

/// Response from `chat.delete`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub ok: bool,
    pub channel: Option<String>,
    pub ts: Option<String>,
    pub error: Option<String>,
}
