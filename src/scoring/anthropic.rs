// Anthropic messages scoring backend.
//
// x-api-key + anthropic-version headers, single user turn carrying the
// instruction, reply at content[0].text.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{parse, scoring_input, MAX_REPLY_TOKENS, SCORING_INSTRUCTION};
use crate::config::ScoringConfig;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub(crate) async fn score(
    client: &Client,
    config: &ScoringConfig,
    message: &str,
    prompt: &str,
) -> Result<u8> {
    let url = format!("{}/messages", config.base_url());
    let content = format!("{SCORING_INSTRUCTION}\n\n{}", scoring_input(message, prompt));

    let request = MessagesRequest {
        model: &config.model,
        max_tokens: MAX_REPLY_TOKENS,
        temperature: 0.0,
        messages: vec![UserMessage {
            role: "user",
            content: &content,
        }],
    };

    let response = client
        .post(&url)
        .header("x-api-key", &config.api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .json(&request)
        .send()
        .await
        .context("Failed to call Anthropic API")?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Anthropic API returned {}: {}", status, body);
    }

    let reply: MessagesResponse = response
        .json()
        .await
        .context("Failed to parse Anthropic API response")?;

    Ok(parse::parse_score(reply.text()))
}

// --- Anthropic request/response types ---

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<UserMessage<'a>>,
}

#[derive(Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

impl MessagesResponse {
    fn text(&self) -> &str {
        self.content
            .first()
            .and_then(|block| block.text.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}
