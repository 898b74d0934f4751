// OpenAI chat-completions scoring backend.
//
// Bearer auth, system + user messages, reply at choices[0].message.content.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{parse, scoring_input, MAX_REPLY_TOKENS, SCORING_INSTRUCTION};
use crate::config::ScoringConfig;

pub(crate) async fn score(
    client: &Client,
    config: &ScoringConfig,
    message: &str,
    prompt: &str,
) -> Result<u8> {
    let url = format!("{}/chat/completions", config.base_url());
    let input = scoring_input(message, prompt);

    let request = ChatRequest {
        model: &config.model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: SCORING_INSTRUCTION,
            },
            ChatMessage {
                role: "user",
                content: &input,
            },
        ],
        temperature: 0.0,
        max_tokens: MAX_REPLY_TOKENS,
    };

    let response = client
        .post(&url)
        .bearer_auth(&config.api_key)
        .json(&request)
        .send()
        .await
        .context("Failed to call OpenAI API")?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("OpenAI API returned {}: {}", status, body);
    }

    let reply: ChatResponse = response
        .json()
        .await
        .context("Failed to parse OpenAI API response")?;

    Ok(parse::parse_score(reply.text()))
}

// --- OpenAI request/response types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
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

impl ChatResponse {
    fn text(&self) -> &str {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
