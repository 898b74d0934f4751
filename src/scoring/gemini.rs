// Google Gemini generateContent scoring backend.
//
// The API key rides in the query string, so transport errors are stripped
// of their URL before they can reach logs or a ScoreResult.

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
    let url = format!(
        "{}/models/{}:generateContent",
        config.base_url(),
        config.model
    );
    let text = format!("{SCORING_INSTRUCTION}\n\n{}", scoring_input(message, prompt));

    let request = GenerateRequest {
        contents: vec![Content {
            parts: vec![Part { text: &text }],
        }],
        generation_config: GenerationConfig {
            temperature: 0.0,
            max_output_tokens: MAX_REPLY_TOKENS,
        },
    };

    let response = client
        .post(&url)
        .query(&[("key", config.api_key.as_str())])
        .json(&request)
        .send()
        .await
        .map_err(|e| e.without_url())
        .context("Failed to call Google API")?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Google API returned {}: {}", status, body);
    }

    let reply: GenerateResponse = response
        .json()
        .await
        .map_err(|e| e.without_url())
        .context("Failed to parse Google API response")?;

    Ok(parse::parse_score(reply.text()))
}

// --- Gemini request/response types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    fn text(&self) -> &str {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|content| content.parts.first())
            .and_then(|part| part.text.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}
