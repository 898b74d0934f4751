// Provider-dispatching relevance scorer.
//
// One reqwest client, one configuration value, one entry point. The
// provider tag selects the backend; any error from the backend becomes a
// zero score with the error text attached. No retries.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::traits::{RelevanceScorer, ScoreResult};
use super::{anthropic, gemini, openai};
use crate::config::{ScoringConfig, ScoringProvider};

/// Relevance scorer backed by one of the supported language-model APIs.
pub struct ScoringClient {
    client: Client,
    config: ScoringConfig,
}

impl ScoringClient {
    /// Create a scorer from a plain configuration value.
    pub fn new(config: ScoringConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("slacksift/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, config })
    }

    pub fn provider(&self) -> ScoringProvider {
        self.config.provider
    }

    async fn dispatch(&self, message: &str, prompt: &str) -> Result<u8> {
        match self.config.provider {
            ScoringProvider::OpenAi => {
                openai::score(&self.client, &self.config, message, prompt).await
            }
            ScoringProvider::Anthropic => {
                anthropic::score(&self.client, &self.config, message, prompt).await
            }
            ScoringProvider::Google => {
                gemini::score(&self.client, &self.config, message, prompt).await
            }
        }
    }
}

#[async_trait]
impl RelevanceScorer for ScoringClient {
    async fn score_message(&self, message: &str, prompt: &str) -> ScoreResult {
        match self.dispatch(message, prompt).await {
            Ok(score) => {
                debug!(
                    provider = %self.config.provider,
                    score = score,
                    text_preview = %crate::output::truncate_chars(message, 50),
                    "Scored message"
                );
                ScoreResult::scored(score)
            }
            Err(e) => {
                warn!(provider = %self.config.provider, error = %e, "Relevance scoring failed");
                ScoreResult::failed(format!("{e:#}"))
            }
        }
    }
}
