// Relevance scorer trait: the seam the pipeline scores through.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outcome of scoring one (message, prompt) pair.
///
/// Failures are carried in-band: a failed call yields score 0 plus the
/// error text, so a single bad reply never halts a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Always within 0..=100
    pub score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScoreResult {
    pub fn scored(score: u8) -> Self {
        Self {
            score: score.min(100),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            score: 0,
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Trait for scoring message relevance. Implementations must be async
/// because every backend is an HTTP API.
///
/// `score_message` is infallible by contract: implementations convert
/// their own failures into `ScoreResult::failed`.
#[async_trait]
pub trait RelevanceScorer: Send + Sync {
    async fn score_message(&self, message: &str, prompt: &str) -> ScoreResult;
}
