// Relevance scoring: one contract, three language-model backends.
//
// The RelevanceScorer trait defines the interface. ScoringClient implements
// it by dispatching on the configured provider; each provider module owns
// its own request/response shapes. Callers only ever see a ScoreResult.

pub mod anthropic;
pub mod client;
pub mod gemini;
pub mod openai;
pub mod parse;
pub mod traits;

/// Instruction sent with every scoring request.
pub const SCORING_INSTRUCTION: &str = "Score the relevance of the following message to the given prompt on a scale of 0-100. Respond with only a number.";

/// Reply budget: the answer is a number, a handful of tokens is plenty.
pub const MAX_REPLY_TOKENS: u32 = 10;

/// The user-turn text shared by all providers.
pub fn scoring_input(message: &str, prompt: &str) -> String {
    format!("Prompt: {prompt}\n\nMessage: {message}")
}
