// Search-score-rank pipeline.
//
// One search request, one scoring call per match (in Slack's order), then a
// stable sort by relevance so equal scores keep their search order.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::models::{
    format_slack_timestamp, ScoredMessage, SearchCriteria, DIRECT_MESSAGE_CHANNEL,
};
use crate::scoring::traits::RelevanceScorer;
use crate::slack::client::RawSearchMatch;
use crate::slack::error::MessagingError;
use crate::slack::traits::MessagingApi;

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The search succeeded but matched nothing. No scoring calls were made.
    NoMessages,
    /// Matches sorted by relevance, highest first.
    Ranked {
        messages: Vec<ScoredMessage>,
        /// How many matches fell back to score 0 because scoring failed.
        scoring_failures: usize,
    },
}

impl SearchOutcome {
    pub fn messages(&self) -> &[ScoredMessage] {
        match self {
            SearchOutcome::NoMessages => &[],
            SearchOutcome::Ranked { messages, .. } => messages.as_slice(),
        }
    }

    pub fn into_messages(self) -> Vec<ScoredMessage> {
        match self {
            SearchOutcome::NoMessages => Vec::new(),
            SearchOutcome::Ranked { messages, .. } => messages,
        }
    }
}

/// Run the pipeline for one set of criteria.
///
/// Search failures abort the run and propagate. Scoring failures never do;
/// they show up as score 0 and in `scoring_failures`.
pub async fn run(
    messaging: &dyn MessagingApi,
    scorer: &dyn RelevanceScorer,
    criteria: &SearchCriteria,
) -> Result<SearchOutcome, MessagingError> {
    // Step 1: One search request
    let matches = messaging.search_messages(criteria).await?.into_matches();

    // Step 2: Nothing to score
    if matches.is_empty() {
        info!("Search returned no messages");
        return Ok(SearchOutcome::NoMessages);
    }

    info!(count = matches.len(), "Scoring search matches");

    // Step 3: Score sequentially, preserving search order
    let pb = ProgressBar::new(matches.len() as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("  Scoring [{bar:30}] {pos}/{len} ({eta})")
    {
        pb.set_style(style);
    }

    let mut messages = Vec::with_capacity(matches.len());
    let mut scoring_failures = 0;

    for raw in matches {
        let result = scorer.score_message(&raw.text, &criteria.prompt).await;
        if let Some(error) = &result.error {
            warn!(id = %raw.internal_id, error = %error, "Scoring failed, using 0");
            scoring_failures += 1;
        }
        messages.push(to_scored_message(raw, result.score));
        pb.inc(1);
    }
    pb.finish_and_clear();

    // Step 4: Highest relevance first
    rank_by_relevance(&mut messages);

    Ok(SearchOutcome::Ranked {
        messages,
        scoring_failures,
    })
}

/// Pair a raw match with its score.
pub fn to_scored_message(raw: RawSearchMatch, score: u8) -> ScoredMessage {
    let channel = raw
        .channel_name()
        .unwrap_or(DIRECT_MESSAGE_CHANNEL)
        .to_string();

    ScoredMessage {
        id: raw.internal_id,
        text: raw.text,
        author: raw.author_name,
        channel,
        timestamp: format_slack_timestamp(&raw.ts),
        relevance_score: score.min(100),
        permalink: raw.permalink,
    }
}

/// Sort by relevance, descending. Stable: ties keep their input order.
pub fn rank_by_relevance(messages: &mut [ScoredMessage]) {
    messages.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
}
