// Composition tests: the pipeline and bulk delete wired to in-memory fakes.
//
// These tests exercise the data flow between modules:
//   search -> score -> rank, and selection -> delete
// without any network calls.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use slacksift::models::{ScoredMessage, SearchCriteria, DIRECT_MESSAGE_CHANNEL};
use slacksift::pipeline::delete::delete_selected;
use slacksift::pipeline::search::{self, rank_by_relevance, SearchOutcome};
use slacksift::scoring::traits::{RelevanceScorer, ScoreResult};
use slacksift::slack::client::{
    DeleteResponse, MatchChannel, RawSearchMatch, SearchMessages, SearchResponse,
};
use slacksift::slack::error::MessagingError;
use slacksift::slack::traits::MessagingApi;

// ============================================================
// Fakes
// ============================================================

#[derive(Default)]
struct FakeSlack {
    matches: Vec<RawSearchMatch>,
    search_error: Option<String>,
    failing_permalinks: HashSet<String>,
    deleted: Mutex<Vec<String>>,
}

#[async_trait]
impl MessagingApi for FakeSlack {
    async fn search_messages(
        &self,
        _criteria: &SearchCriteria,
    ) -> Result<SearchResponse, MessagingError> {
        if let Some(reason) = &self.search_error {
            return Err(MessagingError::SearchFailure(reason.clone()));
        }
        Ok(SearchResponse {
            ok: true,
            messages: Some(SearchMessages {
                total: Some(self.matches.len() as u64),
                matches: self.matches.clone(),
            }),
            error: None,
        })
    }

    async fn delete_message(&self, permalink: &str) -> Result<DeleteResponse, MessagingError> {
        if self.failing_permalinks.contains(permalink) {
            return Err(MessagingError::DeleteFailure("cant_delete_message".to_string()));
        }
        self.deleted.lock().unwrap().push(permalink.to_string());
        Ok(DeleteResponse {
            ok: true,
            channel: None,
            ts: None,
            error: None,
        })
    }
}

/// Returns pre-scripted results in call order and records the inputs.
struct ScriptedScorer {
    results: Mutex<VecDeque<ScoreResult>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, String)>>,
}

impl ScriptedScorer {
    fn new(results: Vec<ScoreResult>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn scores(scores: &[u8]) -> Self {
        Self::new(scores.iter().map(|s| ScoreResult::scored(*s)).collect())
    }
}

#[async_trait]
impl RelevanceScorer for ScriptedScorer {
    async fn score_message(&self, message: &str, prompt: &str) -> ScoreResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((message.to_string(), prompt.to_string()));
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| ScoreResult::failed("no scripted result"))
    }
}

fn raw(id: &str, channel: Option<&str>) -> RawSearchMatch {
    RawSearchMatch {
        internal_id: id.to_string(),
        text: format!("message {id}"),
        author_name: "ana".to_string(),
        ts: "1690000000.123456".to_string(),
        permalink: format!("https://acme.slack.com/archives/C1/p16900000001234{id:0>2}"),
        channel: channel.map(|name| MatchChannel {
            id: Some("C1".to_string()),
            name: Some(name.to_string()),
        }),
    }
}

fn scored(id: &str, score: u8) -> ScoredMessage {
    ScoredMessage {
        id: id.to_string(),
        text: format!("message {id}"),
        author: "ana".to_string(),
        channel: "general".to_string(),
        timestamp: "2023-07-22 04:26:40".to_string(),
        relevance_score: score,
        permalink: format!("https://acme.slack.com/archives/C1/p16900000001234{id:0>2}"),
    }
}

fn ids(messages: &[ScoredMessage]) -> Vec<&str> {
    messages.iter().map(|m| m.id.as_str()).collect()
}

// ============================================================
// Search -> score -> rank
// ============================================================

#[tokio::test]
async fn zero_matches_yields_no_messages_and_no_scoring() {
    let slack = FakeSlack::default();
    let scorer = ScriptedScorer::scores(&[]);

    let outcome = search::run(&slack, &scorer, &SearchCriteria::new("anything"))
        .await
        .unwrap();

    assert_eq!(outcome, SearchOutcome::NoMessages);
    assert!(outcome.messages().is_empty());
    assert_eq!(scorer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn results_are_ranked_by_score_descending() {
    let slack = FakeSlack {
        matches: vec![raw("a", Some("general")), raw("b", Some("general")), raw("c", Some("general"))],
        ..FakeSlack::default()
    };
    let scorer = ScriptedScorer::scores(&[10, 90, 50]);

    let outcome = search::run(&slack, &scorer, &SearchCriteria::new("deploys"))
        .await
        .unwrap();

    let scores: Vec<u8> = outcome.messages().iter().map(|m| m.relevance_score).collect();
    assert_eq!(scores, vec![90, 50, 10]);
    assert_eq!(ids(outcome.messages()), vec!["b", "c", "a"]);
}

#[tokio::test]
async fn scoring_follows_search_order_with_the_prompt() {
    let slack = FakeSlack {
        matches: vec![raw("a", None), raw("b", None)],
        ..FakeSlack::default()
    };
    let scorer = ScriptedScorer::scores(&[1, 2]);

    search::run(&slack, &scorer, &SearchCriteria::new("budget"))
        .await
        .unwrap();

    let seen = scorer.seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            ("message a".to_string(), "budget".to_string()),
            ("message b".to_string(), "budget".to_string()),
        ]
    );
}

#[tokio::test]
async fn scoring_failure_degrades_to_zero_without_aborting() {
    let slack = FakeSlack {
        matches: vec![raw("a", None), raw("b", None), raw("c", None)],
        ..FakeSlack::default()
    };
    let scorer = ScriptedScorer::new(vec![
        ScoreResult::scored(40),
        ScoreResult::failed("Anthropic API returned 529"),
        ScoreResult::scored(70),
    ]);

    let outcome = search::run(&slack, &scorer, &SearchCriteria::new("x"))
        .await
        .unwrap();

    match outcome {
        SearchOutcome::Ranked {
            messages,
            scoring_failures,
        } => {
            assert_eq!(scoring_failures, 1);
            assert_eq!(ids(&messages), vec!["c", "a", "b"]);
            assert_eq!(messages[2].relevance_score, 0);
        }
        SearchOutcome::NoMessages => panic!("expected ranked results"),
    }
}

#[tokio::test]
async fn search_failure_propagates_and_skips_scoring() {
    let slack = FakeSlack {
        search_error: Some("invalid_auth".to_string()),
        ..FakeSlack::default()
    };
    let scorer = ScriptedScorer::scores(&[]);

    let err = search::run(&slack, &scorer, &SearchCriteria::new("x"))
        .await
        .unwrap_err();

    assert!(matches!(err, MessagingError::SearchFailure(ref r) if r == "invalid_auth"));
    assert_eq!(scorer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_channel_becomes_direct_message() {
    let slack = FakeSlack {
        matches: vec![raw("a", None), raw("b", Some("random"))],
        ..FakeSlack::default()
    };
    let scorer = ScriptedScorer::scores(&[60, 30]);

    let outcome = search::run(&slack, &scorer, &SearchCriteria::new("x"))
        .await
        .unwrap();
    let messages = outcome.messages();

    assert_eq!(messages[0].channel, DIRECT_MESSAGE_CHANNEL);
    assert_eq!(messages[1].channel, "random");
    assert_eq!(messages[0].timestamp, "2023-07-22 04:26:40");
    assert_eq!(messages[0].author, "ana");
}

// ============================================================
// Ranking
// ============================================================

#[test]
fn equal_scores_keep_search_order() {
    let mut messages = vec![
        scored("a", 50),
        scored("b", 80),
        scored("c", 50),
        scored("d", 80),
        scored("e", 0),
    ];
    rank_by_relevance(&mut messages);
    assert_eq!(ids(&messages), vec!["b", "d", "a", "c", "e"]);
}

#[test]
fn ranking_is_sorted_for_many_inputs() {
    // Deterministic pseudo-random scores, with plenty of ties.
    let mut messages: Vec<ScoredMessage> = (0..200u32)
        .map(|i| scored(&i.to_string(), ((i * 37 + 11) % 7 * 15) as u8))
        .collect();
    let original: Vec<String> = messages.iter().map(|m| m.id.clone()).collect();

    rank_by_relevance(&mut messages);

    for pair in messages.windows(2) {
        assert!(pair[0].relevance_score >= pair[1].relevance_score);
        if pair[0].relevance_score == pair[1].relevance_score {
            let first = original.iter().position(|id| *id == pair[0].id).unwrap();
            let second = original.iter().position(|id| *id == pair[1].id).unwrap();
            assert!(first < second, "tie order broken at {} / {}", pair[0].id, pair[1].id);
        }
    }
}

// ============================================================
// Bulk delete
// ============================================================

#[tokio::test]
async fn one_failed_delete_of_three_reports_two() {
    let results = vec![scored("a", 90), scored("b", 50), scored("c", 10)];
    let slack = FakeSlack {
        failing_permalinks: [results[1].permalink.clone()].into_iter().collect(),
        ..FakeSlack::default()
    };
    let selected: Vec<String> = vec!["a".into(), "b".into(), "c".into()];

    let summary = delete_selected(&slack, &results, &selected).await;

    assert_eq!(summary.deleted(), 2);
    assert_eq!(summary.deleted_ids, vec!["a".to_string(), "c".to_string()]);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, "b");
    assert_eq!(slack.deleted.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_and_duplicate_ids_are_not_deleted() {
    let results = vec![scored("a", 90)];
    let slack = FakeSlack::default();
    let selected: Vec<String> = vec!["a".into(), "ghost".into(), "a".into()];

    let summary = delete_selected(&slack, &results, &selected).await;

    assert_eq!(summary.deleted(), 1);
    assert_eq!(summary.not_found, vec!["ghost".to_string()]);
    assert_eq!(slack.deleted.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn bulk_delete_leaves_results_untouched() {
    let results = vec![scored("a", 90), scored("b", 50)];
    let slack = FakeSlack::default();

    let summary = delete_selected(&slack, &results, &["a".to_string()]).await;

    assert_eq!(summary.deleted(), 1);
    assert_eq!(results.len(), 2);
}
