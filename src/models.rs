// Data models: the types that flow between the clients, the pipeline
// and the exporters.
//
// Field names on the wire (JSON export) are camelCase so exported files
// stay readable by other tooling that consumes them.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Channel label used when a search match carries no channel.
pub const DIRECT_MESSAGE_CHANNEL: &str = "Direct Message";

/// What the user asked for. Builds exactly one outbound search request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    /// Free-text prompt: both the search query and the relevance target.
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Inclusive lower bound, `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    /// Upper bound, `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
}

impl SearchCriteria {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }
}

/// A search match paired with its relevance score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredMessage {
    pub id: String,
    pub text: String,
    #[serde(rename = "user")]
    pub author: String,
    pub channel: String,
    /// Human-readable UTC time derived from the Slack `ts`
    pub timestamp: String,
    /// Always within 0..=100
    pub relevance_score: u8,
    pub permalink: String,
}

impl ScoredMessage {
    pub fn tier(&self) -> RelevanceTier {
        RelevanceTier::from_score(self.relevance_score)
    }
}

/// Convert a Slack `ts` ("1690000000.123456") into `YYYY-MM-DD HH:MM:SS` UTC.
///
/// Anything that doesn't parse as a finite, representable number of seconds
/// is returned unchanged.
pub fn format_slack_timestamp(ts: &str) -> String {
    let Ok(seconds) = ts.trim().parse::<f64>() else {
        return ts.to_string();
    };
    if !seconds.is_finite() {
        return ts.to_string();
    }

    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1_000_000_000.0) as u32;
    match DateTime::from_timestamp(whole as i64, nanos.min(999_999_999)) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => ts.to_string(),
    }
}

/// Relevance buckets used for display and summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelevanceTier {
    Low,
    Medium,
    High,
}

impl RelevanceTier {
    /// Determine the tier from a relevance score (0-100).
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 80 => RelevanceTier::High,
            s if s >= 50 => RelevanceTier::Medium,
            _ => RelevanceTier::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RelevanceTier::Low => "Low",
            RelevanceTier::Medium => "Medium",
            RelevanceTier::High => "High",
        }
    }
}

impl std::fmt::Display for RelevanceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_fractional_seconds() {
        assert_eq!(
            format_slack_timestamp("1690000000.123456"),
            "2023-07-22 04:26:40"
        );
    }

    #[test]
    fn keeps_unparseable_timestamp() {
        assert_eq!(format_slack_timestamp("yesterday"), "yesterday");
        assert_eq!(format_slack_timestamp("NaN"), "NaN");
    }

    #[test]
    fn criteria_serializes_camel_case_and_skips_empty_filters() {
        let criteria = SearchCriteria {
            prompt: "deploy".to_string(),
            date_from: Some("2024-01-01".to_string()),
            ..SearchCriteria::default()
        };
        let json = serde_json::to_value(&criteria).unwrap();
        assert_eq!(json["prompt"], "deploy");
        assert_eq!(json["dateFrom"], "2024-01-01");
        assert!(json.get("channel").is_none());
    }
}
