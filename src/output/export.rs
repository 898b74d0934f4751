// CSV and JSON export of ranked results.
//
// CSV: header `Text,User,Channel,Timestamp,Relevance Score`, fields quoted
// only when they contain a comma, quote or newline, inner quotes doubled.
// JSON: `{messages, exportDate, searchCriteria}`, pretty-printed.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ScoredMessage, SearchCriteria};

pub const CSV_HEADER: &str = "Text,User,Channel,Timestamp,Relevance Score";

/// The JSON export document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub messages: Vec<ScoredMessage>,
    /// ISO-8601 UTC, millisecond precision
    pub export_date: String,
    pub search_criteria: SearchCriteria,
}

impl ExportData {
    /// Stamp an export with the current time.
    pub fn new(messages: Vec<ScoredMessage>, search_criteria: SearchCriteria) -> Self {
        Self {
            messages,
            export_date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            search_criteria,
        }
    }
}

/// The messages an export should contain: the selected ones, or all of
/// them when nothing is selected. Result order is preserved.
pub fn select_for_export<'a>(
    messages: &'a [ScoredMessage],
    selected: &[String],
) -> Vec<&'a ScoredMessage> {
    if selected.is_empty() {
        return messages.iter().collect();
    }
    let selected: HashSet<&str> = selected.iter().map(String::as_str).collect();
    messages
        .iter()
        .filter(|m| selected.contains(m.id.as_str()))
        .collect()
}

/// Quote a CSV field when it contains a comma, quote, or line break.
pub fn escape_csv(field: &str) -> String {
    if field.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render messages as CSV. Rows are separated by `\n`.
pub fn to_csv<'a, I>(messages: I) -> String
where
    I: IntoIterator<Item = &'a ScoredMessage>,
{
    let mut lines = vec![CSV_HEADER.to_string()];
    for m in messages {
        lines.push(
            [
                escape_csv(&m.text),
                escape_csv(&m.author),
                escape_csv(&m.channel),
                escape_csv(&m.timestamp),
                m.relevance_score.to_string(),
            ]
            .join(","),
        );
    }
    lines.join("\n")
}

/// Render an export document as pretty JSON.
pub fn to_json(data: &ExportData) -> Result<String> {
    serde_json::to_string_pretty(data).context("Failed to serialize export")
}

/// Parse a JSON export produced by `to_json`.
pub fn from_json(json: &str) -> Result<ExportData> {
    serde_json::from_str(json).context("Failed to parse export JSON")
}

/// Write an export to disk, creating parent directories as needed.
pub fn write_export(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
