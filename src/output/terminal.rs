// Colored terminal output for ranked search results.
//
// main.rs delegates all result rendering here.

use colored::{Color, Colorize};

use crate::models::{RelevanceTier, ScoredMessage};
use crate::pipeline::delete::BulkDeleteSummary;

/// Display the ranked result list.
pub fn display_ranked_messages(messages: &[ScoredMessage]) {
    if messages.is_empty() {
        println!("No messages found.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Ranked Messages ({} results) ===", messages.len()).bold()
    );
    println!();

    println!(
        "  {:>4}  {:>5}  {:<18} {:<20} {:<19}  {}",
        "Rank".dimmed(),
        "Score".dimmed(),
        "User".dimmed(),
        "Channel".dimmed(),
        "Time".dimmed(),
        "Id".dimmed(),
    );
    println!("  {}", "-".repeat(90).dimmed());

    for (i, message) in messages.iter().enumerate() {
        println!(
            "  {:>4}. {:>5}  {:<18} {:<20} {:<19}  {}",
            i + 1,
            colorize_score(message.relevance_score),
            super::truncate_chars(&message.author, 15),
            super::truncate_chars(&message.channel, 17),
            message.timestamp,
            message.id.dimmed(),
        );
        let preview = super::truncate_chars(&super::single_line(&message.text), 110);
        println!("        {}", preview.dimmed());
    }

    println!();

    for line in tier_summary(messages) {
        println!("  {line}");
    }
}

/// Display the outcome of a bulk delete.
pub fn display_delete_summary(summary: &BulkDeleteSummary) {
    println!(
        "\n{}",
        format!("Successfully deleted {} messages", summary.deleted()).bold()
    );
    for (id, error) in &summary.failed {
        println!("  {} {}: {}", "failed".red(), id, error);
    }
    for id in &summary.not_found {
        println!("  {} {} (not in results)", "skipped".yellow(), id);
    }
}

fn count_tier(messages: &[ScoredMessage], tier: RelevanceTier) -> usize {
    messages.iter().filter(|m| m.tier() == tier).count()
}

/// Colorize a score by its relevance tier.
fn colorize_score(score: u8) -> colored::ColoredString {
    let tier = RelevanceTier::from_score(score);
    let text = format!("{score}%");
    let text = match score_color(tier) {
        Some(color) => text.color(color),
        None => text.dimmed(),
    };
    if tier == RelevanceTier::High {
        text.bold()
    } else {
        text
    }
}

/// Foreground color for a tier. Low scores are dimmed rather than colored.
fn score_color(tier: RelevanceTier) -> Option<Color> {
    match tier {
        RelevanceTier::High => Some(Color::Green),
        RelevanceTier::Medium => Some(Color::Yellow),
        RelevanceTier::Low => None,
    }
}

/// Plain-text tier counts printed under the list, most relevant first.
fn tier_summary(messages: &[ScoredMessage]) -> Vec<String> {
    let mut lines = Vec::new();
    let high = count_tier(messages, RelevanceTier::High);
    if high > 0 {
        lines.push(format!("{high} highly relevant"));
    }
    let medium = count_tier(messages, RelevanceTier::Medium);
    if medium > 0 {
        lines.push(format!("{medium} moderately relevant"));
    }
    lines
}
