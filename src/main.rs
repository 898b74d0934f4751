use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use slacksift::config::Config;
use slacksift::models::{ScoredMessage, SearchCriteria};
use slacksift::output::{export, terminal};
use slacksift::pipeline::{delete::delete_selected, search};
use slacksift::scoring::client::ScoringClient;
use slacksift::slack::client::SlackClient;
use slacksift::slack::error::MessagingError;

/// slacksift: find Slack messages by meaning, then export or delete them.
///
/// Searches your workspace, asks a language model how relevant each match
/// is to your prompt, and ranks the results.
#[derive(Parser)]
#[command(name = "slacksift", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the Slack token and the scoring API key
    Validate,

    /// Search, score and rank messages
    Search {
        /// What to look for (empty searches everything)
        #[arg(default_value = "")]
        prompt: String,

        /// Only search this channel (e.g. #general)
        #[arg(long)]
        channel: Option<String>,

        /// Only search messages from this user (e.g. @ana)
        #[arg(long)]
        user: Option<String>,

        /// Only messages after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Only messages before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Select a result by id for export/delete (repeatable)
        #[arg(long = "select", value_name = "ID")]
        select: Vec<String>,

        /// Select every result scoring at least this much
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        min_score: Option<u8>,

        /// Export the selection (or everything) as CSV
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,

        /// Export the selection (or everything) as JSON
        #[arg(long, value_name = "PATH")]
        json: Option<PathBuf>,

        /// Delete the selected messages
        #[arg(long)]
        delete: bool,

        /// Confirm deletion (deleted messages cannot be recovered)
        #[arg(long, requires = "delete")]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("slacksift=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate => {
            let config = Config::load()?;
            let status = slacksift::status::validate(&config).await?;
            slacksift::status::show(&config, &status);
            if !status.all_valid() {
                println!(
                    "\n{}",
                    "Set SLACK_TOKEN and SCORING_API_KEY in your .env file.".dimmed()
                );
            }
        }

        Commands::Search {
            prompt,
            channel,
            user,
            from,
            to,
            select,
            min_score,
            csv,
            json,
            delete,
            yes,
        } => {
            let config = Config::load()?;
            config.require_slack()?;
            config.require_scoring()?;

            if delete && !yes {
                anyhow::bail!(
                    "Deleting messages cannot be undone. Re-run with --yes to confirm."
                );
            }

            let criteria = SearchCriteria {
                prompt,
                channel,
                user,
                date_from: from,
                date_to: to,
            };

            let slack = SlackClient::new(config.slack.clone())?;
            let scorer = ScoringClient::new(config.scoring.clone())?;

            info!(provider = %scorer.provider(), "Searching Slack");
            println!("Searching Slack...");

            let outcome = match search::run(&slack, &scorer, &criteria).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    print_messaging_hint(&e);
                    return Err(e.into());
                }
            };

            if let search::SearchOutcome::Ranked {
                scoring_failures, ..
            } = &outcome
            {
                if *scoring_failures > 0 {
                    println!(
                        "  {} {} messages could not be scored and were ranked as 0",
                        "Warning:".yellow(),
                        scoring_failures
                    );
                }
            }

            let mut messages = outcome.into_messages();
            terminal::display_ranked_messages(&messages);
            if messages.is_empty() {
                return Ok(());
            }

            let selected = selection(&messages, &select, min_score);

            if let Some(path) = csv {
                let rows = export::select_for_export(&messages, &selected);
                export::write_export(&path, &export::to_csv(rows))?;
                println!("CSV saved to: {}", path.display());
            }

            if let Some(path) = json {
                let rows = export::select_for_export(&messages, &selected);
                let data = export::ExportData::new(
                    rows.into_iter().cloned().collect(),
                    criteria.clone(),
                );
                export::write_export(&path, &export::to_json(&data)?)?;
                println!("JSON saved to: {}", path.display());
            }

            if delete {
                if selected.is_empty() {
                    anyhow::bail!(
                        "No messages selected for deletion. Use --select or --min-score."
                    );
                }

                println!("Deleting {} messages...", selected.len());
                let summary = delete_selected(&slack, &messages, &selected).await;
                terminal::display_delete_summary(&summary);

                messages.retain(|m| !summary.deleted_ids.contains(&m.id));
                println!("  {} messages remain in the result set", messages.len());
            }
        }
    }

    Ok(())
}

/// Explicit ids first (in the order given), then any results at or above
/// `min_score` in rank order.
fn selection(messages: &[ScoredMessage], ids: &[String], min_score: Option<u8>) -> Vec<String> {
    let mut selected: Vec<String> = Vec::new();
    for id in ids {
        if !selected.contains(id) {
            selected.push(id.clone());
        }
    }
    if let Some(min) = min_score {
        for m in messages.iter().filter(|m| m.relevance_score >= min) {
            if !selected.contains(&m.id) {
                selected.push(m.id.clone());
            }
        }
    }
    selected
}

/// Point the user at the fix for failures that have one.
fn print_messaging_hint(error: &MessagingError) {
    if error.is_cross_origin() {
        println!(
            "\n{}",
            "Slack blocked the request with a cross-origin (CORS) policy.".yellow()
        );
        println!("Route requests through a relay by adding to your .env file:");
        println!("  SLACK_PROXY_URL=https://your-cors-relay.example/");
    } else if matches!(error, MessagingError::SearchFailure(reason) if reason == "invalid_auth" || reason == "not_authed")
    {
        println!(
            "\n{}",
            "Invalid API token. Run `slacksift validate` to check your configuration.".yellow()
        );
    }
}
