// Credential status: checks the Slack token and the scoring key.

use anyhow::Result;
use colored::Colorize;

use crate::config::Config;
use crate::slack::client::SlackClient;

/// Minimum plausible scoring key length. Every supported provider issues
/// keys well beyond this.
const MIN_SCORING_KEY_LEN: usize = 20;

/// Per-credential validation result. `None` means not configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationStatus {
    pub slack: Option<bool>,
    pub scoring: Option<bool>,
}

impl ValidationStatus {
    pub fn all_valid(&self) -> bool {
        self.slack == Some(true) && self.scoring == Some(true)
    }
}

/// Cheap offline sanity check for a scoring key. No request is made: a
/// scoring call costs tokens.
pub fn validate_scoring_key(key: &str) -> bool {
    key.trim().chars().count() > MIN_SCORING_KEY_LEN
}

/// Validate both credentials.
pub async fn validate(config: &Config) -> Result<ValidationStatus> {
    let slack = if config.slack.token.is_empty() {
        None
    } else {
        let client = SlackClient::new(config.slack.clone())?;
        Some(client.validate_token().await)
    };

    let scoring = if config.scoring.api_key.is_empty() {
        None
    } else {
        Some(validate_scoring_key(&config.scoring.api_key))
    };

    Ok(ValidationStatus { slack, scoring })
}

/// Display a validation report to the terminal.
pub fn show(config: &Config, status: &ValidationStatus) {
    println!(
        "Slack token:  {}",
        describe(status.slack, "valid", "rejected by auth.test")
    );
    if let crate::config::AuthMode::Proxy { prefix } = &config.slack.auth_mode {
        println!("  via proxy {prefix}");
    }
    println!(
        "Scoring key:  {} ({}, model {})",
        describe(status.scoring, "looks valid", "too short to be a real key"),
        config.scoring.provider,
        config.scoring.model,
    );
}

fn describe(result: Option<bool>, ok: &str, bad: &str) -> String {
    match result {
        Some(true) => ok.green().to_string(),
        Some(false) => bad.red().to_string(),
        None => "not configured".dimmed().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_keys_fail_sanity_check() {
        assert!(!validate_scoring_key(""));
        assert!(!validate_scoring_key("sk-12345"));
        assert!(!validate_scoring_key("abcdefghijklmnopqrst"));
        assert!(validate_scoring_key("sk-abcdefghijklmnopqrstuvwxyz"));
    }

    #[test]
    fn all_valid_requires_both() {
        let status = ValidationStatus {
            slack: Some(true),
            scoring: None,
        };
        assert!(!status.all_valid());
    }
}
