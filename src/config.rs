use std::env;
use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Default Slack Web API base URL.
pub const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api";

/// Which language-model backend scores relevance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringProvider {
    /// OpenAI chat completions: bearer auth
    OpenAi,
    /// Anthropic messages: x-api-key + anthropic-version headers
    Anthropic,
    /// Google Gemini generateContent: key in the query string
    Google,
}

impl ScoringProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringProvider::OpenAi => "openai",
            ScoringProvider::Anthropic => "anthropic",
            ScoringProvider::Google => "google",
        }
    }

    /// Model used when SCORING_MODEL is unset.
    pub fn default_model(&self) -> &'static str {
        match self {
            ScoringProvider::OpenAi => "gpt-4",
            ScoringProvider::Anthropic => "claude-3-sonnet-20240229",
            ScoringProvider::Google => "gemini-pro",
        }
    }

    /// Base URL of the provider's public API.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ScoringProvider::OpenAi => "https://api.openai.com/v1",
            ScoringProvider::Anthropic => "https://api.anthropic.com/v1",
            ScoringProvider::Google => "https://generativelanguage.googleapis.com/v1beta",
        }
    }
}

impl FromStr for ScoringProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ScoringProvider::OpenAi),
            "anthropic" => Ok(ScoringProvider::Anthropic),
            "google" | "gemini" => Ok(ScoringProvider::Google),
            other => anyhow::bail!(
                "Unknown scoring provider '{other}'. Expected one of: openai, anthropic, google"
            ),
        }
    }
}

impl fmt::Display for ScoringProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How requests reach the Slack Web API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMode {
    /// Direct calls with `Authorization: Bearer <token>`.
    Bearer,
    /// Calls routed through a relay: the full endpoint URL is appended to
    /// `prefix` and the token travels in `X-Slack-Token`.
    Proxy { prefix: String },
}

/// Everything the Slack client needs. Owned by the caller, passed by value.
#[derive(Clone)]
pub struct SlackConfig {
    pub token: String,
    pub api_url: String,
    pub auth_mode: AuthMode,
}

impl fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("auth_mode", &self.auth_mode)
            .finish()
    }
}

/// Everything the scoring client needs. Owned by the caller, passed by value.
#[derive(Clone)]
pub struct ScoringConfig {
    pub provider: ScoringProvider,
    pub api_key: String,
    pub model: String,
    /// Overrides `provider.default_base_url()` (relays, tests).
    pub base_url: Option<String>,
}

impl ScoringConfig {
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
            .trim_end_matches('/')
    }
}

impl fmt::Debug for ScoringConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoringConfig")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    pub slack: SlackConfig,
    pub scoring: ScoringConfig,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = match get("SCORING_PROVIDER") {
            Some(raw) => raw.parse::<ScoringProvider>()?,
            None => ScoringProvider::OpenAi,
        };

        let auth_mode = match get("SLACK_PROXY_URL") {
            Some(prefix) => AuthMode::Proxy { prefix },
            None => AuthMode::Bearer,
        };

        Ok(Self {
            slack: SlackConfig {
                token: get("SLACK_TOKEN").unwrap_or_default(),
                api_url: get("SLACK_API_URL")
                    .unwrap_or_else(|| DEFAULT_SLACK_API_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                auth_mode,
            },
            scoring: ScoringConfig {
                provider,
                api_key: get("SCORING_API_KEY").unwrap_or_default(),
                model: get("SCORING_MODEL")
                    .unwrap_or_else(|| provider.default_model().to_string()),
                base_url: get("SCORING_API_URL"),
            },
        })
    }

    /// Check that the Slack token is configured.
    pub fn require_slack(&self) -> Result<()> {
        if self.slack.token.is_empty() {
            anyhow::bail!(
                "SLACK_TOKEN not set. Add it to your .env file.\n\
                 The token needs the search:read and chat:write scopes."
            );
        }
        Ok(())
    }

    /// Check that the scoring API key is configured.
    pub fn require_scoring(&self) -> Result<()> {
        if self.scoring.api_key.is_empty() {
            anyhow::bail!(
                "SCORING_API_KEY not set. Add the {} API key to your .env file.",
                self.scoring.provider
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.slack.api_url, DEFAULT_SLACK_API_URL);
        assert_eq!(config.slack.auth_mode, AuthMode::Bearer);
        assert_eq!(config.scoring.provider, ScoringProvider::OpenAi);
        assert_eq!(config.scoring.model, "gpt-4");
        assert!(config.require_slack().is_err());
        assert!(config.require_scoring().is_err());
    }

    #[test]
    fn provider_selects_default_model() {
        let config = Config::from_lookup(lookup(&[("SCORING_PROVIDER", "anthropic")])).unwrap();
        assert_eq!(config.scoring.provider, ScoringProvider::Anthropic);
        assert_eq!(config.scoring.model, "claude-3-sonnet-20240229");
    }

    #[test]
    fn proxy_url_switches_auth_mode() {
        let config = Config::from_lookup(lookup(&[
            ("SLACK_TOKEN", "xoxp-1"),
            ("SLACK_PROXY_URL", "http://localhost:8080/"),
        ]))
        .unwrap();
        assert_eq!(
            config.slack.auth_mode,
            AuthMode::Proxy {
                prefix: "http://localhost:8080/".to_string()
            }
        );
        assert!(config.require_slack().is_ok());
    }

    #[test]
    fn unknown_provider_is_rejected() {
        assert!(Config::from_lookup(lookup(&[("SCORING_PROVIDER", "mistral")])).is_err());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = Config::from_lookup(lookup(&[
            ("SLACK_TOKEN", "xoxp-secret"),
            ("SCORING_API_KEY", "sk-secret"),
        ]))
        .unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("xoxp-secret"));
        assert!(!rendered.contains("sk-secret"));
    }
}
