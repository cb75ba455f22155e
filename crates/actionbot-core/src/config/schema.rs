//! Configuration schema.
//!
//! Hierarchy: `Config` → `GithubConfig`, `ToolsConfig`, `EventContext`, plus
//! the seeded system prompts.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default GitHub REST API base.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Per-request timeout applied to every GitHub call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.actionbot/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub github: GithubConfig,
    pub tools: ToolsConfig,
    pub event: EventContext,
    /// System prompts keyed by variable name (e.g. `SYSTEM_PROMPT`).
    pub prompts: HashMap<String, String>,
}

// ─────────────────────────────────────────────
// GitHub
// ─────────────────────────────────────────────

/// Credentials and transport settings for the GitHub REST API.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GithubConfig {
    /// Token for workflow and variable calls (`GITHUB_TOKEN`).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub token: String,
    /// Token preferred by the gist tool (`PAT_TOKEN`); falls back to `token`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub gist_token: String,
    /// API base URL, without trailing slash.
    pub api_base: String,
    /// Timeout for every request, in seconds.
    pub timeout_secs: u64,
    /// User-Agent sent with every request (GitHub rejects requests without one).
    pub user_agent: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            gist_token: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("actionbot/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl GithubConfig {
    /// The workflow/variables token, if one is configured.
    pub fn token(&self) -> Option<String> {
        non_empty(&self.token)
    }

    /// The gist token: `gist_token` first, then `token`.
    pub fn gist_token(&self) -> Option<String> {
        non_empty(&self.gist_token).or_else(|| self.token())
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

// ─────────────────────────────────────────────
// Tools
// ─────────────────────────────────────────────

/// Tool selection for the runner.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolsConfig {
    /// Allow-list of tool names. `None` enables every tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow: Option<Vec<String>>,
}

// ─────────────────────────────────────────────
// CI event context
// ─────────────────────────────────────────────

/// The CI event that started this run (from `GITHUB_*` variables in Actions).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct EventContext {
    pub repository: String,
    pub event_name: String,
    pub actor: String,
}

impl EventContext {
    /// Render the non-empty fields, one per line.
    pub fn describe(&self) -> String {
        let mut lines = Vec::new();
        if !self.repository.is_empty() {
            lines.push(format!("Repository: {}", self.repository));
        }
        if !self.event_name.is_empty() {
            lines.push(format!("Event Type: {}", self.event_name));
        }
        if !self.actor.is_empty() {
            lines.push(format!("Actor: {}", self.actor));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.github.api_base, "https://api.github.com");
        assert_eq!(config.github.timeout_secs, 30);
        assert!(config.github.token().is_none());
        assert!(config.tools.allow.is_none());
    }

    #[test]
    fn test_gist_token_falls_back() {
        let mut gh = GithubConfig {
            token: "ghp_main".into(),
            ..Default::default()
        };
        assert_eq!(gh.gist_token().as_deref(), Some("ghp_main"));
        gh.gist_token = "ghp_pat".into();
        assert_eq!(gh.gist_token().as_deref(), Some("ghp_pat"));
    }

    #[test]
    fn test_event_context_describe() {
        let ctx = EventContext {
            repository: "acme/infra".into(),
            event_name: "issues".into(),
            actor: String::new(),
        };
        assert_eq!(ctx.describe(), "Repository: acme/infra\nEvent Type: issues");
    }

    #[test]
    fn test_token_not_serialized_when_empty() {
        let raw = serde_json::to_value(Config::default()).unwrap();
        assert!(raw["github"].get("token").is_none());
        assert!(raw["github"].get("apiBase").is_some());
    }
}
