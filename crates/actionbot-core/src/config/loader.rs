//! Config loader — reads `~/.actionbot/config.json`, then merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.actionbot/config.json`
//! 3. Environment variables (override JSON)
//!
//! The environment is read exactly once, here. Tools receive the resulting
//! `Config` values at construction and never consult the process environment.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Suffix identifying env vars that seed the prompt store.
const PROMPT_VAR_SUFFIX: &str = "SYSTEM_PROMPT";

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the given (or default) path + process env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    let config = load_config_from_path(&config_path);
    apply_env_overrides(config, std::env::vars())
}

/// Load config from a specific file path, without env overrides.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str::<Config>(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            Config::default()
        }
    }
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Supported variables:
/// - `GITHUB_TOKEN` → `github.token`
/// - `PAT_TOKEN` → `github.gist_token`
/// - `ACTIONBOT_GITHUB__API_BASE` → `github.api_base`
/// - `ACTIONBOT_GITHUB__TIMEOUT_SECS` → `github.timeout_secs`
/// - `ACTIONBOT_TOOLS` (or legacy `STRANDS_TOOLS`) → `tools.allow`
/// - `GITHUB_REPOSITORY`, `GITHUB_EVENT_NAME`, `GITHUB_ACTOR` → `event`
/// - `*SYSTEM_PROMPT` → `prompts`
pub fn apply_env_overrides<I>(mut config: Config, vars: I) -> Config
where
    I: IntoIterator<Item = (String, String)>,
{
    let env: HashMap<String, String> = vars.into_iter().collect();
    let get = |key: &str| env.get(key).filter(|v| !v.is_empty()).cloned();

    // GitHub
    if let Some(val) = get("GITHUB_TOKEN") {
        config.github.token = val;
    }
    if let Some(val) = get("PAT_TOKEN") {
        config.github.gist_token = val;
    }
    if let Some(val) = get("ACTIONBOT_GITHUB__API_BASE") {
        config.github.api_base = val.trim_end_matches('/').to_string();
    }
    if let Some(val) = get("ACTIONBOT_GITHUB__TIMEOUT_SECS") {
        match val.parse::<u64>() {
            Ok(n) => config.github.timeout_secs = n,
            Err(_) => warn!(value = %val, "ignoring invalid ACTIONBOT_GITHUB__TIMEOUT_SECS"),
        }
    }

    // Tools
    if let Some(val) = get("ACTIONBOT_TOOLS").or_else(|| get("STRANDS_TOOLS")) {
        config.tools.allow = parse_allow_list(&val);
    }

    // CI event
    if let Some(val) = get("GITHUB_REPOSITORY") {
        config.event.repository = val;
    }
    if let Some(val) = get("GITHUB_EVENT_NAME") {
        config.event.event_name = val;
    }
    if let Some(val) = get("GITHUB_ACTOR") {
        config.event.actor = val;
    }

    // Prompts
    for (key, val) in &env {
        if key.ends_with(PROMPT_VAR_SUFFIX) && !val.is_empty() {
            config.prompts.insert(key.clone(), val.clone());
        }
    }

    config
}

/// Parse a tool allow-list.
///
/// Accepts a JSON array of names or a comma-separated list. `ALL`, an empty
/// string, or a list with no usable names yields `None` (every tool enabled).
pub fn parse_allow_list(raw: &str) -> Option<Vec<String>> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "ALL" {
        return None;
    }

    if let Ok(serde_json::Value::Array(items)) = serde_json::from_str::<serde_json::Value>(raw) {
        let names: Vec<String> = items
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        return Some(names);
    }

    let names: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if names.is_empty() {
        warn!("Tool allow-list is not a JSON array or comma-separated list; enabling all tools");
        return None;
    }
    Some(names)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
