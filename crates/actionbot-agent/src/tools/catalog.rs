//! Tool catalogue — every tool this crate can expose, and the allow-list
//! filter the runner applies once at startup.

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use actionbot_core::config::Config;
use actionbot_github::GithubClient;

use super::base::Tool;
use super::gist::GistTool;
use super::registry::ToolRegistry;
use super::subagent::CreateSubagentTool;
use super::system_prompt::SystemPromptTool;

/// A tool known at compile time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ToolKind {
    CreateSubagent,
    SystemPrompt,
    Gist,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [ToolKind::CreateSubagent, ToolKind::SystemPrompt, ToolKind::Gist];

    /// The name the agent calls the tool by.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::CreateSubagent => "create_subagent",
            ToolKind::SystemPrompt => "system_prompt",
            ToolKind::Gist => "gist",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    fn build(self, config: &Config) -> anyhow::Result<Arc<dyn Tool>> {
        let github = &config.github;
        Ok(match self {
            ToolKind::CreateSubagent => {
                let client = GithubClient::from_config(github)
                    .context("building GitHub client for create_subagent")?;
                Arc::new(CreateSubagentTool::with_host(Arc::new(client)))
            }
            ToolKind::SystemPrompt => {
                let client = GithubClient::from_config(github)
                    .context("building GitHub client for system_prompt")?;
                Arc::new(SystemPromptTool::new(
                    client,
                    config.prompts.clone(),
                    config.event.clone(),
                ))
            }
            ToolKind::Gist => {
                let client =
                    GithubClient::for_gists(github).context("building GitHub client for gist")?;
                Arc::new(GistTool::new(client))
            }
        })
    }
}

/// Outcome of matching an allow-list against the catalogue.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolSelection {
    /// Enabled tools, in catalogue order.
    pub enabled: Vec<ToolKind>,
    /// Requested names that match no tool.
    pub unknown: Vec<String>,
}

/// Intersect the allow-list with the catalogue.
///
/// `None` or an empty list enables every tool. Unknown names are reported
/// and logged, never fatal.
pub fn resolve_allow_list(allow: Option<&[String]>) -> ToolSelection {
    let requested = match allow {
        None => {
            return ToolSelection {
                enabled: ToolKind::ALL.to_vec(),
                unknown: Vec::new(),
            }
        }
        Some([]) => {
            warn!("Tool allow-list is empty; enabling all tools");
            return ToolSelection {
                enabled: ToolKind::ALL.to_vec(),
                unknown: Vec::new(),
            };
        }
        Some(names) => names,
    };

    let mut enabled = BTreeSet::new();
    let mut unknown = Vec::new();
    for name in requested {
        match ToolKind::from_name(name) {
            Some(kind) => {
                enabled.insert(kind);
            }
            None => {
                warn!(tool = %name, "unknown tool in allow-list; skipping");
                if !unknown.contains(name) {
                    unknown.push(name.clone());
                }
            }
        }
    }

    ToolSelection {
        enabled: enabled.into_iter().collect(),
        unknown,
    }
}

/// Build the registry of enabled tools from configuration.
pub fn build_registry(config: &Config) -> anyhow::Result<(ToolRegistry, ToolSelection)> {
    let selection = resolve_allow_list(config.tools.allow.as_deref());

    let mut registry = ToolRegistry::default();
    for &kind in &selection.enabled {
        registry.enable(kind, kind.build(config)?);
    }

    info!(
        enabled = ?registry.tool_names(),
        unknown = selection.unknown.len(),
        "tool registry ready"
    );
    Ok((registry, selection))
}
