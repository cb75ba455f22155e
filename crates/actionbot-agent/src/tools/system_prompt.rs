//! System prompt tool — view and adapt the agent's system prompt at runtime,
//! optionally persisting it to a repository Actions variable.
//!
//! Prompts live in an in-memory store keyed by variable name, seeded from
//! configuration at startup. The process environment is never touched.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use actionbot_core::config::EventContext;
use actionbot_core::types::ToolResult;
use actionbot_core::ToolError;
use actionbot_github::GithubClient;

use super::base::{action_param, optional_string, Tool};

const VALID_ACTIONS: &[&str] = &["view", "update", "add_context", "reset", "get_github_context"];

/// Variable name used when the caller gives none.
pub const DEFAULT_VARIABLE: &str = "SYSTEM_PROMPT";

/// Manages named system prompts.
pub struct SystemPromptTool {
    client: GithubClient,
    prompts: RwLock<HashMap<String, String>>,
    event: EventContext,
}

impl SystemPromptTool {
    /// `prompts` seeds the store (usually every `*SYSTEM_PROMPT` variable).
    pub fn new(client: GithubClient, prompts: HashMap<String, String>, event: EventContext) -> Self {
        Self {
            client,
            prompts: RwLock::new(prompts),
            event,
        }
    }

    /// Current value: local store first, then the repository variable when
    /// the local value is empty. A fetched non-empty value is cached.
    async fn current(&self, repository: Option<&str>, name: &str) -> String {
        let local = self.prompts.read().await.get(name).cloned().unwrap_or_default();
        if !local.is_empty() {
            return local;
        }

        let Some(repository) = repository else {
            return String::new();
        };
        if !self.client.has_token() {
            return String::new();
        }

        match self.client.get_variable(repository, name).await {
            Ok(var) => {
                if !var.value.is_empty() {
                    self.prompts
                        .write()
                        .await
                        .insert(name.to_string(), var.value.clone());
                }
                var.value
            }
            Err(e) => {
                warn!(repository = %repository, variable = %name, error = %e, "could not fetch prompt variable");
                String::new()
            }
        }
    }

    async fn set_local(&self, name: &str, value: String) {
        self.prompts.write().await.insert(name.to_string(), value);
    }

    /// Write `value` to the repository variable and build the combined
    /// result. `local` is the message describing the in-memory change.
    async fn persist(
        &self,
        local: String,
        repository: &str,
        name: &str,
        value: &str,
        verb: &str,
    ) -> ToolResult {
        if !self.client.has_token() {
            let err = ToolError::Auth("update repository variable".into());
            return ToolResult::error_blocks([local, format!("Error: {err}")]);
        }

        match self.client.update_variable(repository, name, value).await {
            Ok(()) => ToolResult::success([
                local,
                format!("GitHub repository variable {verb}: Variable {name} updated successfully"),
            ]),
            Err(e) => {
                warn!(repository = %repository, variable = %name, error = %e, "prompt variable update failed");
                ToolResult::error_blocks([
                    local,
                    format!("GitHub repository variable {verb} failed: Failed to update variable: {e}"),
                ])
            }
        }
    }

    async fn view(&self, repository: Option<&str>, name: &str) -> ToolResult {
        let local_empty = self
            .prompts
            .read()
            .await
            .get(name)
            .map_or(true, |v| v.is_empty());
        let prompt = self.current(repository, name).await;

        let source = match repository {
            Some(repo) if local_empty => format!("GitHub repository {repo}"),
            _ => "local environment".to_string(),
        };
        ToolResult::success([format!(
            "Current system prompt from {name} (from {source}):\n\n{prompt}"
        )])
    }

    async fn update(&self, repository: Option<&str>, name: &str, prompt: Option<String>) -> ToolResult {
        let Some(prompt) = prompt.filter(|p| !p.is_empty()) else {
            return error_result(ToolError::missing("prompt", "update"));
        };

        self.set_local(name, prompt.clone()).await;
        let local = format!("System prompt updated successfully in memory ({name})");
        match repository {
            Some(repo) => self.persist(local, repo, name, &prompt, "updated").await,
            None => ToolResult::success([local]),
        }
    }

    async fn add_context(
        &self,
        repository: Option<&str>,
        name: &str,
        context: Option<String>,
    ) -> ToolResult {
        let Some(context) = context.filter(|c| !c.is_empty()) else {
            return error_result(ToolError::missing("context", "add_context"));
        };

        let current = self.current(repository, name).await;
        let combined = if current.is_empty() {
            context
        } else {
            format!("{current}\n\n{context}")
        };
        self.set_local(name, combined.clone()).await;

        match repository {
            Some(repo) => {
                let local = format!("Context added to system prompt successfully in memory ({name})");
                self.persist(local, repo, name, &combined, "updated").await
            }
            None => ToolResult::success([format!(
                "Context added to system prompt successfully ({name})"
            )]),
        }
    }

    async fn reset(&self, repository: Option<&str>, name: &str) -> ToolResult {
        self.prompts.write().await.remove(name);

        match repository {
            Some(repo) => {
                let local = format!("System prompt reset to default in memory ({name})");
                self.persist(local, repo, name, "", "reset").await
            }
            None => ToolResult::success([format!("System prompt reset to default ({name})")]),
        }
    }
}

fn error_result(err: ToolError) -> ToolResult {
    ToolResult::error(format!("Error: {err}"))
}

#[async_trait]
impl Tool for SystemPromptTool {
    fn name(&self) -> &str {
        "system_prompt"
    }

    fn description(&self) -> &str {
        "View or change the agent's system prompt. Changes apply in memory and, \
         when a repository is given, are saved to that repository's Actions variable."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": VALID_ACTIONS,
                    "description": "Action to perform"
                },
                "prompt": {
                    "type": "string",
                    "description": "New system prompt (update)"
                },
                "context": {
                    "type": "string",
                    "description": "Text appended to the prompt (add_context)"
                },
                "repository": {
                    "type": "string",
                    "description": "owner/repo whose Actions variable should be read or written"
                },
                "variable_name": {
                    "type": "string",
                    "description": "Variable holding the prompt (default: SYSTEM_PROMPT)"
                }
            },
            "required": ["action"]
        })
    }

    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<ToolResult> {
        let action = action_param(&params).unwrap_or_default();
        let repository = optional_string(&params, "repository").filter(|r| !r.is_empty());
        let repository = repository.as_deref();
        let name = optional_string(&params, "variable_name")
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_VARIABLE.to_string());

        debug!(action = %action, variable = %name, "system_prompt");

        Ok(match action.as_str() {
            "view" => self.view(repository, &name).await,
            "update" => {
                self.update(repository, &name, optional_string(&params, "prompt"))
                    .await
            }
            "add_context" => {
                self.add_context(repository, &name, optional_string(&params, "context"))
                    .await
            }
            "reset" => self.reset(repository, &name).await,
            "get_github_context" => ToolResult::success([format!(
                "GitHub Event Context:\n\n{}",
                self.event.describe()
            )]),
            other => error_result(ToolError::unknown_action(other, VALID_ACTIONS)),
        })
    }
}
