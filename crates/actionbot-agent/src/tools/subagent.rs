//! Sub-agent tool — `create_subagent`.
//!
//! Thin LLM-facing wrapper over [`WorkflowOrchestrator`]: parses the
//! arguments, routes the action, and renders the typed outcome into a
//! `ToolResult`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};

use actionbot_core::types::ToolResult;
use actionbot_core::ToolError;
use actionbot_github::types::format_timestamp;
use actionbot_github::WorkflowHost;

use super::base::{action_param, optional_id, optional_integer, optional_text, Tool};
use crate::orchestrator::{
    DispatchReceipt, RunListing, RunReport, SubagentSpec, WorkflowOrchestrator, DEFAULT_PER_PAGE,
};

const VALID_ACTIONS: &[&str] = &["create", "status", "list"];

const DEFAULT_BRANCH: &str = "main";

/// Dispatches and inspects sub-agents running as CI workflows.
pub struct CreateSubagentTool {
    orchestrator: WorkflowOrchestrator,
}

impl CreateSubagentTool {
    pub fn new(orchestrator: WorkflowOrchestrator) -> Self {
        Self { orchestrator }
    }

    /// Tool over a host with the default log extractors.
    pub fn with_host(host: Arc<dyn WorkflowHost>) -> Self {
        Self::new(WorkflowOrchestrator::new(host))
    }

    async fn run(&self, action: &str, params: &HashMap<String, Value>) -> Result<ToolResult, ToolError> {
        let repository = optional_text(params, "repository")?.unwrap_or_default();
        let workflow_id = optional_text(params, "workflow_id")?.unwrap_or_default();

        match action {
            "create" => {
                let spec = SubagentSpec {
                    repository,
                    workflow_id,
                    task: optional_text(params, "task")?.unwrap_or_default(),
                    context: optional_text(params, "context")?,
                    branch: optional_text(params, "branch")?
                        .unwrap_or_else(|| DEFAULT_BRANCH.into()),
                    system_prompt: optional_text(params, "system_prompt")?,
                    model: optional_text(params, "model")?,
                    provider: optional_text(params, "provider")?,
                    max_tokens: optional_integer(params, "max_tokens")?,
                    tools: optional_text(params, "tools")?,
                    agent_runner: optional_text(params, "agent_runner")?,
                };
                self.orchestrator
                    .create(spec)
                    .await
                    .map(|receipt| render_receipt(&receipt))
            }
            "status" => {
                let run_id = optional_id(params, "run_id");
                self.orchestrator
                    .status(&repository, &workflow_id, run_id.as_deref())
                    .await
                    .map(|report| render_report(&report))
            }
            "list" => {
                let per_page = optional_integer(params, "per_page")?
                    .map(|n| n.clamp(1, 100) as u32)
                    .unwrap_or(DEFAULT_PER_PAGE);
                self.orchestrator
                    .list(&repository, &workflow_id, per_page)
                    .await
                    .map(|listing| render_listing(&listing))
            }
            other => Err(ToolError::unknown_action(other, VALID_ACTIONS)),
        }
    }

    /// The credential check runs ahead of action routing, so even an
    /// unknown action reports a missing token first. Only an absent or
    /// `null` action means `create`.
    fn preflight(&self, params: &HashMap<String, Value>) -> Result<String, ToolError> {
        self.orchestrator.ensure_credentials()?;
        let action = action_param(params).unwrap_or_else(|| "create".into());
        if !VALID_ACTIONS.contains(&action.as_str()) {
            return Err(ToolError::unknown_action(&action, VALID_ACTIONS));
        }
        Ok(action)
    }
}

#[async_trait]
impl Tool for CreateSubagentTool {
    fn name(&self) -> &str {
        "create_subagent"
    }

    fn description(&self) -> &str {
        "Create and manage sub-agents running as GitHub Actions workflows. \
         'create' dispatches a workflow with a task, 'status' reports a run and \
         extracts agent events from its logs, 'list' shows recent runs."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": VALID_ACTIONS,
                    "description": "Action to perform (default: create)"
                },
                "repository": {
                    "type": "string",
                    "description": "Repository as owner/repo"
                },
                "workflow_id": {
                    "type": "string",
                    "description": "Workflow file name (e.g. agent.yml) or numeric id"
                },
                "task": {
                    "type": "string",
                    "description": "Task for the sub-agent (required for create)"
                },
                "context": {
                    "type": "string",
                    "description": "Extra context appended to the task"
                },
                "branch": {
                    "type": "string",
                    "description": "Git ref to run the workflow on (default: main)"
                },
                "system_prompt": { "type": "string", "description": "System prompt for the sub-agent" },
                "model": { "type": "string", "description": "Model id for the sub-agent" },
                "provider": { "type": "string", "description": "Model provider (e.g. bedrock, openai)" },
                "max_tokens": { "type": "integer", "description": "Token limit for the sub-agent" },
                "tools": { "type": "string", "description": "Comma-separated tool names for the sub-agent" },
                "agent_runner": { "type": "string", "description": "URL of a custom agent runner script" },
                "run_id": {
                    "type": ["string", "integer"],
                    "description": "Run id (required for status)"
                },
                "per_page": {
                    "type": "integer",
                    "description": "Runs to list (1-100, default 5)",
                    "minimum": 1,
                    "maximum": 100
                }
            },
            "required": ["repository", "workflow_id"]
        })
    }

    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<ToolResult> {
        let action = match self.preflight(&params) {
            Ok(action) => action,
            Err(e) => {
                debug!(error = %e, "create_subagent rejected");
                return Ok(ToolResult::error(format!("Error: {e}")));
            }
        };

        Ok(match self.run(&action, &params).await {
            Ok(result) => result,
            Err(e @ (ToolError::Auth(_) | ToolError::Validation(_) | ToolError::UnknownAction { .. })) => {
                ToolResult::error(format!("Error: {e}"))
            }
            Err(e) => {
                warn!(action = %action, error = %e, "sub-agent operation failed");
                ToolResult::error(failure_text(&action, &e))
            }
        })
    }
}

fn failure_text(action: &str, err: &ToolError) -> String {
    match action {
        "create" => format!("Failed to create sub-agent: {err}"),
        "status" => format!("Failed to check sub-agent status: {err}"),
        _ => format!("Failed to list sub-agent runs: {err}"),
    }
}

// ─────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────

fn render_receipt(receipt: &DispatchReceipt) -> ToolResult {
    let spec = &receipt.spec;
    let mut blocks = vec![
        format!("Sub-agent created successfully: {}", receipt.message),
        format!("Task delegated: {}", spec.task),
        format!("Repository: {}", spec.repository),
        format!("Workflow: {}", spec.workflow_id),
        format!("Branch: {}", spec.branch),
    ];

    let optional = [
        ("Model", spec.model.clone()),
        ("Provider", spec.provider.clone()),
        ("Max Tokens", spec.max_tokens.map(|n| n.to_string())),
        ("Tools", spec.tools.clone()),
        ("Agent Runner", spec.agent_runner.clone()),
    ];
    blocks.extend(
        optional
            .into_iter()
            .filter_map(|(label, value)| value.map(|v| format!("{label}: {v}"))),
    );

    blocks.push(
        "To check status, use the 'list' action to find the run ID, then use 'status' action."
            .into(),
    );
    ToolResult::success(blocks)
}

fn render_report(report: &RunReport) -> ToolResult {
    let run = &report.run;
    let mut status_text = format!("Status: {}", run.status.as_deref().unwrap_or("unknown"));
    if let Some(ref conclusion) = run.conclusion {
        status_text.push_str(&format!(", Conclusion: {conclusion}"));
    }

    let mut blocks = vec![
        format!("Sub-agent run status: {status_text}"),
        format!("Name: {}", run.name.as_deref().unwrap_or("N/A")),
        format!("Created: {}", format_timestamp(run.created_at.as_ref())),
        format!("Updated: {}", format_timestamp(run.updated_at.as_ref())),
        format!("Run URL: {}", run.html_url.as_deref().unwrap_or("N/A")),
    ];

    if let Some(ref digest) = report.logs {
        let prompts: Vec<&str> = digest.prompts().collect();
        if !prompts.is_empty() {
            blocks.push("Agent Tasks:".into());
            for (idx, prompt) in prompts.iter().enumerate() {
                blocks.push(format!("Task {}: {prompt}", idx + 1));
            }
        }
        for event in digest.event_texts() {
            blocks.push(format!("Event: {event}"));
        }
        blocks.push(format!("Run Logs (excerpt):\n```\n{}\n```", digest.excerpt));
    }

    ToolResult::success(blocks)
}

fn render_listing(listing: &RunListing) -> ToolResult {
    if listing.runs.is_empty() {
        return ToolResult::success(["No recent sub-agent runs found"]);
    }

    let mut blocks = vec![format!(
        "Recent sub-agent runs (showing {} of {}):",
        listing.runs.len(),
        listing.total_count
    )];

    for run in &listing.runs {
        blocks.push(format!(
            "Run ID: {}\nName: {}\nStatus: {}\nConclusion: {}\nCreated: {}\nUpdated: {}\nURL: {}\n",
            run.id,
            run.name.as_deref().unwrap_or("N/A"),
            run.status.as_deref().unwrap_or("unknown"),
            run.conclusion.as_deref().unwrap_or("N/A"),
            format_timestamp(run.created_at.as_ref()),
            format_timestamp(run.updated_at.as_ref()),
            run.html_url.as_deref().unwrap_or("N/A"),
        ));
    }

    blocks.push(
        "To check the status of a specific run, use: create_subagent(action=\"status\", \
         repository=\"owner/repo\", workflow_id=\"workflow.yml\", run_id=\"RUN_ID\")"
            .into(),
    );
    ToolResult::success(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use actionbot_github::GithubClient;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tool(base: &str, token: Option<&str>) -> CreateSubagentTool {
        let client = GithubClient::new(
            base,
            token.map(String::from),
            Duration::from_secs(5),
            "actionbot-test",
        )
        .unwrap();
        CreateSubagentTool::with_host(Arc::new(client))
    }

    fn args(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_create_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let result = tool(&server.uri(), None)
            .execute(args(json!({
                "repository": "acme/infra",
                "workflow_id": "agent.yml",
                "task": "rotate credentials"
            })))
            .await
            .unwrap();
        assert!(!result.is_success());
        assert_eq!(
            result.text(),
            "Error: GitHub token not available. Cannot create or manage sub-agents."
        );
    }

    #[tokio::test]
    async fn test_create_without_task_makes_no_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let result = tool(&server.uri(), Some("ghp_test"))
            .execute(args(json!({"repository": "acme/infra", "workflow_id": "agent.yml"})))
            .await
            .unwrap();
        assert!(!result.is_success());
        assert_eq!(
            result.text(),
            "Error: 'task' parameter is required for the create action"
        );
    }

    #[tokio::test]
    async fn test_create_dispatches_and_echoes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/acme/infra/actions/workflows/agent.yml/dispatches"))
            .and(body_json(json!({
                "ref": "main",
                "inputs": {
                    "task": "Task: rotate credentials\nContext: staging only",
                    "model": "gpt-4o",
                    "max_tokens": "2048"
                }
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let result = tool(&server.uri(), Some("ghp_test"))
            .execute(args(json!({
                "repository": "acme/infra",
                "workflow_id": "agent.yml",
                "task": "rotate credentials",
                "context": "staging only",
                "model": "gpt-4o",
                "max_tokens": 2048
            })))
            .await
            .unwrap();

        assert!(result.is_success());
        let texts: Vec<&str> = result.content.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(
            texts[0],
            "Sub-agent created successfully: Workflow agent.yml dispatched successfully"
        );
        assert!(texts.contains(&"Model: gpt-4o"));
        assert!(texts.contains(&"Max Tokens: 2048"));
        assert!(!texts.iter().any(|t| t.starts_with("Provider:")));
        assert!(texts.last().unwrap().contains("'list' action"));
    }

    #[tokio::test]
    async fn test_create_failure_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(422).set_body_string("Unexpected inputs provided"))
            .mount(&server)
            .await;

        let result = tool(&server.uri(), Some("ghp_test"))
            .execute(args(json!({
                "repository": "acme/infra",
                "workflow_id": "agent.yml",
                "task": "t"
            })))
            .await
            .unwrap();
        assert!(!result.is_success());
        assert!(result.text().starts_with("Failed to create sub-agent:"));
        assert!(result.text().contains("422 - Unexpected inputs provided"));
    }

    #[tokio::test]
    async fn test_status_without_run_id_makes_no_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = tool(&server.uri(), Some("ghp_test"))
            .execute(args(json!({
                "action": "status",
                "repository": "acme/infra",
                "workflow_id": "agent.yml"
            })))
            .await
            .unwrap();
        assert!(!result.is_success());
        assert!(result.text().contains("'run_id' parameter is required"));
    }

    #[tokio::test]
    async fn test_status_in_progress_never_fetches_logs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/infra/actions/runs/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 42,
                "name": "agent",
                "status": "in_progress",
                "conclusion": null,
                "html_url": "https://github.com/acme/infra/actions/runs/42",
                "created_at": "2024-05-01T12:00:00Z",
                "updated_at": "2024-05-01T12:01:00Z"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/infra/actions/runs/42/logs"))
            .respond_with(ResponseTemplate::new(302))
            .expect(0)
            .mount(&server)
            .await;

        let result = tool(&server.uri(), Some("ghp_test"))
            .execute(args(json!({
                "action": "status",
                "repository": "acme/infra",
                "workflow_id": "agent.yml",
                "run_id": 42
            })))
            .await
            .unwrap();
        assert!(result.is_success());
        assert_eq!(result.content[0].text, "Sub-agent run status: Status: in_progress");
        assert_eq!(result.content[2].text, "Created: 2024-05-01T12:00:00Z");
        assert_eq!(result.content.len(), 5);
    }

    #[tokio::test]
    async fn test_status_completed_renders_events_and_excerpt() {
        let server = MockServer::start().await;
        let logs = "Event: Summarize open issues\n+ python -c 'run()'\nfinished\n";
        Mock::given(method("GET"))
            .and(path("/repos/acme/infra/actions/runs/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 42,
                "name": "agent",
                "status": "completed",
                "conclusion": "success"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/infra/actions/runs/42/logs"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", format!("{}/blob/logs.txt", server.uri()).as_str()),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/blob/logs.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string(logs))
            .mount(&server)
            .await;

        let result = tool(&server.uri(), Some("ghp_test"))
            .execute(args(json!({
                "action": "status",
                "repository": "acme/infra",
                "workflow_id": "agent.yml",
                "run_id": "42"
            })))
            .await
            .unwrap();
        let texts: Vec<&str> = result.content.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts[0], "Sub-agent run status: Status: completed, Conclusion: success");
        assert!(texts.contains(&"Agent Tasks:"));
        assert!(texts.contains(&"Task 1: Summarize open issues"));
        assert!(texts.contains(&"Event: Summarize open issues"));
        assert_eq!(
            *texts.last().unwrap(),
            format!("Run Logs (excerpt):\n```\n{logs}\n```")
        );
    }

    #[tokio::test]
    async fn test_status_completed_log_failure_is_partial_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/infra/actions/runs/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 42,
                "status": "completed",
                "conclusion": "failure"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/infra/actions/runs/42/logs"))
            .respond_with(ResponseTemplate::new(410).set_body_string("Gone"))
            .expect(1)
            .mount(&server)
            .await;

        let result = tool(&server.uri(), Some("ghp_test"))
            .execute(args(json!({
                "action": "status",
                "repository": "acme/infra",
                "workflow_id": "agent.yml",
                "run_id": "42"
            })))
            .await
            .unwrap();
        assert!(result.is_success());
        assert_eq!(result.content.len(), 5);
        assert!(!result.text().contains("Run Logs"));
    }

    #[tokio::test]
    async fn test_list_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/infra/actions/workflows/agent.yml/runs"))
            .and(query_param("per_page", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_count": 0,
                "workflow_runs": []
            })))
            .mount(&server)
            .await;

        let result = tool(&server.uri(), Some("ghp_test"))
            .execute(args(json!({
                "action": "list",
                "repository": "acme/infra",
                "workflow_id": "agent.yml"
            })))
            .await
            .unwrap();
        assert!(result.is_success());
        assert_eq!(result.content.len(), 1);
        assert_eq!(result.text(), "No recent sub-agent runs found");
    }

    #[tokio::test]
    async fn test_list_runs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/infra/actions/workflows/agent.yml/runs"))
            .and(query_param("per_page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_count": 17,
                "workflow_runs": [
                    {"id": 2, "name": "agent", "status": "queued"},
                    {"id": 1, "name": "agent", "status": "completed", "conclusion": "success"}
                ]
            })))
            .mount(&server)
            .await;

        let result = tool(&server.uri(), Some("ghp_test"))
            .execute(args(json!({
                "action": "list",
                "repository": "acme/infra",
                "workflow_id": "agent.yml",
                "per_page": 2
            })))
            .await
            .unwrap();
        assert_eq!(result.content[0].text, "Recent sub-agent runs (showing 2 of 17):");
        assert!(result.content[1].text.starts_with("Run ID: 2\nName: agent\nStatus: queued\nConclusion: N/A"));
        assert_eq!(result.content.len(), 4);
    }

    #[tokio::test]
    async fn test_unknown_actions() {
        let t = tool("http://127.0.0.1:9", Some("ghp_test"));
        for action in ["", "  ", "crate"] {
            let result = t
                .execute(args(json!({
                    "action": action,
                    "repository": "acme/infra",
                    "workflow_id": "agent.yml"
                })))
                .await
                .unwrap();
            assert!(!result.is_success());
            assert!(result
                .text()
                .ends_with("Valid actions are create, status, list"));
        }
    }

    #[tokio::test]
    async fn test_non_string_action_never_dispatches() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let t = tool(&server.uri(), Some("ghp_test"));
        for action in [json!(7), json!(["create"]), json!({"name": "create"}), json!(false)] {
            let result = t
                .execute(args(json!({
                    "action": action,
                    "repository": "acme/infra",
                    "workflow_id": "agent.yml",
                    "task": "t"
                })))
                .await
                .unwrap();
            assert!(!result.is_success());
            assert!(result.text().starts_with("Error: Unknown action"));
        }
    }

    #[tokio::test]
    async fn test_null_action_means_create() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/acme/infra/actions/workflows/agent.yml/dispatches"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let result = tool(&server.uri(), Some("ghp_test"))
            .execute(args(json!({
                "action": null,
                "repository": "acme/infra",
                "workflow_id": "agent.yml",
                "task": "t"
            })))
            .await
            .unwrap();
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_create_coerces_loosely_typed_inputs() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/acme/infra/actions/workflows/agent.yml/dispatches"))
            .and(body_json(json!({
                "ref": "main",
                "inputs": {
                    "task": "Task: t",
                    "max_tokens": "4096",
                    "tools": "shell,editor"
                }
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(2)
            .mount(&server)
            .await;

        let t = tool(&server.uri(), Some("ghp_test"));
        for max_tokens in [json!("4096"), json!(4096.0)] {
            let result = t
                .execute(args(json!({
                    "repository": "acme/infra",
                    "workflow_id": "agent.yml",
                    "task": "t",
                    "max_tokens": max_tokens,
                    "tools": ["shell", "editor"]
                })))
                .await
                .unwrap();
            assert!(result.is_success(), "{}", result.text());
            assert!(result.content.iter().any(|b| b.text == "Max Tokens: 4096"));
        }
    }

    #[tokio::test]
    async fn test_create_rejects_unusable_max_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let result = tool(&server.uri(), Some("ghp_test"))
            .execute(args(json!({
                "repository": "acme/infra",
                "workflow_id": "agent.yml",
                "task": "t",
                "max_tokens": "plenty"
            })))
            .await
            .unwrap();
        assert!(!result.is_success());
        assert_eq!(
            result.text(),
            "Error: Parameter 'max_tokens' must be an integer (got \"plenty\")"
        );
    }

    #[tokio::test]
    async fn test_unknown_action_without_token_reports_auth() {
        let result = tool("http://127.0.0.1:9", None)
            .execute(args(json!({"action": "nope"})))
            .await
            .unwrap();
        assert!(result.text().contains("GitHub token not available"));
    }
}
