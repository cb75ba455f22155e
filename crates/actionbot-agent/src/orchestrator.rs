//! Workflow Orchestrator — sub-agents as dispatched CI workflow runs.
//!
//! A sub-agent is one run of an agent workflow on the host (GitHub Actions).
//! The orchestrator can:
//! - **create**: dispatch the workflow with the task and model/tool settings;
//! - **status**: read a run's metadata and, once completed, mine its logs;
//! - **list**: show the most recent runs of the workflow.
//!
//! It never drives the run's lifecycle (`queued → in_progress → completed`);
//! it only triggers it and observes it. Every call is a single attempt.
//! Dispatch is fire-and-forget on GitHub: no run id comes back, so callers
//! find the run via `list` afterwards.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use actionbot_core::ToolError;
use actionbot_github::types::{DispatchRequest, WorkflowRun};
use actionbot_github::WorkflowHost;

use crate::log_extract::{default_extractors, log_excerpt, LogEventExtractor, LogExtractEvent};

/// Default number of runs returned by `list`.
pub const DEFAULT_PER_PAGE: u32 = 5;

/// GitHub's upper bound for `per_page`.
const MAX_PER_PAGE: u32 = 100;

/// What `Auth` errors say the caller could not do.
const AUTH_SCOPE: &str = "create or manage sub-agents";

// ─────────────────────────────────────────────
// Inputs / outputs
// ─────────────────────────────────────────────

/// Everything needed to spawn one sub-agent.
#[derive(Clone, Debug, Default)]
pub struct SubagentSpec {
    pub repository: String,
    pub workflow_id: String,
    pub task: String,
    pub context: Option<String>,
    pub branch: String,
    pub system_prompt: Option<String>,
    pub model: Option<String>,
    pub provider: Option<String>,
    pub max_tokens: Option<i64>,
    /// Comma-separated tool names for the sub-agent.
    pub tools: Option<String>,
    /// URL of a custom runner script.
    pub agent_runner: Option<String>,
}

impl SubagentSpec {
    /// Build the dispatch request.
    ///
    /// Optional settings become inputs only when set: the workflow treats a
    /// missing input differently from an empty one.
    pub fn to_dispatch(&self) -> DispatchRequest {
        let mut inputs = BTreeMap::new();

        let optional = [
            ("system_prompt", self.system_prompt.clone()),
            ("model", self.model.clone()),
            ("provider", self.provider.clone()),
            ("max_tokens", self.max_tokens.map(|n| n.to_string())),
            ("tools", self.tools.clone()),
            ("agent_runner", self.agent_runner.clone()),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                inputs.insert(key.to_string(), value);
            }
        }

        let mut task = format!("Task: {}", self.task);
        if let Some(ref context) = self.context {
            task.push_str(&format!("\nContext: {context}"));
        }
        inputs.insert("task".to_string(), task);

        DispatchRequest {
            repository: self.repository.clone(),
            workflow_id: self.workflow_id.clone(),
            branch: self.branch.clone(),
            inputs,
        }
    }
}

/// Acknowledgement of an accepted dispatch. There is no run id.
#[derive(Clone, Debug)]
pub struct DispatchReceipt {
    pub message: String,
    pub spec: SubagentSpec,
}

/// Extracted events plus the display excerpt of a run's logs.
#[derive(Clone, Debug, Default)]
pub struct LogDigest {
    pub events: Vec<LogExtractEvent>,
    pub excerpt: String,
}

impl LogDigest {
    /// Prompts, in log order.
    pub fn prompts(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|e| e.prompt.as_deref())
    }

    /// Standalone event lines, in extractor order.
    pub fn event_texts(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|e| e.event_text.as_deref())
    }
}

/// Result of `status`. `logs` is `None` when the run isn't finished or the
/// log fetch failed.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub run: WorkflowRun,
    pub logs: Option<LogDigest>,
}

/// Result of `list`.
#[derive(Clone, Debug)]
pub struct RunListing {
    pub runs: Vec<WorkflowRun>,
    pub total_count: u64,
}

// ─────────────────────────────────────────────
// WorkflowOrchestrator
// ─────────────────────────────────────────────

/// Dispatches and observes sub-agent workflow runs on a [`WorkflowHost`].
pub struct WorkflowOrchestrator {
    host: Arc<dyn WorkflowHost>,
    extractors: Vec<Box<dyn LogEventExtractor>>,
}

impl WorkflowOrchestrator {
    /// Orchestrator with the default log extractors.
    pub fn new(host: Arc<dyn WorkflowHost>) -> Self {
        Self::with_extractors(host, default_extractors())
    }

    /// Orchestrator with a custom extractor chain.
    pub fn with_extractors(
        host: Arc<dyn WorkflowHost>,
        extractors: Vec<Box<dyn LogEventExtractor>>,
    ) -> Self {
        Self { host, extractors }
    }

    /// `Auth` error unless the host has a credential.
    pub fn ensure_credentials(&self) -> Result<(), ToolError> {
        if self.host.has_credentials() {
            Ok(())
        } else {
            Err(ToolError::Auth(AUTH_SCOPE.into()))
        }
    }

    /// Dispatch a new sub-agent run.
    pub async fn create(&self, spec: SubagentSpec) -> Result<DispatchReceipt, ToolError> {
        self.ensure_credentials()?;
        if spec.task.trim().is_empty() {
            return Err(ToolError::missing("task", "create"));
        }

        let request = spec.to_dispatch();
        debug!(
            repository = %request.repository,
            workflow = %request.workflow_id,
            inputs = ?request.inputs.keys().collect::<Vec<_>>(),
            "dispatching sub-agent"
        );

        self.host
            .dispatch_workflow(&request)
            .await
            .map_err(|e| e.into_tool_error("Failed to dispatch workflow"))?;

        Ok(DispatchReceipt {
            message: format!("Workflow {} dispatched successfully", spec.workflow_id),
            spec,
        })
    }

    /// Report a run's state; for completed runs, also mine its logs.
    pub async fn status(
        &self,
        repository: &str,
        workflow_id: &str,
        run_id: Option<&str>,
    ) -> Result<RunReport, ToolError> {
        self.ensure_credentials()?;
        let run_id = match run_id.map(str::trim) {
            Some(id) if !id.is_empty() => id,
            _ => return Err(ToolError::missing("run_id", "status")),
        };

        debug!(repository = %repository, workflow = %workflow_id, run_id = %run_id, "checking run");

        let run = self
            .host
            .get_workflow_run(repository, run_id)
            .await
            .map_err(|e| e.into_tool_error("Failed to check workflow run status"))?;

        if !run.is_completed() {
            return Ok(RunReport { run, logs: None });
        }

        let logs = match self.host.download_run_logs(repository, run_id).await {
            Ok(text) => Some(self.digest(&text)),
            Err(e) => {
                warn!(run_id = %run_id, error = %e, "could not fetch run logs");
                None
            }
        };

        Ok(RunReport { run, logs })
    }

    /// The `per_page` most recent runs (clamped to 1..=100).
    pub async fn list(
        &self,
        repository: &str,
        workflow_id: &str,
        per_page: u32,
    ) -> Result<RunListing, ToolError> {
        self.ensure_credentials()?;
        let per_page = per_page.clamp(1, MAX_PER_PAGE);

        let list = self
            .host
            .list_workflow_runs(repository, workflow_id, per_page)
            .await
            .map_err(|e| e.into_tool_error("Failed to list workflow runs"))?;

        Ok(RunListing {
            runs: list.workflow_runs,
            total_count: list.total_count,
        })
    }

    /// Run every extractor over the logs and cut the excerpt.
    fn digest(&self, logs: &str) -> LogDigest {
        let events: Vec<LogExtractEvent> = self
            .extractors
            .iter()
            .flat_map(|x| {
                let found = x.extract(logs);
                debug!(extractor = x.name(), events = found.len(), "extracted log events");
                found
            })
            .collect();

        LogDigest {
            events,
            excerpt: log_excerpt(logs),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use actionbot_github::types::WorkflowRunList;
    use actionbot_github::GithubError;

    /// In-memory host that records every call.
    #[derive(Default)]
    struct FakeHost {
        authenticated: bool,
        run_status: String,
        logs: Option<String>,
        calls: AtomicUsize,
        log_calls: AtomicUsize,
        dispatched: Mutex<Vec<DispatchRequest>>,
    }

    impl FakeHost {
        fn authed(run_status: &str, logs: Option<&str>) -> Self {
            Self {
                authenticated: true,
                run_status: run_status.into(),
                logs: logs.map(String::from),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl WorkflowHost for FakeHost {
        fn has_credentials(&self) -> bool {
            self.authenticated
        }

        async fn dispatch_workflow(&self, request: &DispatchRequest) -> Result<(), GithubError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.dispatched.lock().unwrap().push(request.clone());
            Ok(())
        }

        async fn get_workflow_run(&self, _repo: &str, run_id: &str) -> Result<WorkflowRun, GithubError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(WorkflowRun {
                id: run_id.parse().unwrap_or_default(),
                name: Some("agent".into()),
                status: Some(self.run_status.clone()),
                conclusion: Some("success".into()),
                ..Default::default()
            })
        }

        async fn download_run_logs(&self, _repo: &str, _run_id: &str) -> Result<String, GithubError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.log_calls.fetch_add(1, Ordering::SeqCst);
            self.logs.clone().ok_or(GithubError::MissingRedirect)
        }

        async fn list_workflow_runs(
            &self,
            _repo: &str,
            _workflow_id: &str,
            per_page: u32,
        ) -> Result<WorkflowRunList, GithubError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(WorkflowRunList {
                total_count: 40,
                workflow_runs: (0..per_page as u64)
                    .map(|id| WorkflowRun { id, ..Default::default() })
                    .collect(),
            })
        }
    }

    fn spec(task: &str) -> SubagentSpec {
        SubagentSpec {
            repository: "acme/infra".into(),
            workflow_id: "agent.yml".into(),
            task: task.into(),
            branch: "main".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_to_dispatch_only_task_when_nothing_optional() {
        let req = spec("rotate credentials").to_dispatch();
        assert_eq!(req.inputs.len(), 1);
        assert_eq!(req.inputs["task"], "Task: rotate credentials");
    }

    #[test]
    fn test_to_dispatch_with_context() {
        let mut s = spec("rotate credentials");
        s.context = Some("staging only".into());
        assert_eq!(
            s.to_dispatch().inputs["task"],
            "Task: rotate credentials\nContext: staging only"
        );
    }

    #[test]
    fn test_to_dispatch_copies_set_options_as_strings() {
        let mut s = spec("t");
        s.model = Some("us.anthropic.claude-sonnet-4-20250514-v1:0".into());
        s.max_tokens = Some(10000);
        s.system_prompt = Some(String::new());
        let inputs = s.to_dispatch().inputs;
        assert_eq!(inputs["max_tokens"], "10000");
        assert_eq!(inputs["system_prompt"], "");
        assert!(inputs.contains_key("model"));
        assert!(!inputs.contains_key("provider"));
        assert!(!inputs.contains_key("tools"));
        assert!(!inputs.contains_key("agent_runner"));
    }

    #[tokio::test]
    async fn test_create_without_credentials_makes_no_call() {
        let host = Arc::new(FakeHost::default());
        let orch = WorkflowOrchestrator::new(host.clone());
        let err = orch.create(spec("rotate credentials")).await.unwrap_err();
        assert!(matches!(err, ToolError::Auth(_)));
        assert!(err.to_string().contains("GitHub token not available"));
        assert_eq!(host.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_empty_task_makes_no_call() {
        let host = Arc::new(FakeHost::authed("queued", None));
        let orch = WorkflowOrchestrator::new(host.clone());
        let err = orch.create(spec("  ")).await.unwrap_err();
        assert!(matches!(err, ToolError::Validation(_)));
        assert_eq!(host.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_dispatches_once() {
        let host = Arc::new(FakeHost::authed("queued", None));
        let orch = WorkflowOrchestrator::new(host.clone());
        let receipt = orch.create(spec("rotate credentials")).await.unwrap();
        assert_eq!(receipt.message, "Workflow agent.yml dispatched successfully");
        let sent = host.dispatched.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].branch, "main");
    }

    #[tokio::test]
    async fn test_status_requires_run_id() {
        let host = Arc::new(FakeHost::authed("completed", Some("")));
        let orch = WorkflowOrchestrator::new(host.clone());
        for run_id in [None, Some(""), Some("   ")] {
            let err = orch.status("acme/infra", "agent.yml", run_id).await.unwrap_err();
            assert!(matches!(err, ToolError::Validation(_)));
        }
        assert_eq!(host.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_status_in_progress_skips_logs() {
        let host = Arc::new(FakeHost::authed("in_progress", Some("Event: x\n")));
        let orch = WorkflowOrchestrator::new(host.clone());
        let report = orch.status("acme/infra", "agent.yml", Some("7")).await.unwrap();
        assert!(report.logs.is_none());
        assert_eq!(host.log_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_status_completed_extracts_events() {
        let logs = "Event: Summarize issues\n+ python -c 'run()'\ndone\n";
        let host = Arc::new(FakeHost::authed("completed", Some(logs)));
        let orch = WorkflowOrchestrator::new(host.clone());
        let report = orch.status("acme/infra", "agent.yml", Some("7")).await.unwrap();
        let digest = report.logs.unwrap();
        assert_eq!(digest.prompts().collect::<Vec<_>>(), vec!["Summarize issues"]);
        assert_eq!(digest.event_texts().collect::<Vec<_>>(), vec!["Summarize issues"]);
        assert_eq!(digest.excerpt, logs);
    }

    #[tokio::test]
    async fn test_status_log_failure_keeps_metadata() {
        let host = Arc::new(FakeHost::authed("completed", None));
        let orch = WorkflowOrchestrator::new(host.clone());
        let report = orch.status("acme/infra", "agent.yml", Some("7")).await.unwrap();
        assert_eq!(report.run.id, 7);
        assert_eq!(report.run.conclusion.as_deref(), Some("success"));
        assert!(report.logs.is_none());
        assert_eq!(host.log_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_status_custom_extractors() {
        struct Shout;
        impl LogEventExtractor for Shout {
            fn name(&self) -> &str {
                "shout"
            }
            fn extract(&self, logs: &str) -> Vec<LogExtractEvent> {
                vec![LogExtractEvent::event(logs.to_uppercase())]
            }
        }

        let host = Arc::new(FakeHost::authed("completed", Some("ok")));
        let orch = WorkflowOrchestrator::with_extractors(host, vec![Box::new(Shout)]);
        let report = orch.status("acme/infra", "agent.yml", Some("1")).await.unwrap();
        assert_eq!(report.logs.unwrap().event_texts().collect::<Vec<_>>(), vec!["OK"]);
    }

    #[tokio::test]
    async fn test_list_clamps_per_page() {
        let host = Arc::new(FakeHost::authed("queued", None));
        let orch = WorkflowOrchestrator::new(host);
        let listing = orch.list("acme/infra", "agent.yml", 0).await.unwrap();
        assert_eq!(listing.runs.len(), 1);
        assert_eq!(listing.total_count, 40);
        let listing = orch.list("acme/infra", "agent.yml", 500).await.unwrap();
        assert_eq!(listing.runs.len(), 100);
    }
}
