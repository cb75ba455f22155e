//! Workflow host trait — the seam between the orchestrator and the CI system
//! that actually runs sub-agents.
//!
//! `GithubClient` implements it against GitHub Actions (see `actions.rs`).

use async_trait::async_trait;

use crate::error::GithubError;
use crate::types::{DispatchRequest, WorkflowRun, WorkflowRunList};

/// An external CI system that can run a named workflow on demand.
///
/// Implementations perform exactly one attempt per call; they never retry.
#[async_trait]
pub trait WorkflowHost: Send + Sync {
    /// Whether a credential is configured. Checked before any call is made.
    fn has_credentials(&self) -> bool;

    /// Trigger a workflow run. The host queues it asynchronously and returns
    /// no run id.
    async fn dispatch_workflow(&self, request: &DispatchRequest) -> Result<(), GithubError>;

    /// Fetch run metadata.
    async fn get_workflow_run(
        &self,
        repository: &str,
        run_id: &str,
    ) -> Result<WorkflowRun, GithubError>;

    /// Fetch the raw log text of a finished run.
    async fn download_run_logs(&self, repository: &str, run_id: &str)
        -> Result<String, GithubError>;

    /// The `per_page` most recent runs of a workflow.
    async fn list_workflow_runs(
        &self,
        repository: &str,
        workflow_id: &str,
        per_page: u32,
    ) -> Result<WorkflowRunList, GithubError>;
}
