//! GitHub Actions endpoints: dispatch, run status, run logs, run listing.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use tracing::{debug, info};

use crate::client::{status_error, GithubClient};
use crate::error::GithubError;
use crate::traits::WorkflowHost;
use crate::types::{DispatchRequest, WorkflowRun, WorkflowRunList};

#[async_trait]
impl WorkflowHost for GithubClient {
    fn has_credentials(&self) -> bool {
        self.has_token()
    }

    async fn dispatch_workflow(&self, request: &DispatchRequest) -> Result<(), GithubError> {
        let path = format!(
            "/repos/{}/actions/workflows/{}/dispatches",
            request.repository, request.workflow_id
        );
        let builder = self.request(Method::POST, &path)?.json(&request.body());
        self.send_expecting(builder, StatusCode::NO_CONTENT).await?;
        info!(
            repository = %request.repository,
            workflow = %request.workflow_id,
            branch = %request.branch,
            "workflow dispatched"
        );
        Ok(())
    }

    async fn get_workflow_run(
        &self,
        repository: &str,
        run_id: &str,
    ) -> Result<WorkflowRun, GithubError> {
        let path = format!("/repos/{repository}/actions/runs/{run_id}");
        let builder = self.request(Method::GET, &path)?;
        self.send_json(builder).await
    }

    async fn download_run_logs(
        &self,
        repository: &str,
        run_id: &str,
    ) -> Result<String, GithubError> {
        let path = format!("/repos/{repository}/actions/runs/{run_id}/logs");
        let response = self.request(Method::GET, &path)?.send().await?;

        if !response.status().is_redirection() {
            return Err(status_error(response).await);
        }

        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or(GithubError::MissingRedirect)?;

        debug!(run_id = %run_id, "following log redirect");
        self.download_text(&location).await
    }

    async fn list_workflow_runs(
        &self,
        repository: &str,
        workflow_id: &str,
        per_page: u32,
    ) -> Result<WorkflowRunList, GithubError> {
        let path = format!("/repos/{repository}/actions/workflows/{workflow_id}/runs");
        let builder = self
            .request(Method::GET, &path)?
            .query(&[("per_page", per_page.to_string())]);
        self.send_json(builder).await
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
