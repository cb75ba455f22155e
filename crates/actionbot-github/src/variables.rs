//! Repository Actions variables (`/repos/{repo}/actions/variables/{name}`).

use reqwest::{Method, StatusCode};
use tracing::info;

use crate::client::GithubClient;
use crate::error::GithubError;
use crate::types::RepoVariable;

impl GithubClient {
    /// Read a repository variable.
    pub async fn get_variable(
        &self,
        repository: &str,
        name: &str,
    ) -> Result<RepoVariable, GithubError> {
        let path = format!("/repos/{repository}/actions/variables/{name}");
        let builder = self.request(Method::GET, &path)?;
        self.send_json(builder).await
    }

    /// Overwrite an existing repository variable. GitHub answers `204`.
    pub async fn update_variable(
        &self,
        repository: &str,
        name: &str,
        value: &str,
    ) -> Result<(), GithubError> {
        let path = format!("/repos/{repository}/actions/variables/{name}");
        let builder = self
            .request(Method::PATCH, &path)?
            .json(&serde_json::json!({ "name": name, "value": value }));
        self.send_expecting(builder, StatusCode::NO_CONTENT).await?;
        info!(repository = %repository, variable = %name, "repository variable updated");
        Ok(())
    }
}
