//! Authenticated GitHub REST client.
//!
//! Two `reqwest` clients are kept:
//! - `api` never follows redirects, so a `302` from the logs endpoint can be
//!   inspected and its `Location` read;
//! - `download` follows redirects and never carries the bearer token, since
//!   signed download URLs reject (or don't need) extra auth.

use std::time::Duration;

use actionbot_core::config::GithubConfig;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::GithubError;

/// `Accept` header for the REST API.
const ACCEPT: &str = "application/vnd.github+json";

/// Pinned REST API version.
const API_VERSION: &str = "2022-11-28";

// ─────────────────────────────────────────────
// GithubClient
// ─────────────────────────────────────────────

/// GitHub REST client bound to one API base and one (optional) token.
pub struct GithubClient {
    api: Client,
    download: Client,
    api_base: String,
    token: Option<String>,
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("api_base", &self.api_base)
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

impl GithubClient {
    /// Create a client.
    ///
    /// # Arguments
    /// * `api_base`   — e.g. `"https://api.github.com"`
    /// * `token`      — bearer token; `None` makes every call fail with `MissingToken`
    /// * `timeout`    — applied to every request
    /// * `user_agent` — GitHub rejects requests without one
    pub fn new(
        api_base: &str,
        token: Option<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, GithubError> {
        let api = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        let download = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            api,
            download,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// Client for workflow and variable calls (`GITHUB_TOKEN`).
    pub fn from_config(config: &GithubConfig) -> Result<Self, GithubError> {
        Self::new(
            &config.api_base,
            config.token(),
            Duration::from_secs(config.timeout_secs),
            &config.user_agent,
        )
    }

    /// Client for gist calls (`PAT_TOKEN`, falling back to `GITHUB_TOKEN`).
    pub fn for_gists(config: &GithubConfig) -> Result<Self, GithubError> {
        Self::new(
            &config.api_base,
            config.gist_token(),
            Duration::from_secs(config.timeout_secs),
            &config.user_agent,
        )
    }

    /// Whether a token is configured.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Absolute URL for an API path (which must start with `/`).
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Start an authenticated API request with the standard headers.
    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, GithubError> {
        let token = self.token.as_deref().ok_or(GithubError::MissingToken)?;
        let url = self.url(path);
        debug!(method = %method, url = %url, "GitHub request");
        Ok(self
            .api
            .request(method, url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION))
    }

    /// Send a request and require `expected` as the status.
    pub(crate) async fn send_expecting(
        &self,
        builder: RequestBuilder,
        expected: StatusCode,
    ) -> Result<Response, GithubError> {
        let response = builder.send().await?;
        if response.status() == expected {
            Ok(response)
        } else {
            Err(status_error(response).await)
        }
    }

    /// Send a request, require a 2xx status, and decode the JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, GithubError> {
        let response = builder.send().await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| GithubError::Decode(e.to_string()))
    }

    /// Download a (pre-signed) URL as text, without the bearer token.
    pub(crate) async fn download_text(&self, url: &str) -> Result<String, GithubError> {
        debug!(url = %url, "downloading");
        let response = self.download.get(url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(status_error(response).await);
        }
        Ok(response.text().await?)
    }
}

/// Turn a non-success response into `GithubError::Status`, keeping the body text.
pub(crate) async fn status_error(response: Response) -> GithubError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read error body".to_string());
    warn!(status = status, body = %body, "GitHub API error");
    GithubError::Status { status, body }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
