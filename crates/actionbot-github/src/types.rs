//! Wire types for the GitHub endpoints Actionbot uses.
//!
//! Only the fields the tools read are modelled; everything else in GitHub's
//! responses is ignored on deserialization.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Format an optional timestamp the way GitHub prints it (`2024-05-01T12:00:00Z`).
pub fn format_timestamp(ts: Option<&DateTime<Utc>>) -> String {
    ts.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| "N/A".to_string())
}

// ─────────────────────────────────────────────
// Actions
// ─────────────────────────────────────────────

/// A `workflow_dispatch` request.
///
/// GitHub's dispatch schema accepts only string inputs, and distinguishes an
/// unset input from an empty one, so `inputs` only carries keys that were set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchRequest {
    /// `owner/repo`.
    pub repository: String,
    /// Workflow file name (e.g. `agent.yml`) or numeric id.
    pub workflow_id: String,
    /// Git ref to run on.
    pub branch: String,
    pub inputs: BTreeMap<String, String>,
}

impl DispatchRequest {
    /// JSON body for the dispatch endpoint.
    pub fn body(&self) -> serde_json::Value {
        serde_json::json!({
            "ref": self.branch,
            "inputs": self.inputs,
        })
    }
}

/// One execution of a workflow, as reported by the host.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkflowRun {
    #[serde(default)]
    pub id: u64,
    pub name: Option<String>,
    /// `queued`, `in_progress`, `completed`, … as defined by GitHub.
    pub status: Option<String>,
    /// `success`, `failure`, `cancelled`, … once completed.
    pub conclusion: Option<String>,
    pub workflow_id: Option<u64>,
    pub html_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl WorkflowRun {
    pub fn is_completed(&self) -> bool {
        self.status.as_deref() == Some("completed")
    }
}

/// Response of the list-runs endpoint.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkflowRunList {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub workflow_runs: Vec<WorkflowRun>,
}

/// A repository Actions variable.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepoVariable {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

// ─────────────────────────────────────────────
// Gists
// ─────────────────────────────────────────────

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Gist {
    pub id: String,
    pub html_url: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub public: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub files: BTreeMap<String, GistFile>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GistFile {
    pub filename: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub size: u64,
    /// Only present on single-gist responses.
    pub content: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct GistComment {
    pub id: u64,
    pub user: Option<GistUser>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub body: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GistUser {
    pub login: String,
}

/// File payload inside create/update requests.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct GistFileContent {
    pub content: String,
}

/// Body of `POST /gists`.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct NewGist {
    pub description: String,
    pub public: bool,
    pub files: BTreeMap<String, GistFileContent>,
}

/// Body of `PATCH /gists/{id}`. A file mapped to `None` is deleted.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct GistUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<BTreeMap<String, Option<GistFileContent>>>,
}

impl GistUpdate {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.files.is_none()
    }
}

/// Which gist collection to list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GistListKind {
    User,
    Starred,
    Public,
}

impl GistListKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "starred" => Some(Self::Starred),
            "public" => Some(Self::Public),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Starred => "starred",
            Self::Public => "public",
        }
    }
}
