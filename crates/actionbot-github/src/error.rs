//! Client-level errors for GitHub REST calls.

use actionbot_core::ToolError;

/// Failure of a single GitHub API call.
#[derive(Debug, thiserror::Error)]
pub enum GithubError {
    /// No token configured; raised before the request is built.
    #[error("GitHub token not available")]
    MissingToken,

    /// Non-success HTTP status. `body` is the raw response text.
    #[error("{status} - {body}")]
    Status { status: u16, body: String },

    /// Connection failure, timeout, or TLS error.
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    /// Response body was not the JSON we expected.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// A redirect response came back without a `Location` header.
    #[error("No download URL found in response")]
    MissingRedirect,
}

impl GithubError {
    /// HTTP status code, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            GithubError::Status { status, .. } => Some(*status),
            GithubError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Short human message: GitHub's JSON `message` field when present,
    /// otherwise the full error text.
    pub fn api_message(&self) -> String {
        if let GithubError::Status { body, .. } = self {
            if let Ok(v) = serde_json::from_str::<serde_json::Value>(body) {
                if let Some(msg) = v.get("message").and_then(|m| m.as_str()) {
                    return msg.to_string();
                }
            }
        }
        self.to_string()
    }

    /// Map into the tool-facing taxonomy, prefixing the message with `context`.
    pub fn into_tool_error(self, context: &str) -> ToolError {
        match self {
            GithubError::MissingToken => ToolError::Auth("call the GitHub API".into()),
            GithubError::Decode(_) | GithubError::MissingRedirect => {
                ToolError::Parse(format!("{context}: {self}"))
            }
            GithubError::Status { .. } | GithubError::Request(_) => {
                ToolError::Transport(format!("{context}: {self}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = GithubError::Status {
            status: 422,
            body: "Unexpected inputs provided".into(),
        };
        assert_eq!(err.to_string(), "422 - Unexpected inputs provided");
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn test_api_message_prefers_json_message() {
        let err = GithubError::Status {
            status: 404,
            body: r#"{"message":"Not Found","documentation_url":"https://docs.github.com"}"#.into(),
        };
        assert_eq!(err.api_message(), "Not Found");
    }

    #[test]
    fn test_api_message_falls_back_to_display() {
        assert_eq!(
            GithubError::MissingRedirect.api_message(),
            "No download URL found in response"
        );
    }

    #[test]
    fn test_into_tool_error_kinds() {
        let transport = GithubError::Status { status: 500, body: "boom".into() }
            .into_tool_error("Failed to list workflow runs");
        assert!(matches!(transport, ToolError::Transport(_)));
        assert_eq!(transport.to_string(), "Failed to list workflow runs: 500 - boom");

        let parse = GithubError::MissingRedirect.into_tool_error("Failed to get workflow run logs");
        assert!(matches!(parse, ToolError::Parse(_)));

        let auth = GithubError::MissingToken.into_tool_error("ignored");
        assert!(matches!(auth, ToolError::Auth(_)));
    }
}
