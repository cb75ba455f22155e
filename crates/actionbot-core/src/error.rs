//! Error taxonomy for tool operations.
//!
//! Every variant is caught at the tool boundary and rendered into an
//! error `ToolResult`; none of them reach the agent framework as a panic or
//! a raw transport error.

/// Errors a tool operation can fail with.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// No GitHub credential configured. Raised before any network call.
    #[error("GitHub token not available. Cannot {0}.")]
    Auth(String),

    /// A parameter required by the requested action is missing or empty.
    #[error("{0}")]
    Validation(String),

    /// Network failure, timeout, or non-2xx response.
    #[error("{0}")]
    Transport(String),

    /// Malformed response body, or a redirect without a `Location` header.
    #[error("{0}")]
    Parse(String),

    /// The requested action is not one the tool knows.
    #[error("Unknown action '{action}'. Valid actions are {}", valid.join(", "))]
    UnknownAction {
        action: String,
        valid: &'static [&'static str],
    },
}

impl ToolError {
    /// Shorthand for a `Validation` error on a missing parameter.
    pub fn missing(param: &str, action: &str) -> Self {
        ToolError::Validation(format!(
            "'{param}' parameter is required for the {action} action"
        ))
    }

    /// Build an `UnknownAction` error.
    pub fn unknown_action(action: &str, valid: &'static [&'static str]) -> Self {
        ToolError::UnknownAction {
            action: action.to_string(),
            valid,
        }
    }
}
