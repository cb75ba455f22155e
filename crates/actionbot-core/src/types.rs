//! Core types shared by every tool.
//!
//! `ToolResult` is the one shape the agent framework sees from a tool call:
//! `{"status": "success" | "error", "content": [{"text": "..."}]}`.
//! Content blocks are ordered, summary first.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Tool definitions (OpenAI function-calling format)
// ─────────────────────────────────────────────

/// A tool definition sent to the LLM.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    /// Always "function".
    #[serde(rename = "type")]
    pub tool_type: String,
    /// The function schema.
    pub function: FunctionDefinition,
}

/// Schema of a function tool.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// Create a new tool definition.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        ToolDefinition {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

// ─────────────────────────────────────────────
// Tool results
// ─────────────────────────────────────────────

/// Outcome flag of a tool call.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Success,
    Error,
}

/// One human-readable block of tool output.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentBlock {
    pub text: String,
}

impl ContentBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// The uniform result of a tool invocation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolResult {
    pub status: ToolStatus,
    pub content: Vec<ContentBlock>,
}

impl ToolResult {
    /// Successful result from an ordered list of text blocks.
    pub fn success<I, S>(blocks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            status: ToolStatus::Success,
            content: blocks.into_iter().map(ContentBlock::new).collect(),
        }
    }

    /// Error result with a single text block.
    pub fn error(text: impl Into<String>) -> Self {
        Self::error_blocks([text])
    }

    /// Error result carrying several blocks (e.g. a partial success followed by the failure).
    pub fn error_blocks<I, S>(blocks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            status: ToolStatus::Error,
            content: blocks.into_iter().map(ContentBlock::new).collect(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ToolStatus::Success
    }

    /// All content blocks joined with newlines.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
